// SPDX-License-Identifier: MIT OR Apache-2.0
use super::CreateHandler;
use super::credential::{ChatId, resolve_token};
use crate::Level;
use crate::error::CreationError;
use crate::formatter::Formatter;
use crate::handler::Handler;
#[cfg(not(feature = "telegram"))]
use crate::logger::internal_logger;
use std::sync::Arc;

/// Where Telegram's bot API lives unless [NotificationDestination::base_url] says otherwise.
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

#[cfg(not(feature = "telegram"))]
const MISSING_TRANSPORT: &str =
    "To be able to log to Telegram, build prettylog with the `telegram` feature enabled";

/**
Remote notifications through a Telegram bot.

Both the chat id and the bot token may be given directly or as paths (`~` allowed) to
files whose first line holds them; see [ChatId] and [resolve_token].  A missing chat id
or token, or a chat id of `0`, disables the destination.

Sending requires the `telegram` cargo feature.  Without it, creating the handler
reports the missing transport on the `prettylog` logger and yields no handler.

```rust
use prettylog::{CreateHandler, Level, NotificationDestination};

// a chat id of zero switches notifications off
let disabled = NotificationDestination::new(0, "123:token");
assert!(disabled.create_handler(Level::Info).unwrap().is_none());
```
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDestination {
    chat_id: Option<ChatId>,
    token: Option<String>,
    formatter: Formatter,
    options: Vec<(String, String)>,
    base_url: String,
}

impl NotificationDestination {
    pub fn new(chat_id: impl Into<ChatId>, token: impl Into<String>) -> Self {
        Self {
            chat_id: Some(chat_id.into()),
            token: Some(token.into()),
            ..Self::unconfigured()
        }
    }

    /// A destination with neither chat id nor token, hence disabled until both are set.
    pub fn unconfigured() -> Self {
        Self {
            chat_id: None,
            token: None,
            formatter: Formatter::default_pretty(),
            options: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn chat_id(mut self, chat_id: impl Into<ChatId>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replaces [Formatter::default_pretty].
    pub fn formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.formatter = formatter.into();
        self
    }

    /// An extra `sendMessage` parameter, such as `parse_mode` or `disable_notification`.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /**
    Resolves the chat id and then the token.

    Returns `Ok(None)` when the destination is disabled: either value missing, the chat
    id resolving to `0`, or the token resolving to an empty string.
    */
    pub fn resolve_credentials(&self) -> Result<Option<(i64, String)>, CreationError> {
        let (Some(chat_id), Some(token)) = (&self.chat_id, &self.token) else {
            return Ok(None);
        };
        let chat_id = chat_id.resolve()?;
        if chat_id == 0 {
            return Ok(None);
        }
        let token = resolve_token(token)?;
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some((chat_id, token)))
    }
}

impl Default for NotificationDestination {
    fn default() -> Self {
        Self::unconfigured()
    }
}

impl CreateHandler for NotificationDestination {
    #[cfg(feature = "telegram")]
    fn create_handler(&self, level: Level) -> Result<Option<Arc<dyn Handler>>, CreationError> {
        let Some((chat_id, token)) = self.resolve_credentials()? else {
            return Ok(None);
        };
        let handler = super::TelegramHandler::new(token, chat_id)?
            .with_base_url(self.base_url.clone())
            .with_options(self.options.clone())
            .with_formatter(self.formatter.clone())
            .with_level(level);
        Ok(Some(Arc::new(handler)))
    }

    #[cfg(not(feature = "telegram"))]
    fn create_handler(&self, _level: Level) -> Result<Option<Arc<dyn Handler>>, CreationError> {
        internal_logger().error(MISSING_TRANSPORT);
        Ok(None)
    }

    fn kind(&self) -> &'static str {
        "NotificationDestination"
    }
}
