// SPDX-License-Identifier: MIT OR Apache-2.0
use super::notification::DEFAULT_BASE_URL;
use crate::Level;
use crate::error::CreationError;
use crate::formatter::Formatter;
use crate::handler::Handler;
use crate::log_record::LogRecord;
use std::fmt::{self, Debug};
use std::io;
use std::time::Duration;

/// Longest text Telegram accepts in one message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/**
Sends each record as a Telegram message through the bot API's `sendMessage`.

Requests are blocking; a failed request is reported like any other emission error and
does not reach the logging caller.
*/
pub struct TelegramHandler {
    client: reqwest::blocking::Client,
    token: String,
    chat_id: i64,
    base_url: String,
    options: Vec<(String, String)>,
    level: Level,
    formatter: Formatter,
}

impl TelegramHandler {
    pub fn new(token: impl Into<String>, chat_id: i64) -> Result<Self, CreationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CreationError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            token: token.into(),
            chat_id,
            base_url: DEFAULT_BASE_URL.to_string(),
            options: Vec::new(),
            level: Level::Debug,
            formatter: Formatter::default_pretty(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_options(mut self, options: Vec<(String, String)>) -> Self {
        self.options = options;
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.formatter = formatter.into();
        self
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            self.token
        )
    }

    fn send(&self, text: &str) -> io::Result<()> {
        let mut form = vec![
            ("chat_id".to_string(), self.chat_id.to_string()),
            ("text".to_string(), text.to_string()),
        ];
        form.extend(self.options.iter().cloned());
        let response = self
            .client
            .post(self.endpoint())
            .form(&form)
            .send()
            .map_err(|e| io::Error::other(format!("Request failed: {}", e.without_url())))?;
        if !response.status().is_success() {
            return Err(io::Error::other(format!(
                "HTTP {} from Telegram",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Splits `text` into pieces of at most `max` characters, on character boundaries.
fn split_message(text: &str, max: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(max)
            .map_or(rest.len(), |(index, _)| index);
        let (piece, tail) = rest.split_at(end);
        pieces.push(piece);
        rest = tail;
    }
    pieces
}

impl Handler for TelegramHandler {
    fn emit(&self, record: &LogRecord) -> io::Result<()> {
        let text = self.formatter.format(record);
        for piece in split_message(&text, MAX_MESSAGE_CHARS) {
            self.send(piece)?;
        }
        Ok(())
    }

    fn level(&self) -> Level {
        self.level
    }
}

impl Debug for TelegramHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramHandler")
            .field("chat_id", &self.chat_id)
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}
