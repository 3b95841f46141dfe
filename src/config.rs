// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::formatter::Formatter;
use crate::logger::Logger;
use crate::stream_handler::StreamHandler;
use std::sync::Arc;

/// The standard stream [basic_config] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Target {
    Stdout,
    #[default]
    Stderr,
}

/// Options for [basic_config].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicConfig {
    /// Threshold of the root logger.
    pub level: Level,
    pub target: Target,
    /// `None` prints the message only.
    pub formatter: Option<Formatter>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            level: Level::Warning,
            target: Target::Stderr,
            formatter: None,
        }
    }
}

impl BasicConfig {
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }
}

/**
Gives the root logger a handler on stdout or stderr and sets its threshold.

Does nothing and returns `false` if the root logger already has handlers.

```rust
use prettylog::{BasicConfig, Level, Logger, Target, basic_config};

let configured = basic_config(BasicConfig::default().level(Level::Info).target(Target::Stdout));
if configured {
    assert_eq!(Logger::root().effective_level(), Level::Info);
}
// the second call finds the handler installed by the first
assert!(!basic_config(BasicConfig::default()));
```
*/
pub fn basic_config(config: BasicConfig) -> bool {
    let root = Logger::root();
    if !root.handlers().is_empty() {
        return false;
    }
    let handler = match config.target {
        Target::Stdout => StreamHandler::stdout(),
        Target::Stderr => StreamHandler::stderr(),
    };
    root.add_handler(Arc::new(handler.with_optional_formatter(config.formatter)));
    root.set_level(Some(config.level));
    true
}
