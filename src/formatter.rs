// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a [`LogRecord`] into the line a handler writes.
//!
//! Patterns use `{asctime}`, `{levelname}`, `{name}` and `{message}` placeholders.
//! `{asctime}` is rendered with a `chrono` strftime string.

use crate::log_record::LogRecord;
use std::fmt::Write;

const DEFAULT_PRETTY_PATTERN: &str = "{asctime} {message}";
const DEFAULT_PRETTY_DATEFMT: &str = "%m/%d/%Y %H:%M:%S";
const DEFAULT_DATEFMT: &str = "%Y-%m-%d %H:%M:%S";

/**
A message formatter.

```rust
use prettylog::{Formatter, Level, LogRecord};

let formatter = Formatter::new("{levelname}: {message}");
let mut record = LogRecord::new(Level::Warning, "");
record.log("disk almost full");
assert_eq!(formatter.format(&record), "WARNING: disk almost full");
```
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Formatter {
    pattern: String,
    datefmt: String,
}

impl Formatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            datefmt: DEFAULT_DATEFMT.to_string(),
        }
    }

    /// Replaces the strftime string used for `{asctime}`.
    pub fn with_datefmt(mut self, datefmt: impl Into<String>) -> Self {
        self.datefmt = datefmt.into();
        self
    }

    /// `"{asctime} {message}"`, dates as `%m/%d/%Y %H:%M:%S`.
    ///
    /// This is the formatter scoped destinations use unless told otherwise.
    pub fn default_pretty() -> Self {
        Self::new(DEFAULT_PRETTY_PATTERN).with_datefmt(DEFAULT_PRETTY_DATEFMT)
    }

    /// Only the message.
    pub fn message_only() -> Self {
        Self::new("{message}")
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.pattern.len() + 32);
        let mut rest = self.pattern.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            match &after[..close] {
                "asctime" => self.write_asctime(&mut out, record),
                "levelname" => out.push_str(record.level().name()),
                "name" => out.push_str(record.logger_name()),
                "message" => out.push_str(&record.message()),
                // unknown placeholders are kept verbatim
                other => {
                    out.push('{');
                    out.push_str(other);
                    out.push('}');
                }
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

impl Formatter {
    /// An invalid strftime string renders as itself instead of failing the log call.
    fn write_asctime(&self, out: &mut String, record: &LogRecord) {
        let mut stamp = String::new();
        match write!(stamp, "{}", record.created().format(&self.datefmt)) {
            Ok(()) => out.push_str(&stamp),
            Err(_) => out.push_str(&self.datefmt),
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::message_only()
    }
}

impl From<&str> for Formatter {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for Formatter {
    fn from(pattern: String) -> Self {
        Self::new(pattern)
    }
}
