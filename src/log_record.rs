// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type for the prettylog logging facility.
//!
//! A [`LogRecord`] is built by a [`Logger`](crate::Logger) when a message passes the
//! logger's threshold, and is then handed by reference to every
//! [`Handler`](crate::Handler) on the logger's path. Handlers format it themselves,
//! usually through a [`Formatter`](crate::Formatter).
//!
//! # Example
//!
//! ```rust
//! use prettylog::{LogRecord, Level};
//!
//! let mut record = LogRecord::new(Level::Info, "app.db");
//! record.log("Processing request ");
//! record.log_owned(format!("#{}", 42));
//! assert_eq!(record.to_string(), "Processing request #42");
//! assert_eq!(record.logger_name(), "app.db");
//! ```

use crate::Level;
use chrono::{DateTime, Local};
use std::fmt::{Debug, Display};

/**
A log record.

The message is stored as the parts it was written in, and only joined when a handler
asks for it.  The creation time is taken when the record is constructed, so every
handler that formats `{asctime}` sees the same instant.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogRecord {
    pub(crate) parts: Vec<String>,
    level: Level,
    logger_name: String,
    created: DateTime<Local>,
}

impl LogRecord {
    pub fn new(level: Level, logger_name: &str) -> Self {
        Self {
            parts: Vec::new(),
            level,
            logger_name: logger_name.to_string(),
            created: Local::now(),
        }
    }

    /**
    Append the message to the record.
    */
    pub fn log(&mut self, message: &str) {
        self.parts.push(message.to_string());
    }

    /**
    Append the message to the record, taking ownership of the message.
    */
    pub fn log_owned(&mut self, message: String) {
        self.parts.push(message);
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Name of the logger the record was emitted on; empty for the root logger.
    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn created(&self) -> DateTime<Local> {
        self.created
    }

    /// The joined message.
    pub fn message(&self) -> String {
        self.parts.concat()
    }
}

impl Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in &self.parts {
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}
/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug/Clone: Derived
- PartialEq/Eq/Hash: Derived, includes the timestamp so two records are only equal if
  they were created at the same instant
- Display: the message only; level, name and time are the formatter's business

NOT IMPLEMENTED:
- Default: a record always belongs to a logger, there is no sensible empty name
- Ord/PartialOrd: records are ordered by emission, not by content
- From/Into: constructing a record without a level is a bug
*/
