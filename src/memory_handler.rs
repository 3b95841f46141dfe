// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Handler
//!
//! This module provides an in-memory handler for testing and inspection.
//! The `MemoryHandler` captures formatted records in memory rather than writing them to a
//! stream, making it ideal for:
//!
//! - Unit testing code that logs through prettylog
//! - Checking what a scoped destination would have received
//! - Programmatically examining log output
//!
//! A `MemoryHandler` has no stream, so indentation scopes leave it alone.

use crate::Level;
use crate::formatter::Formatter;
use crate::handler::Handler;
use crate::log_record::LogRecord;
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A handler that stores formatted records together with their level.
///
/// # Example
///
/// ```rust
/// use prettylog::{Level, MemoryHandler, get_logger};
/// use std::sync::Arc;
///
/// let logger = get_logger("docs.memory_handler");
/// logger.set_level(Some(Level::Debug));
/// let handler = Arc::new(MemoryHandler::new());
/// logger.add_handler(handler.clone());
///
/// prettylog::info!(logger, "Test message {}", 42);
///
/// let logs = handler.drain_logs();
/// assert!(logs.contains("Test message 42"));
/// ```
#[derive(Debug)]
pub struct MemoryHandler {
    records: Mutex<Vec<(Level, String)>>,
    level: Level,
    formatter: Option<Formatter>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: Derived, required by Handler
// - Default: Implemented, accepts every level and keeps the bare message
// - Clone: NOT implemented, two handlers sharing captured output would be surprising
// - PartialEq/Eq/Hash: NOT implemented, mutex state comparison is problematic

impl Default for MemoryHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHandler {
    /// Creates a handler accepting every level and keeping only the message.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            level: Level::Debug,
            formatter: None,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    fn records(&self) -> MutexGuard<'_, Vec<(Level, String)>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drains all logs into a single string, clearing the internal buffer.
    ///
    /// Messages are joined by newlines.
    pub fn drain_logs(&self) -> String {
        let mut records = self.records();
        let result = records
            .iter()
            .map(|(_, message)| message.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        records.clear();
        result
    }

    /// Drains the captured records with their levels, clearing the internal buffer.
    pub fn drain_records(&self) -> Vec<(Level, String)> {
        std::mem::take(&mut *self.records())
    }

    /// Number of captured records.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Flushes all logs to stderr, clearing the internal buffer.
    pub fn drain_to_console(&self) {
        let mut records = self.records();
        for (_, message) in records.iter() {
            eprintln!("{}", message);
        }
        records.clear();
    }
}

impl Handler for MemoryHandler {
    fn emit(&self, record: &LogRecord) -> io::Result<()> {
        let message = match &self.formatter {
            Some(formatter) => formatter.format(record),
            None => record.message(),
        };
        self.records().push((record.level(), message));
        Ok(())
    }

    fn level(&self) -> Level {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: Level, message: &str) -> LogRecord {
        let mut record = LogRecord::new(level, "memory");
        record.log(message);
        record
    }

    #[test]
    fn drain_clears_buffer() {
        let handler = MemoryHandler::new();
        handler.handle(&record(Level::Info, "first"));
        handler.handle(&record(Level::Error, "second"));
        assert_eq!(handler.len(), 2);
        assert_eq!(handler.drain_logs(), "first\nsecond");
        assert_eq!(handler.drain_logs(), "");
        assert!(handler.is_empty());
    }

    #[test]
    fn records_keep_levels_and_formatting() {
        let handler = MemoryHandler::new()
            .with_level(Level::Warning)
            .with_formatter("{name}|{levelname}|{message}");
        handler.handle(&record(Level::Info, "ignored"));
        handler.handle(&record(Level::Error, "kept"));
        assert_eq!(
            handler.drain_records(),
            vec![(Level::Error, "memory|ERROR|kept".to_string())]
        );
    }

    #[test]
    fn has_no_stream() {
        assert!(MemoryHandler::new().stream().is_none());
    }
}
