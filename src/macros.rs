// SPDX-License-Identifier: MIT OR Apache-2.0

//! Formatting log macros.
//!
//! Each macro takes a logger expression followed by `format!`-style arguments.  The
//! arguments are only formatted when the logger is enabled for the level.
//!
//! ```rust
//! use prettylog::{Level, MemoryHandler, get_logger};
//! use std::sync::Arc;
//!
//! let logger = get_logger("docs.macros");
//! logger.set_level(Some(Level::Info));
//! let captured = Arc::new(MemoryHandler::new());
//! logger.add_handler(captured.clone());
//!
//! prettylog::debug!(logger, "filtered {}", 1);
//! prettylog::info!(logger, "kept {}", 2);
//! prettylog::log!(logger, Level::Error, "also kept");
//! assert_eq!(captured.drain_logs(), "kept 2\nalso kept");
//! ```

/// Logs at a level given as an expression.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        let level: $crate::Level = $level;
        if logger.is_enabled_for(level) {
            logger.log(level, ::std::format_args!($($arg)+));
        }
    }};
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Level, MemoryHandler, get_logger};
    use std::cell::Cell;
    use std::sync::Arc;

    #[test]
    fn arguments_are_not_evaluated_below_threshold() {
        let logger = get_logger("macro_tests.lazy");
        logger.set_level(Some(Level::Error));
        logger.set_propagate(false);
        let captured = Arc::new(MemoryHandler::new());
        logger.add_handler(captured.clone());

        let evaluated = Cell::new(false);
        let expensive = || {
            evaluated.set(true);
            "value"
        };
        crate::warning!(logger, "{}", expensive());
        assert!(!evaluated.get());
        crate::critical!(&logger, "{}", expensive());
        assert!(evaluated.get());
        assert_eq!(captured.drain_records(), [(Level::Critical, "value".to_string())]);
    }
}
