// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Execution-time reports.

An [`ExecTimer`] logs `"<name>:"` when it starts and `"<name>: completed in <time>"`
when it is dropped, both at `Info`.  If it is dropped because of a panic the completion
line is skipped: the unit of work did not complete.

A timer started while the thread is already unwinding (inside a destructor run by some
other panic) still reports its completion, since a panic cannot begin during an unwind
without aborting.
*/

use crate::Level;
use crate::logger::Logger;
use crate::time::pretty_duration;
use std::borrow::Cow;
use std::time::{Duration, Instant};

/// Reports how long the enclosing unit of work took.
///
/// # Usage
///
/// Use [`exec_time`] for a closure, the `#[exec_time]` attribute for a whole function,
/// or hold the timer yourself:
///
/// ```rust
/// use prettylog::{ExecTimer, Level, MemoryHandler, get_logger};
/// use std::sync::Arc;
///
/// let logger = get_logger("docs.exec_timer");
/// logger.set_level(Some(Level::Info));
/// let captured = Arc::new(MemoryHandler::new());
/// logger.add_handler(captured.clone());
///
/// {
///     let _timer = ExecTimer::start(&logger, "load");
///     logger.info("loading");
/// }
///
/// let logs = captured.drain_logs();
/// let lines: Vec<&str> = logs.lines().collect();
/// assert_eq!(lines[0], "load:");
/// assert_eq!(lines[1], "loading");
/// assert!(lines[2].starts_with("load: completed in "));
/// ```
#[derive(Debug)]
#[must_use = "the completion is reported when the timer is dropped"]
pub struct ExecTimer {
    logger: Logger,
    name: Cow<'static, str>,
    start: Instant,
    /// Whether the thread was already unwinding when the timer started.
    started_unwinding: bool,
}

impl ExecTimer {
    /// Logs the start line and starts the clock.
    pub fn start(logger: &Logger, name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        logger.log(Level::Info, format_args!("{name}:"));
        Self {
            logger: logger.clone(),
            name,
            start: Instant::now(),
            started_unwinding: std::thread::panicking(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ExecTimer {
    fn drop(&mut self) {
        // only a panic that began after the start means the unit did not complete
        if std::thread::panicking() && !self.started_unwinding {
            return;
        }
        let elapsed = self.start.elapsed();
        self.logger.log(
            Level::Info,
            format_args!("{}: completed in {}", self.name, pretty_duration(elapsed)),
        );
    }
}

/*
boilerplate notes.

1.  Clone, no.  Two timers would report the same unit twice.
2.  PartialEq, Ord, etc.  No, we don't compare these.
3.  Default, no, a timer needs a name and a logger.
4.  Send/Sync, yes, so a timer may be held across an await.
 */

/**
Runs `f` between the start and completion lines of an [ExecTimer].

A panic in `f` propagates, and no completion line is logged.

```rust
use prettylog::{Level, MemoryHandler, exec_time, get_logger};
use std::sync::Arc;

let logger = get_logger("docs.exec_time");
logger.set_level(Some(Level::Info));
let captured = Arc::new(MemoryHandler::new());
logger.add_handler(captured.clone());

let answer = exec_time(&logger, "compute", || 6 * 7);
assert_eq!(answer, 42);
assert!(captured.drain_logs().starts_with("compute:\ncompute: completed in "));
```
*/
pub fn exec_time<F, T>(logger: &Logger, name: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let _timer = ExecTimer::start(logger, name.to_string());
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::get_logger;
    use crate::memory_handler::MemoryHandler;
    use std::panic;
    use std::sync::Arc;

    fn captured(name: &str) -> (Logger, Arc<MemoryHandler>) {
        let logger = get_logger(name);
        logger.set_level(Some(Level::Info));
        logger.set_propagate(false);
        let handler = Arc::new(MemoryHandler::new());
        logger.add_handler(handler.clone());
        (logger, handler)
    }

    #[test]
    fn assert_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExecTimer>();
    }

    #[test]
    fn logs_start_and_completion_at_info() {
        let (logger, handler) = captured("exec_time_tests.normal");
        exec_time(&logger, "work", || {
            std::thread::sleep(Duration::from_millis(5));
        });
        let records = handler.drain_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (Level::Info, "work:".to_string()));
        assert_eq!(records[1].0, Level::Info);
        assert!(records[1].1.starts_with("work: completed in "));
        assert!(records[1].1.ends_with(" s"));
    }

    #[test]
    fn panic_skips_completion() {
        let (logger, handler) = captured("exec_time_tests.panic");
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            exec_time(&logger, "doomed", || -> u8 { panic!("failed unit") });
        }));
        assert!(result.is_err());
        assert_eq!(handler.drain_logs(), "doomed:");
    }

    #[test]
    fn timer_inside_unwinding_destructor_completes() {
        struct TimedCleanup(Logger);
        impl Drop for TimedCleanup {
            fn drop(&mut self) {
                let _timer = ExecTimer::start(&self.0, "cleanup");
            }
        }

        let (logger, handler) = captured("exec_time_tests.cleanup");
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            let _cleanup = TimedCleanup(logger.clone());
            panic!("unrelated failure");
        }));
        assert!(result.is_err());
        let logs = handler.drain_logs();
        assert!(logs.starts_with("cleanup:\ncleanup: completed in "), "{logs}");
    }

    #[test]
    fn silent_below_threshold() {
        let (logger, handler) = captured("exec_time_tests.quiet");
        logger.set_level(Some(Level::Warning));
        assert_eq!(exec_time(&logger, "quiet", || 1), 1);
        assert!(handler.is_empty());
    }
}
