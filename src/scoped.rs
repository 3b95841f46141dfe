// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handlers attached to a logger for the duration of a scope.
//!
//! [`ScopedHandler`] holds a logger, a [`Destination`] and a threshold.  Entering it
//! creates the destination's handler and attaches it; the returned [`HandlerScope`]
//! detaches it again when dropped.  If the scope is left by a panic (or, with
//! [`ScopedHandler::try_run`], by an `Err`), the failure is logged at `Error` before the
//! handler is detached, so the attached destination receives it.
//!
//! ```rust
//! use prettylog::{ScopedHandler, get_logger};
//! use std::fs;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("logs/run.log");
//! let logger = get_logger("docs.scoped");
//!
//! ScopedHandler::file(&logger, &path)
//!     .run(|| logger.warning("written to the file"))
//!     .unwrap();
//! logger.warning("not written: the handler is gone");
//!
//! assert_eq!(fs::read_to_string(&path).unwrap(), "written to the file\n");
//! assert!(logger.handlers().is_empty());
//! ```

use crate::Level;
use crate::destination::{ChatId, CreateHandler, Destination, FileDestination, NotificationDestination};
use crate::error::{CreationError, error_chain};
use crate::handler::Handler;
use crate::logger::Logger;
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Threshold of scoped handlers unless [ScopedHandler::level] says otherwise.
pub const DEFAULT_SCOPED_LEVEL: Level = Level::Info;

static PANIC_RECORDER: Once = Once::new();
static ACTIVE_SCOPES: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    /// Message, location and backtrace of this thread's latest panic while a scope was active.
    static LAST_PANIC: RefCell<Option<String>> = const { RefCell::new(None) };
}

/**
Configuration for attaching a handler to a logger for one scope.
*/
#[derive(Debug, Clone)]
pub struct ScopedHandler {
    logger: Logger,
    destination: Destination,
    level: Level,
}

impl ScopedHandler {
    pub fn new(logger: &Logger, destination: impl Into<Destination>) -> Self {
        Self {
            logger: logger.clone(),
            destination: destination.into(),
            level: DEFAULT_SCOPED_LEVEL,
        }
    }

    /// Appends to the file at `path`, creating missing parent directories.
    pub fn file(logger: &Logger, path: impl Into<PathBuf>) -> Self {
        Self::new(logger, FileDestination::new(path))
    }

    /// Sends to a Telegram chat.  See [NotificationDestination].
    pub fn telegram(logger: &Logger, chat_id: impl Into<ChatId>, token: impl Into<String>) -> Self {
        Self::new(logger, NotificationDestination::new(chat_id, token))
    }

    /// Threshold of the created handler.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /**
    Creates the handler and attaches it.

    If creation fails, the failure is logged at `Error` and returned; nothing is
    attached.  If the destination is disabled, the returned scope is inert.
    */
    pub fn enter(&self) -> Result<HandlerScope, CreationError> {
        let kind = self.destination.kind();
        match self.destination.create_handler(self.level) {
            Err(err) => {
                self.logger.error(format_args!(
                    "Failed to create new handler for {kind} due to \n\n{}",
                    with_backtrace(error_chain(&err))
                ));
                Err(err)
            }
            Ok(None) => Ok(HandlerScope {
                logger: self.logger.clone(),
                handler: None,
                kind,
                failure_reported: false,
                started_unwinding: false,
            }),
            Ok(Some(handler)) => {
                install_panic_recorder();
                ACTIVE_SCOPES.fetch_add(1, Ordering::Relaxed);
                self.logger.add_handler(handler.clone());
                self.logger.debug(format_args!("Added {kind}"));
                Ok(HandlerScope {
                    logger: self.logger.clone(),
                    handler: Some(handler),
                    kind,
                    failure_reported: false,
                    started_unwinding: thread::panicking(),
                })
            }
        }
    }

    /**
    Runs `f` with the handler attached.

    A panic in `f` is logged (message, location and backtrace) while the handler is still
    attached, the handler is detached, and the panic continues unwinding.
    */
    pub fn run<F, T>(&self, f: F) -> Result<T, CreationError>
    where
        F: FnOnce() -> T,
    {
        let mut scope = self.enter()?;
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Ok(value),
            Err(payload) => {
                scope.report_failure(&panic_detail(payload.as_ref()));
                drop(scope);
                panic::resume_unwind(payload)
            }
        }
    }

    /**
    Runs a fallible `f` with the handler attached.

    An `Err` from `f` is logged in its `Debug` form while the handler is attached, and
    then returned.  Creation failures are converted into `E`.
    */
    pub fn try_run<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<CreationError> + Debug,
    {
        let mut scope = self.enter()?;
        let result = panic::catch_unwind(AssertUnwindSafe(f));
        match result {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                scope.report_failure(&format_args!("{err:?}"));
                Err(err)
            }
            Err(payload) => {
                scope.report_failure(&panic_detail(payload.as_ref()));
                drop(scope);
                panic::resume_unwind(payload)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "Box<dyn Any>"
    }
}

/// Appends a backtrace of the current thread, whatever `RUST_BACKTRACE` says.
fn with_backtrace(mut detail: String) -> String {
    detail.push_str("\n\nstack backtrace:\n");
    detail.push_str(&Backtrace::force_capture().to_string());
    detail
}

/**
Chains a panic hook that, while any scope is active, records the panic message and a
backtrace taken where the panic happened.  The previous hook still runs afterwards.
*/
fn install_panic_recorder() {
    // take_hook panics on a panicking thread; a later scope installs the recorder instead
    if thread::panicking() {
        return;
    }
    PANIC_RECORDER.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &panic::PanicHookInfo<'_>| {
            if ACTIVE_SCOPES.load(Ordering::Relaxed) > 0 {
                let location = info
                    .location()
                    .map_or_else(String::new, |location| format!(" at {location}"));
                let detail = with_backtrace(format!(
                    "panicked{location}: {}",
                    panic_message(info.payload())
                ));
                let _ = LAST_PANIC.try_with(|last| *last.borrow_mut() = Some(detail));
            }
            previous(info);
        }));
    });
}

fn recorded_panic() -> Option<String> {
    LAST_PANIC
        .try_with(|last| last.borrow().clone())
        .ok()
        .flatten()
}

/// The recorded detail of the current panic, or its message with a backtrace taken here.
fn panic_detail(payload: &(dyn Any + Send)) -> String {
    LAST_PANIC
        .try_with(|last| last.borrow_mut().take())
        .ok()
        .flatten()
        .unwrap_or_else(|| with_backtrace(format!("panicked: {}", panic_message(payload))))
}

/**
An entered [ScopedHandler].  Dropping it detaches the handler.

A scope whose destination was disabled holds no handler; dropping it does nothing.

A scope dropped by a panic reports the panic at `Error` before detaching, with the
message and a backtrace taken where the panic happened.  A scope entered while the
thread was already unwinding (inside a destructor run by some other panic) treats that
panic as none of its business and detaches without a report.
*/
#[must_use = "the handler is detached when the scope is dropped"]
pub struct HandlerScope {
    logger: Logger,
    handler: Option<Arc<dyn Handler>>,
    kind: &'static str,
    failure_reported: bool,
    /// Whether the thread was already unwinding when the scope was entered.
    started_unwinding: bool,
}

impl HandlerScope {
    /// Whether a handler is attached.
    pub fn is_active(&self) -> bool {
        self.handler.is_some()
    }

    pub fn handler(&self) -> Option<&Arc<dyn Handler>> {
        self.handler.as_ref()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /**
    Logs `failure` at `Error` while the handler is still attached.

    A scope dropped during a panic logs one on its own unless a failure was already
    reported.
    */
    pub fn report_failure(&mut self, failure: &dyn Display) {
        if self.handler.is_some() {
            self.logger.error(failure);
        }
        self.failure_reported = true;
    }
}

impl Drop for HandlerScope {
    fn drop(&mut self) {
        let Some(handler) = self.handler.take() else {
            return;
        };
        if thread::panicking() && !self.started_unwinding && !self.failure_reported {
            let detail =
                recorded_panic().unwrap_or_else(|| with_backtrace("panicked".to_string()));
            self.logger.error(format_args!(
                "Unhandled panic while {} was attached\n\n{detail}",
                self.kind
            ));
        }
        self.logger.remove_handler(&handler);
        handler.close();
        if ACTIVE_SCOPES.fetch_sub(1, Ordering::Relaxed) == 1 {
            let _ = LAST_PANIC.try_with(|last| last.borrow_mut().take());
        }
        self.logger.debug(format_args!("Removed {}", self.kind));
    }
}

impl Debug for HandlerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerScope")
            .field("logger", &self.logger.name())
            .field("kind", &self.kind)
            .field("active", &self.is_active())
            .finish()
    }
}

/*
Boilerplate notes for HandlerScope:

- Clone: NOT implemented, two owners would detach the handler twice
- Send/Sync: auto, it only holds Arcs
- Default: NOT implemented, a scope only comes from ScopedHandler::enter
*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get_logger;
    use crate::memory_handler::MemoryHandler;
    use std::fs;

    fn watched(name: &str) -> (Logger, Arc<MemoryHandler>) {
        let logger = get_logger(name);
        logger.set_level(Some(Level::Debug));
        logger.set_propagate(false);
        let watcher = Arc::new(MemoryHandler::new());
        logger.add_handler(watcher.clone());
        (logger, watcher)
    }

    #[test]
    fn enter_and_drop_are_symmetric() {
        let (logger, watcher) = watched("scoped_tests.symmetric");
        let dir = tempfile::tempdir().unwrap();
        let before = logger.handlers().len();

        let scope = ScopedHandler::file(&logger, dir.path().join("a.log"))
            .enter()
            .unwrap();
        assert!(scope.is_active());
        assert!(logger.has_handler(scope.handler().unwrap()));
        assert_eq!(logger.handlers().len(), before + 1);
        drop(scope);

        assert_eq!(logger.handlers().len(), before);
        assert_eq!(watcher.drain_logs(), "Added FileDestination\nRemoved FileDestination");
    }

    #[test]
    fn disabled_destination_gives_inert_scope() {
        let (logger, watcher) = watched("scoped_tests.inert");
        let scope = ScopedHandler::telegram(&logger, 0, "1:t").enter().unwrap();
        assert!(!scope.is_active());
        drop(scope);
        assert_eq!(logger.handlers().len(), 1);
        assert_eq!(watcher.drain_logs(), "");
    }

    #[test]
    fn creation_failure_is_logged_and_returned() {
        let (logger, watcher) = watched("scoped_tests.failure");
        let dir = tempfile::tempdir().unwrap();
        let result = ScopedHandler::file(&logger, dir.path()).run(|| ());
        assert!(matches!(result, Err(CreationError::OpenFile { .. })));
        let records = watcher.drain_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, Level::Error);
        assert!(records[0].1.starts_with("Failed to create new handler for FileDestination due to \n\n"));
        assert!(records[0].1.contains("stack backtrace:"));
        assert_eq!(logger.handlers().len(), 1);
    }

    #[test]
    fn err_is_reported_to_attached_file() {
        let (logger, _watcher) = watched("scoped_tests.try_run");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.log");

        #[derive(Debug)]
        enum JobError {
            #[allow(dead_code)]
            Setup(CreationError),
            Broken,
        }
        impl From<CreationError> for JobError {
            fn from(err: CreationError) -> Self {
                JobError::Setup(err)
            }
        }

        let result: Result<(), JobError> = ScopedHandler::file(&logger, &path)
            .try_run(|| Err(JobError::Broken));
        assert!(matches!(result, Err(JobError::Broken)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Broken\n");
        assert_eq!(logger.handlers().len(), 1);
    }

    #[test]
    fn panic_is_reported_before_detach() {
        let (logger, _watcher) = watched("scoped_tests.panic");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.log");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            ScopedHandler::file(&logger, &path)
                .level(Level::Warning)
                .run(|| -> u8 { panic!("disk on fire") })
        }));
        let payload = outcome.expect_err("panic should propagate");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"disk on fire"));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("panicked at "), "{written}");
        assert!(written.contains("disk on fire"));
        assert!(written.contains("stack backtrace:"));
        assert_eq!(logger.handlers().len(), 1);
    }

    #[test]
    fn panic_through_a_plain_scope_is_still_reported() {
        let (logger, _watcher) = watched("scoped_tests.guard_panic");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.log");

        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            let _scope = ScopedHandler::file(&logger, &path).enter().unwrap();
            panic!("boom");
        }));
        let written = fs::read_to_string(&path).unwrap();
        assert!(
            written.starts_with("Unhandled panic while FileDestination was attached"),
            "{written}"
        );
        assert!(written.contains("boom"));
        assert!(written.contains("stack backtrace:"));
        assert_eq!(logger.handlers().len(), 1);
    }

    #[test]
    fn scopes_dropped_out_of_order_remove_only_their_own_handler() {
        let (logger, _watcher) = watched("scoped_tests.out_of_order");
        let dir = tempfile::tempdir().unwrap();
        let first_path = dir.path().join("first.log");
        let second_path = dir.path().join("second.log");

        let first = ScopedHandler::file(&logger, &first_path).enter().unwrap();
        let second = ScopedHandler::file(&logger, &second_path).enter().unwrap();
        let second_handler = second.handler().unwrap().clone();
        assert_eq!(logger.handlers().len(), 3);

        drop(first);
        assert_eq!(logger.handlers().len(), 2);
        assert!(logger.has_handler(&second_handler));
        logger.info("only the second");

        drop(second);
        assert_eq!(logger.handlers().len(), 1);
        assert!(!logger.has_handler(&second_handler));
        assert_eq!(fs::read_to_string(&first_path).unwrap(), "");
        assert_eq!(fs::read_to_string(&second_path).unwrap(), "only the second\n");
    }

    #[test]
    fn scope_inside_unwinding_destructor_reports_nothing() {
        struct Cleanup(Logger, PathBuf);
        impl Drop for Cleanup {
            fn drop(&mut self) {
                let _scope = ScopedHandler::file(&self.0, &self.1).enter().unwrap();
                self.0.info("cleaning up");
            }
        }

        let (logger, _watcher) = watched("scoped_tests.cleanup");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleanup.log");
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _cleanup = Cleanup(logger.clone(), path.clone());
            panic!("unrelated failure");
        }));
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "cleaning up\n");
        assert_eq!(logger.handlers().len(), 1);
    }
}
