// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named, hierarchical loggers.
//!
//! Every logger has a dotted name (`"app.db.pool"`), a parent (`"app.db"`), its own list
//! of [`Handler`]s, an optional threshold and a `propagate` flag.  The root logger has
//! the empty name and no parent.
//!
//! # Architecture
//!
//! Loggers live in a process-wide registry and are never removed from it, so a
//! [`Logger`] is a cheap `Arc` handle and the same name always yields the same logger.
//! Children refer to their parent through a `Weak` back-reference; only the registry
//! owns loggers.
//!
//! Handler lists are cloned out of their lock before records are dispatched, so a
//! handler may itself log (even to the same logger) without deadlocking, and attaching
//! or detaching handlers from another thread never blocks on a slow handler.
//!
//! # Dispatch
//!
//! A record passing the logger's [effective level](Logger::effective_level) is offered
//! to the handlers of the logger, then of its parent, and so on, stopping after the
//! first logger whose `propagate` flag is false.  Each handler filters by its own level.
//! When no handler exists anywhere on that path, records at `Warning` and above go to a
//! last-resort stderr handler.
//!
//! # Examples
//!
//! ```
//! use prettylog::{Level, MemoryHandler, get_logger};
//! use std::sync::Arc;
//!
//! let parent = get_logger("docs.logger");
//! let child = get_logger("docs.logger.child");
//! assert_eq!(child.parent(), Some(parent.clone()));
//!
//! let captured = Arc::new(MemoryHandler::new());
//! parent.add_handler(captured.clone());
//! parent.set_level(Some(Level::Info));
//!
//! child.info("reaches the parent's handler");
//! assert_eq!(captured.drain_logs(), "reaches the parent's handler");
//! ```

use crate::Level;
use crate::handler::{Handler, same_handler};
use crate::log_record::LogRecord;
use crate::stream::Stream;
use crate::stream_handler::StreamHandler;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

/// Threshold of the root logger until it is changed.
pub const DEFAULT_ROOT_LEVEL: Level = Level::Warning;

/// Name of the logger this crate reports its own diagnostics on.
pub const INTERNAL_LOGGER_NAME: &str = "prettylog";

static REGISTRY: OnceLock<Mutex<HashMap<String, Logger>>> = OnceLock::new();
static INTERNAL: OnceLock<Logger> = OnceLock::new();
static LAST_RESORT: OnceLock<StreamHandler> = OnceLock::new();

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct LoggerInner {
    name: String,
    parent: Option<Weak<LoggerInner>>,
    level: Mutex<Option<Level>>,
    propagate: AtomicBool,
    handlers: Mutex<Vec<Arc<dyn Handler>>>,
}

/**
A handle to a named logger.

Obtain loggers with [get_logger] or [Logger::root].  Clones refer to the same logger;
equality is identity.
*/
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

fn registry() -> MutexGuard<'static, HashMap<String, Logger>> {
    lock(REGISTRY.get_or_init(|| {
        let root = Logger::new_inner(String::new(), None, Some(DEFAULT_ROOT_LEVEL));
        Mutex::new(HashMap::from([(String::new(), root)]))
    }))
}

/// Looks up `name`, creating it and any missing ancestors.
fn get_or_create(loggers: &mut HashMap<String, Logger>, name: &str) -> Logger {
    if let Some(logger) = loggers.get(name) {
        return logger.clone();
    }
    let parent_name = name.rsplit_once('.').map_or("", |(parent, _)| parent);
    let parent = get_or_create(loggers, parent_name);
    let logger = Logger::new_inner(name.to_string(), Some(&parent), None);
    loggers.insert(name.to_string(), logger.clone());
    logger
}

/**
Returns the logger called `name`, creating it on first use.

`""` and `"root"` name the root logger.  Ancestors named by the dotted prefixes of
`name` are created as well, so `get_logger("a.b").parent()` is `get_logger("a")`.

```rust
use prettylog::{Logger, get_logger};

assert_eq!(get_logger(""), Logger::root());
assert_eq!(get_logger("docs.get").name(), "docs.get");
assert_eq!(get_logger("docs.get"), get_logger("docs.get"));
```
*/
pub fn get_logger(name: &str) -> Logger {
    let name = if name == "root" { "" } else { name };
    get_or_create(&mut registry(), name)
}

/// The logger this crate reports on, with threshold `Info`.
pub(crate) fn internal_logger() -> Logger {
    INTERNAL
        .get_or_init(|| {
            let logger = get_logger(INTERNAL_LOGGER_NAME);
            logger.set_level(Some(Level::Info));
            logger
        })
        .clone()
}

fn last_resort() -> &'static StreamHandler {
    LAST_RESORT.get_or_init(|| StreamHandler::stderr().with_level(Level::Warning))
}

impl Logger {
    fn new_inner(name: String, parent: Option<&Logger>, level: Option<Level>) -> Logger {
        Logger {
            inner: Arc::new(LoggerInner {
                name,
                parent: parent.map(|parent| Arc::downgrade(&parent.inner)),
                level: Mutex::new(level),
                propagate: AtomicBool::new(true),
                handlers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The root logger.
    pub fn root() -> Logger {
        get_logger("")
    }

    /// The dotted name; empty for the root logger.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    pub fn parent(&self) -> Option<Logger> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Logger { inner })
    }

    /// Whether records also flow to the parent's handlers.
    pub fn propagate(&self) -> bool {
        self.inner.propagate.load(Ordering::Relaxed)
    }

    pub fn set_propagate(&self, propagate: bool) {
        self.inner.propagate.store(propagate, Ordering::Relaxed);
    }

    /// This logger's own threshold; `None` defers to the parent.
    pub fn level(&self) -> Option<Level> {
        *lock(&self.inner.level)
    }

    pub fn set_level(&self, level: Option<Level>) {
        *lock(&self.inner.level) = level;
    }

    /// The first threshold set on this logger or an ancestor.
    pub fn effective_level(&self) -> Level {
        let mut current = Some(self.clone());
        while let Some(logger) = current {
            if let Some(level) = logger.level() {
                return level;
            }
            current = logger.parent();
        }
        DEFAULT_ROOT_LEVEL
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.effective_level()
    }

    /// Appends a handler.  The same handler may be attached more than once.
    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        lock(&self.inner.handlers).push(handler);
    }

    /**
    Detaches one attachment of exactly this handler (by identity).

    Returns whether it was attached.  Other handlers, including equal-looking ones,
    stay attached.
    */
    pub fn remove_handler(&self, handler: &Arc<dyn Handler>) -> bool {
        let mut handlers = lock(&self.inner.handlers);
        match handlers.iter().rposition(|h| same_handler(h, handler)) {
            Some(position) => {
                handlers.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn has_handler(&self, handler: &Arc<dyn Handler>) -> bool {
        lock(&self.inner.handlers)
            .iter()
            .any(|h| same_handler(h, handler))
    }

    /// A snapshot of this logger's own handlers, in attachment order.
    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        lock(&self.inner.handlers).clone()
    }

    /// Detaches every handler of this logger and returns them.
    pub fn clear_handlers(&self) -> Vec<Arc<dyn Handler>> {
        std::mem::take(&mut *lock(&self.inner.handlers))
    }

    /// This logger followed by the ancestors its records propagate to.
    fn propagation_path(&self) -> impl Iterator<Item = Logger> {
        let mut next = Some(self.clone());
        std::iter::from_fn(move || {
            let logger = next.take()?;
            if logger.propagate() {
                next = logger.parent();
            }
            Some(logger)
        })
    }

    /**
    The streams of this logger's handlers and its ancestors' handlers.

    The walk stops after the first logger that does not propagate, or at the root.
    Handlers without a stream are skipped, and a stream shared by several handlers is
    listed once.  Nothing is modified.
    */
    pub fn streams(&self) -> Vec<Stream> {
        let mut streams: Vec<Stream> = Vec::new();
        for logger in self.propagation_path() {
            for handler in logger.handlers() {
                if let Some(stream) = handler.stream() {
                    if !streams.iter().any(|s| s.same_stream(&stream)) {
                        streams.push(stream);
                    }
                }
            }
        }
        streams
    }

    /// Logs `message` at `level` if the level is enabled.
    pub fn log(&self, level: Level, message: impl Display) {
        if !self.is_enabled_for(level) {
            return;
        }
        let mut record = LogRecord::new(level, self.name());
        record.log_owned(message.to_string());
        self.dispatch(&record);
    }

    /**
    Offers an already built record to the handlers along the propagation path.

    The logger's threshold is not checked again.
    */
    pub fn dispatch(&self, record: &LogRecord) {
        let mut found = 0;
        for logger in self.propagation_path() {
            let handlers = logger.handlers();
            found += handlers.len();
            for handler in handlers {
                handler.handle(record);
            }
        }
        if found == 0 {
            last_resort().handle(record);
        }
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, message)
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message)
    }

    pub fn warning(&self, message: impl Display) {
        self.log(Level::Warning, message)
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message)
    }

    pub fn critical(&self, message: impl Display) {
        self.log(Level::Critical, message)
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Logger {}

impl Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.inner.name)
            .field("level", &self.level())
            .field("propagate", &self.propagate())
            .field("handlers", &lock(&self.inner.handlers).len())
            .finish()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::root()
    }
}

impl From<&str> for Logger {
    fn from(name: &str) -> Self {
        get_logger(name)
    }
}
