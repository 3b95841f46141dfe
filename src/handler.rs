// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::log_record::LogRecord;
use crate::stream::Stream;
use std::fmt::Debug;
use std::io;
use std::sync::Arc;

/**
An output destination that can be attached to a [Logger](crate::Logger).

Handlers receive every record that passes their logger's threshold and filter it once
more against their own [level](Handler::level).
*/
pub trait Handler: Debug + Send + Sync {
    /**
    Writes the record out.  Only called for records at or above [Self::level].
    */
    fn emit(&self, record: &LogRecord) -> io::Result<()>;

    /// The minimum severity this handler accepts.
    fn level(&self) -> Level;

    /**
    The stream this handler writes to, if it writes to one.

    Indentation scopes indent these streams.  Handlers without a stream (in-memory,
    remote) are skipped by indentation.
    */
    fn stream(&self) -> Option<Stream> {
        None
    }

    /**
    Ensure all buffers are flushed and up to date.
    */
    fn flush(&self) {}

    /**
    The handler is being detached and will not receive more records.
    */
    fn close(&self) {
        self.flush()
    }

    /**
    Filters by level and emits, reporting emission errors on stderr instead of
    returning them, so that logging never fails the caller.
    */
    fn handle(&self, record: &LogRecord) {
        if record.level() >= self.level() {
            if let Err(err) = self.emit(record) {
                handle_error(self, record, &err);
            }
        }
    }
}

/// Whether two handler handles point at the same handler.
pub(crate) fn same_handler(a: &Arc<dyn Handler>, b: &Arc<dyn Handler>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/**
Reports a failed emission on stderr.

The report goes straight to the process stderr rather than through [Stream::stderr],
so that a broken stderr handler cannot recurse into itself.
*/
pub fn handle_error<H: Handler + ?Sized>(handler: &H, record: &LogRecord, err: &io::Error) {
    eprintln!(
        "--- Logging error ---\n{err}\nHandler: {handler:?}\nMessage: {:?}\nLogger: {:?}",
        record.message(),
        record.logger_name()
    );
}

/*
Boilerplate notes.

# Handler

Clone makes no sense for handlers owning files or connections, they are shared through Arc instead.
PartialEq/Eq would be ambiguous between data equality and identity; identity is what
attach/detach needs and it is done on the Arc (see same_handler).
Default is not sensible, a handler needs somewhere to write.
Send/Sync are required since loggers are process-wide.
*/
