// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::formatter::Formatter;
use crate::handler::Handler;
use crate::log_record::LogRecord;
use crate::stream::Stream;
use std::io;

/**
A handler that writes each record as one line to a [Stream].

The formatted record and its terminating newline are written in one call, so an
indentation layer on the stream indents every line of a multi-line message.

```rust
use prettylog::{Handler, Level, LogRecord, SharedBuffer, Stream, StreamHandler};

let buffer = SharedBuffer::new();
let handler = StreamHandler::new(Stream::new("buffer", buffer.clone()))
    .with_formatter("{levelname}: {message}");

let mut record = LogRecord::new(Level::Warning, "");
record.log("careful");
handler.handle(&record);
assert_eq!(buffer.contents(), "WARNING: careful\n");
```
*/
#[derive(Debug, Clone)]
pub struct StreamHandler {
    stream: Stream,
    level: Level,
    formatter: Option<Formatter>,
}

impl StreamHandler {
    /// A handler accepting every level, printing only the message.
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            level: Level::Debug,
            formatter: None,
        }
    }

    /// A handler on [Stream::stdout].
    pub fn stdout() -> Self {
        Self::new(Stream::stdout())
    }

    /// A handler on [Stream::stderr].
    pub fn stderr() -> Self {
        Self::new(Stream::stderr())
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    pub(crate) fn with_optional_formatter(mut self, formatter: Option<Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn formatter(&self) -> Option<&Formatter> {
        self.formatter.as_ref()
    }

    fn format(&self, record: &LogRecord) -> String {
        match &self.formatter {
            Some(formatter) => formatter.format(record),
            None => record.message(),
        }
    }
}

impl Handler for StreamHandler {
    fn emit(&self, record: &LogRecord) -> io::Result<()> {
        let mut line = self.format(record);
        line.push('\n');
        self.stream.write(&line)?;
        self.stream.flush()
    }

    fn level(&self) -> Level {
        self.level
    }

    fn stream(&self) -> Option<Stream> {
        Some(self.stream.clone())
    }

    fn flush(&self) {
        //a handler that cannot flush has nowhere to report it either
        let _ = self.stream.flush();
    }
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug/Clone: derived, a clone writes to the same stream
// - PartialEq/Eq/Hash: NOT implemented, identity is what matters for attached handlers
// - Default: NOT implemented, stdout and stderr are equally plausible defaults

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SharedBuffer;

    fn record(level: Level, message: &str) -> LogRecord {
        let mut record = LogRecord::new(level, "tests");
        record.log(message);
        record
    }

    #[test]
    fn filters_by_level() {
        let buffer = SharedBuffer::new();
        let handler = StreamHandler::new(Stream::new("b", buffer.clone())).with_level(Level::Error);
        handler.handle(&record(Level::Warning, "dropped"));
        handler.handle(&record(Level::Critical, "kept"));
        assert_eq!(buffer.contents(), "kept\n");
    }

    #[test]
    fn indents_every_line_of_a_record() {
        let buffer = SharedBuffer::new();
        let stream = Stream::new("b", buffer.clone());
        let handler = StreamHandler::new(stream.clone());
        let _indent = crate::indent([&stream]);
        handler.handle(&record(Level::Info, "first\nsecond"));
        assert_eq!(buffer.contents(), "\tfirst\n\tsecond\n");
    }

    #[test]
    fn exposes_its_stream() {
        let stream = Stream::new("b", SharedBuffer::new());
        let handler = StreamHandler::new(stream.clone());
        assert_eq!(handler.stream(), Some(stream));
    }
}
