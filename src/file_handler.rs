// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::formatter::Formatter;
use crate::handler::Handler;
use crate::log_record::LogRecord;
use crate::stream::Stream;
use crate::stream_handler::StreamHandler;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// How a [FileHandler] opens its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileMode {
    /// Keep existing content and write after it.
    #[default]
    Append,
    /// Discard existing content.
    Truncate,
}

/**
A [StreamHandler] writing to a file.

The file is opened when the handler is created and closed by [Handler::close] or when
the last handle is dropped.  Every record is flushed as it is written.
*/
#[derive(Debug)]
pub struct FileHandler {
    path: PathBuf,
    inner: StreamHandler,
}

impl FileHandler {
    /// Opens (creating if needed) the file at `path`.  Parent directories must exist.
    pub fn open(path: impl AsRef<Path>, mode: FileMode) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            FileMode::Append => options.append(true),
            FileMode::Truncate => options.write(true).truncate(true),
        };
        let file = options.open(&path)?;
        let stream = Stream::new(path.display().to_string(), file);
        Ok(Self {
            path,
            inner: StreamHandler::new(stream),
        })
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.inner = self.inner.with_level(level);
        self
    }

    pub fn with_formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.inner = self.inner.with_formatter(formatter);
        self
    }

    pub(crate) fn with_optional_formatter(mut self, formatter: Option<Formatter>) -> Self {
        self.inner = self.inner.with_optional_formatter(formatter);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Handler for FileHandler {
    fn emit(&self, record: &LogRecord) -> io::Result<()> {
        self.inner.emit(record)
    }

    fn level(&self) -> Level {
        self.inner.level()
    }

    fn stream(&self) -> Option<Stream> {
        self.inner.stream()
    }

    fn flush(&self) {
        self.inner.flush()
    }

    fn close(&self) {
        if let Some(stream) = self.inner.stream() {
            stream.close();
        }
    }
}
