// SPDX-License-Identifier: MIT OR Apache-2.0
use super::CreateHandler;
use crate::Level;
use crate::error::CreationError;
use crate::file_handler::{FileHandler, FileMode};
use crate::formatter::Formatter;
use crate::handler::Handler;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/**
A log file.

Missing parent directories are created when the handler is created.

```rust
use prettylog::{CreateHandler, FileDestination, FileMode, Handler, Level};

let dir = tempfile::tempdir().unwrap();
let path = dir.path().join("nested/deeper/run.log");
let destination = FileDestination::new(&path).mode(FileMode::Truncate);

let handler = destination.create_handler(Level::Info).unwrap().unwrap();
assert!(path.parent().unwrap().is_dir());
assert_eq!(handler.level(), Level::Info);
```
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDestination {
    path: PathBuf,
    mode: FileMode,
    formatter: Option<Formatter>,
}

impl FileDestination {
    /// Appends to the file at `path`, writing only the message of each record.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: FileMode::default(),
            formatter: None,
        }
    }

    pub fn mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CreateHandler for FileDestination {
    fn create_handler(&self, level: Level) -> Result<Option<Arc<dyn Handler>>, CreationError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                fs::create_dir_all(parent).map_err(|source| CreationError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let handler = FileHandler::open(&self.path, self.mode)
            .map_err(|source| CreationError::OpenFile {
                path: self.path.clone(),
                source,
            })?
            .with_level(level)
            .with_optional_formatter(self.formatter.clone());
        Ok(Some(Arc::new(handler)))
    }

    fn kind(&self) -> &'static str {
        "FileDestination"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_without_parent_is_fine() {
        let destination = FileDestination::new("run.log");
        assert_eq!(destination.path().parent(), Some(Path::new("")));
        assert_eq!(destination.kind(), "FileDestination");
    }

    #[test]
    fn blocked_parent_is_a_directory_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();
        let err = FileDestination::new(blocker.join("sub/run.log"))
            .create_handler(Level::Info)
            .unwrap_err();
        assert!(matches!(err, CreationError::CreateDirectory { .. }));
    }

    #[test]
    fn directory_path_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileDestination::new(dir.path())
            .create_handler(Level::Info)
            .unwrap_err();
        assert!(matches!(err, CreationError::OpenFile { .. }));
    }

    #[test]
    fn formatter_and_mode_reach_the_handler() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, "stale\n").unwrap();
        let handler = FileDestination::new(&path)
            .mode(FileMode::Truncate)
            .formatter("{levelname} {message}")
            .create_handler(Level::Warning)
            .unwrap()
            .unwrap();

        let mut info = crate::LogRecord::new(Level::Info, "t");
        info.log("filtered");
        handler.handle(&info);
        let mut error = crate::LogRecord::new(Level::Error, "t");
        error.log("kept");
        handler.handle(&error);
        handler.close();
        assert_eq!(fs::read_to_string(&path).unwrap(), "ERROR kept\n");
    }
}
