// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credentials given either as values or as references to files holding them.
//!
//! A reference is a filesystem path, optionally starting with `~` for the home
//! directory.  The value is the first line of the file, trimmed.

use crate::error::CreationError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/**
The recipient of remote notifications (a Telegram chat id).

Either an id, or text that is parsed as an id if it can be and otherwise taken as a
path to a file whose first line is the id.

```rust
use prettylog::destination::ChatId;

assert_eq!(ChatId::from(42).resolve().unwrap(), 42);
assert_eq!(ChatId::from(" 17 ").resolve().unwrap(), 17);
assert_eq!(ChatId::from("").resolve().unwrap(), 0);
```
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatId {
    Id(i64),
    Reference(String),
}

impl ChatId {
    /**
    Resolves to a numeric id.  `0` means "disabled".

    Empty text, or a file whose first line is empty, resolves to `0`.
    */
    pub fn resolve(&self) -> Result<i64, CreationError> {
        let reference = match self {
            ChatId::Id(id) => return Ok(*id),
            ChatId::Reference(reference) => reference,
        };
        if let Some(id) = parse_id(reference) {
            return Ok(id);
        }
        let path = expand_home(reference)?;
        let line = read_first_line(&path).map_err(|source| CreationError::ReadCredential {
            path: path.clone(),
            source,
        })?;
        parse_id(&line).ok_or_else(|| CreationError::InvalidRecipient { value: line })
    }
}

fn parse_id(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    text.parse().ok()
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl From<i32> for ChatId {
    fn from(id: i32) -> Self {
        ChatId::Id(id.into())
    }
}

impl From<&str> for ChatId {
    fn from(reference: &str) -> Self {
        ChatId::Reference(reference.to_string())
    }
}

impl From<String> for ChatId {
    fn from(reference: String) -> Self {
        ChatId::Reference(reference)
    }
}

impl From<&Path> for ChatId {
    fn from(path: &Path) -> Self {
        ChatId::Reference(path.display().to_string())
    }
}

/**
Resolves an authorization token.

If `token` names a readable file (after `~` expansion), the file's first line is the
token.  If no such file exists, `token` itself is the token: trimmed, but without `~`
expansion.  Other I/O errors, such
as `token` naming a directory, are failures.
*/
pub fn resolve_token(token: &str) -> Result<String, CreationError> {
    let path = expand_home(token)?;
    match read_first_line(&path) {
        Ok(line) => Ok(line),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(token.trim().to_string()),
        Err(source) => Err(CreationError::ReadCredential { path, source }),
    }
}

/// Replaces a leading `~` with the home directory.
pub fn expand_home(reference: &str) -> Result<PathBuf, CreationError> {
    match reference.strip_prefix('~') {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(CreationError::HomeDirectory)?;
            let mut expanded = home.into_os_string();
            expanded.push(rest);
            Ok(PathBuf::from(expanded))
        }
        None => Ok(PathBuf::from(reference)),
    }
}

/// The first line of the file at `path`, without its line ending and surrounding whitespace.
pub(crate) fn read_first_line(path: &Path) -> io::Result<String> {
    let mut line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut line)?;
    Ok(line.trim().to_string())
}
