// SPDX-License-Identifier: MIT OR Apache-2.0
use std::error::Error;
use std::io;
use std::path::PathBuf;

/// Why a scoped destination could not be created.
#[derive(Debug, thiserror::Error)]
pub enum CreationError {
    #[error("failed to create directory {}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file {}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read credential file {}", path.display())]
    ReadCredential {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("recipient {value:?} is neither an integer nor a file whose first line is one")]
    InvalidRecipient { value: String },

    #[error("cannot expand `~`: no home directory")]
    HomeDirectory,

    #[error("notification transport: {0}")]
    Transport(String),
}

/// `err` followed by each of its sources, one per line.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_lists_sources() {
        let err = CreationError::OpenFile {
            path: PathBuf::from("/nowhere/x.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            error_chain(&err),
            "failed to open log file /nowhere/x.log\ncaused by: denied"
        );
    }
}
