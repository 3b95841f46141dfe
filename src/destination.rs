// SPDX-License-Identifier: MIT OR Apache-2.0

//! Destinations that a [`ScopedHandler`](crate::ScopedHandler) attaches for the duration
//! of a scope.
//!
//! A destination is configuration only.  The handler itself is created when the scope
//! is entered, through [`CreateHandler::create_handler`], which either
//!
//! - fails with a [`CreationError`] (the scope does not start),
//! - returns `Ok(None)` when the configuration deliberately disables the destination
//!   (the scope is inert), or
//! - returns the handler to attach.

mod credential;
mod file;
mod notification;
#[cfg(feature = "telegram")]
mod telegram;

pub use credential::{ChatId, expand_home, resolve_token};
pub use file::FileDestination;
pub use notification::{DEFAULT_BASE_URL, NotificationDestination};
#[cfg(feature = "telegram")]
pub use telegram::TelegramHandler;

use crate::Level;
use crate::error::CreationError;
use crate::handler::Handler;
use std::sync::Arc;

/// The capability shared by every destination: build a handler from stored configuration.
pub trait CreateHandler {
    /**
    Builds the handler, with `level` as its threshold.

    `Ok(None)` means the destination is disabled by its configuration; this is not an
    error.
    */
    fn create_handler(&self, level: Level) -> Result<Option<Arc<dyn Handler>>, CreationError>;

    /// Short name used in attach/detach messages.
    fn kind(&self) -> &'static str;
}

/// One of the destinations a scope can attach.
#[derive(Debug, Clone)]
pub enum Destination {
    File(FileDestination),
    Notification(NotificationDestination),
}

impl CreateHandler for Destination {
    fn create_handler(&self, level: Level) -> Result<Option<Arc<dyn Handler>>, CreationError> {
        match self {
            Destination::File(file) => file.create_handler(level),
            Destination::Notification(notification) => notification.create_handler(level),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Destination::File(file) => file.kind(),
            Destination::Notification(notification) => notification.kind(),
        }
    }
}

impl From<FileDestination> for Destination {
    fn from(file: FileDestination) -> Self {
        Destination::File(file)
    }
}

impl From<NotificationDestination> for Destination {
    fn from(notification: NotificationDestination) -> Self {
        Destination::Notification(notification)
    }
}
