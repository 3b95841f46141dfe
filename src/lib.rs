//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# prettylog

prettylog makes console and log output easier to read, and attaches extra log
destinations for exactly as long as a piece of work runs.

# The problem

Output of nested work is flat.  When a function that prints calls another function that
prints, nothing on screen tells you which line belongs to which call.  And when a long
job fails at 3 a.m., the failure is in a terminal scrollback instead of a log file or on
your phone.

# Indentation

An indentation scope indents everything written to a set of [`Stream`]s while it is
alive.  Scopes nest, and they are undone on every exit path, panics included.

```rust
use prettylog::{SharedBuffer, Stream};

let buffer = SharedBuffer::new();
let out = Stream::new("out", buffer.clone());

fn step(out: &Stream, n: u32) {
    let _indent = prettylog::indent([out]);
    out.println(format!("step {n}")).unwrap();
    if n < 2 {
        step(out, n + 1);
    }
}

out.println("job").unwrap();
step(&out, 1);
assert_eq!(buffer.contents(), "job\n\tstep 1\n\t\tstep 2\n");
```

[`indent_logger`] indents the streams of a [`Logger`]'s handlers (and its ancestors'),
and [`indent_stdout`] indents [`Stream::stdout`].  Each has a closure form
([`with_indent`], [`with_indent_logger`], [`with_indent_stdout`]) and an attribute form:

```rust
use prettylog::{SharedBuffer, Stream, StreamHandler, get_logger};
use std::sync::Arc;

#[prettylog::indent_logger("docs.lib.attr")]
fn inner() {
    prettylog::get_logger("docs.lib.attr").warning("inside");
}

let buffer = SharedBuffer::new();
let logger = get_logger("docs.lib.attr");
logger.add_handler(Arc::new(StreamHandler::new(Stream::new("b", buffer.clone()))));
logger.warning("outside");
inner();
assert_eq!(buffer.contents(), "outside\n\tinside\n");
```

# Execution time

[`ExecTimer`], [`exec_time`] and `#[exec_time]` log `"<name>:"` when work starts and
`"<name>: completed in 1 min 2.5 s"` when it finishes, at `Info`.  Work that panics
logs no completion.

# Scoped destinations

[`ScopedHandler`] attaches a file ([`FileDestination`]) or a Telegram chat
([`NotificationDestination`], behind the `telegram` feature) to a logger for one scope.
A panic inside the scope is logged to the destination before it is detached.

# The logging facility

prettylog carries its own small hierarchical logging facility: [`get_logger`] returns
named loggers (`"app.db"` is a child of `"app"`), each with [`Handler`]s, a threshold
and a `propagate` flag.  The [`log!`], [`debug!`], [`info!`], [`warning!`], [`error!`]
and [`critical!`] macros format lazily.  [`basic_config`] gives the root logger a
console handler.

# Multithreading

Every piece of shared state is behind a lock, so prettylog is safe to use from any
thread.  Indentation is per stream, not per thread: a scope on one thread indents what
other threads write to the same stream while it is alive.  Each scope removes exactly
what it installed, so scopes on different threads may end in any order.
*/

mod config;
pub mod destination;
mod error;
mod exec_time;
mod file_handler;
mod formatter;
mod handler;
pub mod indent;
mod level;
mod log_record;
mod logger;
mod macros;
mod memory_handler;
mod scoped;
mod stream;
mod stream_handler;
pub mod time;

pub use config::{BasicConfig, Target, basic_config};
pub use destination::{
    ChatId, CreateHandler, Destination, FileDestination, NotificationDestination,
};
#[cfg(feature = "telegram")]
pub use destination::TelegramHandler;
pub use error::CreationError;
pub use exec_time::{ExecTimer, exec_time};
pub use file_handler::{FileHandler, FileMode};
pub use formatter::Formatter;
pub use handler::{Handler, handle_error};
pub use indent::{
    IndentGuard, indent, indent_logger, indent_stdout, with_indent, with_indent_logger,
    with_indent_stdout,
};
pub use level::{Level, ParseLevelError};
pub use log_record::LogRecord;
pub use logger::{Logger, get_logger};
pub use memory_handler::MemoryHandler;
pub use scoped::{HandlerScope, ScopedHandler};
pub use stream::{SharedBuffer, Stream};
pub use stream_handler::StreamHandler;

// attribute forms; these live in the macro namespace next to the functions of the same name
pub use prettylog_proc::{exec_time, indent, indent_logger, indent_stdout};

extern crate self as prettylog;
