//SPDX-License-Identifier: MIT OR Apache-2.0

//! # prettylog procedural macros
//!
//! Attribute forms of prettylog's scopes.  Each attribute wraps the body of the function
//! it is applied to in a guard, so the scope lasts exactly as long as the call, panics
//! included:
//!
//! ```ignore
//! #[prettylog::exec_time]
//! fn load() { /* ... */ }
//!
//! // expands to approximately
//! fn load() {
//!     let _prettylog_guard = prettylog::ExecTimer::start(&prettylog::Logger::root(), "load");
//!     { /* ... */ }
//! }
//! ```
//!
//! Use these through the `prettylog` crate, which re-exports them.

mod wrap;

use proc_macro::TokenStream;
use wrap::{compile_error, logger_expr, split_args, wrap_body};

/**
Logs the start and the duration of each call of the function at `Info`.

The unit name is the function name.  The argument selects the logger: nothing for the
root logger, a string literal for a named logger, or an expression evaluating to a
`Logger`.

```
use prettylog::{Level, MemoryHandler, get_logger};
use std::sync::Arc;

#[prettylog::exec_time("proc_docs.exec_time")]
fn compute() -> u32 {
    6 * 7
}

let logger = get_logger("proc_docs.exec_time");
logger.set_level(Some(Level::Info));
let captured = Arc::new(MemoryHandler::new());
logger.add_handler(captured.clone());

assert_eq!(compute(), 42);
let logs = captured.drain_logs();
assert!(logs.starts_with("compute:\ncompute: completed in "));
```
*/
#[proc_macro_attribute]
pub fn exec_time(attr: TokenStream, item: TokenStream) -> TokenStream {
    match logger_expr(attr) {
        Ok(logger) => wrap_body(
            "exec_time",
            &format!(r#"prettylog::ExecTimer::start({logger}, "{{fn_name}}")"#),
            item,
        ),
        Err(message) => compile_error(&format!("#[exec_time]: {message}")),
    }
}

/**
Indents the streams of a logger's handlers, and of its ancestors' handlers, during
each call.  The argument selects the logger as for [`macro@exec_time`].
*/
#[proc_macro_attribute]
pub fn indent_logger(attr: TokenStream, item: TokenStream) -> TokenStream {
    match logger_expr(attr) {
        Ok(logger) => wrap_body(
            "indent_logger",
            &format!("prettylog::indent_logger({logger})"),
            item,
        ),
        Err(message) => compile_error(&format!("#[indent_logger]: {message}")),
    }
}

/// Indents `prettylog::Stream::stdout()` during each call.
#[proc_macro_attribute]
pub fn indent_stdout(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return compile_error("#[indent_stdout] takes no arguments");
    }
    wrap_body("indent_stdout", "prettylog::indent_stdout()", item)
}

/**
Indents the given streams during each call.

Each argument is an expression evaluating to a `prettylog::Stream` or a reference to
one.

```
use prettylog::{SharedBuffer, Stream};
use std::sync::OnceLock;

static OUT: OnceLock<(Stream, SharedBuffer)> = OnceLock::new();

fn out() -> &'static Stream {
    &OUT.get_or_init(|| {
        let buffer = SharedBuffer::new();
        (Stream::new("out", buffer.clone()), buffer)
    })
    .0
}

#[prettylog::indent(out())]
fn show(a: i32) {
    out().println(format!("a = {a}")).unwrap();
}

show(24);
assert_eq!(OUT.get().unwrap().1.contents(), "\ta = 24\n");
```
*/
#[proc_macro_attribute]
pub fn indent(attr: TokenStream, item: TokenStream) -> TokenStream {
    let streams = split_args(attr)
        .iter()
        .map(|arg| format!("prettylog::Stream::clone(&({arg}))"))
        .collect::<Vec<_>>();
    let guard = if streams.is_empty() {
        "prettylog::indent(::std::iter::empty::<prettylog::Stream>())".to_string()
    } else {
        format!("prettylog::indent([{}])", streams.join(", "))
    };
    wrap_body("indent", &guard, item)
}
