// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped indentation of stream output.
//!
//! Two layers live here:
//!
//! - The text transform and the [`IndentWriter`] decorator, which prefix every line of
//!   a message with one [`INDENT_UNIT`].
//! - [`IndentGuard`], which installs one indentation layer on each of a set of
//!   [`Stream`]s and removes exactly those layers when it is dropped, whether the
//!   protected code returned normally or panicked.
//!
//! # Example
//!
//! ```rust
//! use prettylog::{SharedBuffer, Stream};
//!
//! let buffer = SharedBuffer::new();
//! let out = Stream::new("out", buffer.clone());
//!
//! fn show(out: &Stream, a: i32) {
//!     let _indent = prettylog::indent([out]);
//!     out.println(format!("a = {a}")).unwrap();
//! }
//!
//! out.println("before").unwrap();
//! show(&out, 24);
//! out.println("after").unwrap();
//! assert_eq!(buffer.contents(), "before\n\ta = 24\nafter\n");
//! ```
//!
//! Guards nest: output written under two guards over the same stream carries two units.

use crate::logger::Logger;
use crate::stream::{LayerId, Stream};
use std::borrow::{Borrow, Cow};
use std::io;

/// The token prefixed to each line per level of nesting.
pub const INDENT_UNIT: &str = "\t";

/**
Indents one message.

The message is treated as `body + last`, where `last` is its final byte: the result is
`INDENT_UNIT + body` with every newline in `body` followed by `INDENT_UNIT`, then `last`.
A trailing newline therefore ends the indented text instead of opening an indented
empty line.  An empty message stays empty.

```rust
use prettylog::indent::indent_message;

assert_eq!(indent_message("a\nb\n"), "\ta\n\tb\n");
assert_eq!(indent_message("no newline"), "\tno newline");
assert_eq!(indent_message("\n"), "\t\n");
assert_eq!(indent_message(""), "");
```
*/
pub fn indent_message(message: &str) -> Cow<'_, str> {
    match indent_bytes(message.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(message),
        // the transform only inserts ASCII before or after b'\n', so UTF-8 stays intact
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// Byte-level form of [indent_message].
pub fn indent_bytes(message: &[u8]) -> Cow<'_, [u8]> {
    let Some((last, body)) = message.split_last() else {
        return Cow::Borrowed(message);
    };
    let unit = INDENT_UNIT.as_bytes();
    let newlines = body.iter().filter(|b| **b == b'\n').count();
    let mut out = Vec::with_capacity(message.len() + unit.len() * (newlines + 1));
    out.extend_from_slice(unit);
    for byte in body {
        out.push(*byte);
        if *byte == b'\n' {
            out.extend_from_slice(unit);
        }
    }
    out.push(*last);
    Cow::Owned(out)
}

/**
Wraps a string-writing function so that every message it receives is indented first.

Whatever the wrapped function returns is returned unchanged.

```rust
use prettylog::indent::indent_write;

let mut seen = Vec::new();
let mut write = indent_write(|message: &str| {
    seen.push(message.to_string());
    message.len()
});
assert_eq!(write("one\ntwo"), 9);
drop(write);
assert_eq!(seen, ["\tone\n\ttwo"]);
```
*/
pub fn indent_write<F, R>(mut write: F) -> impl FnMut(&str) -> R
where
    F: FnMut(&str) -> R,
{
    move |message: &str| write(&*indent_message(message))
}

/**
A writer decorator that indents each buffer it is given before passing it on.

Every call to `write` is one message: the whole buffer is transformed and written to
the inner writer, and the buffer's length is reported as consumed.

```rust
use prettylog::indent::IndentWriter;
use std::io::Write;

let mut out = IndentWriter::new(Vec::new());
out.write_all(b"first\nsecond\n").unwrap();
assert_eq!(out.into_inner(), b"\tfirst\n\tsecond\n");
```
*/
#[derive(Debug)]
pub struct IndentWriter<W> {
    inner: W,
}

impl<W: io::Write> IndentWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> io::Write for IndentWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write_all(&indent_bytes(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/**
Holds one indentation layer on each of its streams; dropping it removes them.

Created by [indent], [indent_logger] or [indent_stdout].  Each guard removes only the
layers it installed itself, so guards may be dropped in any order without disturbing
each other.
*/
#[derive(Debug)]
#[must_use = "indentation ends when the guard is dropped"]
pub struct IndentGuard {
    installed: Vec<(Stream, LayerId)>,
}

impl IndentGuard {
    /// Indents every writable stream in `streams`; closed streams are skipped.
    pub fn new<I>(streams: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<Stream>,
    {
        let installed = streams
            .into_iter()
            .filter_map(|stream| {
                let stream: &Stream = stream.borrow();
                stream.push_layer().map(|layer| (stream.clone(), layer))
            })
            .collect();
        Self { installed }
    }

    /// The streams this guard indented.
    pub fn streams(&self) -> impl Iterator<Item = &Stream> {
        self.installed.iter().map(|(stream, _)| stream)
    }
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        for (stream, layer) in self.installed.drain(..) {
            stream.remove_layer(layer);
        }
    }
}

/**
Indents the given streams until the returned guard is dropped.

```rust
use prettylog::{SharedBuffer, Stream};

let buffer = SharedBuffer::new();
let stream = Stream::new("out", buffer.clone());
{
    let _outer = prettylog::indent([&stream]);
    let _inner = prettylog::indent([&stream]);
    stream.println("deep").unwrap();
}
stream.println("flat").unwrap();
assert_eq!(buffer.contents(), "\t\tdeep\nflat\n");
```
*/
pub fn indent<I>(streams: I) -> IndentGuard
where
    I: IntoIterator,
    I::Item: Borrow<Stream>,
{
    IndentGuard::new(streams)
}

/// Indents the streams of every handler of `logger` and of its ancestors, up to the
/// first logger that does not propagate.  See [Logger::streams].
pub fn indent_logger(logger: &Logger) -> IndentGuard {
    IndentGuard::new(logger.streams())
}

/// Indents [Stream::stdout].
pub fn indent_stdout() -> IndentGuard {
    IndentGuard::new([Stream::stdout()])
}

/// Runs `f` with the given streams indented.
pub fn with_indent<I, F, T>(streams: I, f: F) -> T
where
    I: IntoIterator,
    I::Item: Borrow<Stream>,
    F: FnOnce() -> T,
{
    let _guard = indent(streams);
    f()
}

/// Runs `f` with the handler streams of `logger` indented.
pub fn with_indent_logger<F, T>(logger: &Logger, f: F) -> T
where
    F: FnOnce() -> T,
{
    let _guard = indent_logger(logger);
    f()
}

/// Runs `f` with [Stream::stdout] indented.
pub fn with_indent_stdout<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    let _guard = indent_stdout();
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SharedBuffer;
    use std::panic;

    fn buffered() -> (Stream, SharedBuffer) {
        let buffer = SharedBuffer::new();
        (Stream::new("test", buffer.clone()), buffer)
    }

    #[test]
    fn message_transform() {
        assert_eq!(indent_message("Hello!\n"), "\tHello!\n");
        assert_eq!(indent_message("a\n\nb"), "\ta\n\t\n\tb");
        assert_eq!(indent_message("x"), "\tx");
        assert_eq!(indent_message("é\n"), "\té\n");
        assert!(matches!(indent_message(""), Cow::Borrowed("")));
    }

    #[test]
    fn writer_reports_input_length() {
        use std::io::Write;
        let mut writer = IndentWriter::new(Vec::new());
        assert_eq!(writer.write(b"ab\ncd").unwrap(), 5);
        assert_eq!(writer.get_ref(), b"\tab\n\tcd");
    }

    #[test]
    fn restoration_is_idempotent() {
        let (stream, buffer) = buffered();
        with_indent([&stream], || stream.println("inside").unwrap());
        stream.println("outside").unwrap();
        stream.println("outside").unwrap();
        assert_eq!(buffer.contents(), "\tinside\noutside\noutside\n");
        assert_eq!(stream.indent_depth(), 0);
    }

    #[test]
    fn restored_after_panic() {
        let (stream, buffer) = buffered();
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            with_indent([&stream], || -> usize {
                stream.println("doomed").unwrap();
                panic!("inside indentation");
            });
        }));
        let payload = result.expect_err("panic should propagate");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"inside indentation"));
        assert_eq!(stream.indent_depth(), 0);
        stream.println("after").unwrap();
        assert_eq!(buffer.contents(), "\tdoomed\nafter\n");
    }

    #[test]
    fn out_of_order_drop_keeps_other_layers() {
        let (a, buffer) = buffered();
        let outer = indent([&a]);
        let inner = indent([&a]);
        drop(outer);
        a.println("x").unwrap();
        assert_eq!(buffer.take(), "\tx\n");
        drop(inner);
        a.println("x").unwrap();
        assert_eq!(buffer.take(), "x\n");
    }

    #[test]
    fn closed_streams_are_skipped() {
        let (open, _) = buffered();
        let (closed, _) = buffered();
        closed.close();
        let guard = indent([&open, &closed]);
        assert_eq!(guard.streams().count(), 1);
        assert_eq!(open.indent_depth(), 1);
        drop(guard);
        assert_eq!(open.indent_depth(), 0);
    }

    #[test]
    fn indent_write_returns_inner_result() {
        let mut out = String::new();
        let mut write = indent_write(|m: &str| {
            out.push_str(m);
            "done"
        });
        assert_eq!(write("x\n"), "done");
        drop(write);
        assert_eq!(out, "\tx\n");
    }
}
