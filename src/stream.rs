// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared output streams.
//!
//! A [`Stream`] is a cheap, cloneable handle to one underlying sink (stdout, stderr, a
//! file, an in-memory buffer).  Every clone writes to the same sink, and every clone
//! sees the same indentation: an indentation scope pushes a layer onto the stream and
//! each write is passed through one [`IndentWriter`] per layer before it reaches the
//! sink.
//!
//! Only writes that go through a `Stream` are indented.  The standard library's
//! `println!` writes to the process stdout directly; use [`Stream::stdout`] (or a
//! [`StreamHandler`](crate::StreamHandler) built on it) for output that should nest.
//!
//! ```rust
//! use prettylog::{SharedBuffer, Stream};
//!
//! let buffer = SharedBuffer::new();
//! let stream = Stream::new("buffer", buffer.clone());
//! writeln!(stream, "before").unwrap();
//! {
//!     let _indent = prettylog::indent([&stream]);
//!     writeln!(stream, "nested").unwrap();
//! }
//! writeln!(stream, "after").unwrap();
//! assert_eq!(buffer.contents(), "before\n\tnested\nafter\n");
//! ```

use crate::indent::IndentWriter;
use std::fmt::{self, Debug, Display};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

static LAYER_ID: AtomicU64 = AtomicU64::new(1);
static STDOUT: OnceLock<Stream> = OnceLock::new();
static STDERR: OnceLock<Stream> = OnceLock::new();

/// Identifies one indentation layer installed on a stream by one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct LayerId(u64);

struct StreamState {
    /// `None` once the stream is closed.
    sink: Option<Box<dyn io::Write + Send>>,
    /// Installed indentation layers, outermost first.
    layers: Vec<LayerId>,
}

struct StreamInner {
    label: String,
    state: Mutex<StreamState>,
}

/**
A shared, indentable output stream.

Equality is identity: two `Stream`s are equal if they are clones of the same stream.
*/
#[derive(Clone)]
pub struct Stream {
    inner: Arc<StreamInner>,
}

impl Stream {
    /// Wraps `sink` in a new stream.  `label` only shows up in `Debug` output.
    pub fn new<W>(label: impl Into<String>, sink: W) -> Self
    where
        W: io::Write + Send + 'static,
    {
        Self {
            inner: Arc::new(StreamInner {
                label: label.into(),
                state: Mutex::new(StreamState {
                    sink: Some(Box::new(sink)),
                    layers: Vec::new(),
                }),
            }),
        }
    }

    /// The process-wide stream over standard output.
    pub fn stdout() -> Stream {
        STDOUT
            .get_or_init(|| Stream::new("<stdout>", io::stdout()))
            .clone()
    }

    /// The process-wide stream over standard error.
    pub fn stderr() -> Stream {
        STDERR
            .get_or_init(|| Stream::new("<stderr>", io::stderr()))
            .clone()
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    fn state(&self) -> MutexGuard<'_, StreamState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /**
    Writes `message` as one unit.

    Each installed indentation layer transforms the whole message once, so a message
    should be a complete chunk of output (a line, or several).  Returns the length of
    `message`.
    */
    pub fn write(&self, message: &str) -> io::Result<usize> {
        let mut state = self.state();
        let StreamState { sink, layers } = &mut *state;
        let Some(sink) = sink.as_mut() else {
            return Err(closed_error(&self.inner.label));
        };
        let mut writer: Box<dyn io::Write + '_> = Box::new(sink);
        for _ in layers.iter() {
            writer = Box::new(IndentWriter::new(writer));
        }
        writer.write_all(message.as_bytes())?;
        Ok(message.len())
    }

    /// Formats the arguments and writes the result as a single message.
    ///
    /// This is what `write!` and `writeln!` call.
    pub fn write_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(message) => self.write(message).map(|_| ()),
            None => self.write(&args.to_string()).map(|_| ()),
        }
    }

    /// Writes `message` followed by a newline, as one message.
    pub fn println(&self, message: impl Display) -> io::Result<()> {
        self.write(&format!("{message}\n")).map(|_| ())
    }

    pub fn flush(&self) -> io::Result<()> {
        match self.state().sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }

    /**
    Flushes and drops the sink.

    Later writes fail, and indentation scopes skip the stream.  Closing twice is a no-op.
    */
    pub fn close(&self) {
        let mut state = self.state();
        if let Some(mut sink) = state.sink.take() {
            let _ = sink.flush();
        }
    }

    /// Whether the stream still has a sink to write to.
    pub fn is_writable(&self) -> bool {
        self.state().sink.is_some()
    }

    /// Number of indentation layers currently installed.
    pub fn indent_depth(&self) -> usize {
        self.state().layers.len()
    }

    pub fn same_stream(&self, other: &Stream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Installs one indentation layer, unless the stream is closed.
    pub(crate) fn push_layer(&self) -> Option<LayerId> {
        let mut state = self.state();
        state.sink.as_ref()?;
        let id = LayerId(LAYER_ID.fetch_add(1, Ordering::Relaxed));
        state.layers.push(id);
        Some(id)
    }

    /// Removes exactly the layer `id`; layers installed by other scopes stay in place.
    pub(crate) fn remove_layer(&self, id: LayerId) -> bool {
        let mut state = self.state();
        match state.layers.iter().rposition(|layer| *layer == id) {
            Some(position) => {
                state.layers.remove(position);
                true
            }
            None => false,
        }
    }
}

fn closed_error(label: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::BrokenPipe,
        format!("stream {label} is closed"),
    )
}

impl PartialEq for Stream {
    fn eq(&self, other: &Self) -> bool {
        self.same_stream(other)
    }
}

impl Eq for Stream {}

impl Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Stream")
            .field("label", &self.inner.label)
            .field("indent_depth", &state.layers.len())
            .field("closed", &state.sink.is_none())
            .finish()
    }
}

/*
Boilerplate notes for Stream:

- Clone: cheap handle clone, all clones share the sink and the layers
- PartialEq/Eq: identity, two separately created streams over stdout are different streams
- Hash: NOT implemented, nothing needs streams as keys and the Arc address would be the only sensible hash
- Default: NOT implemented, a stream needs a sink
- io::Write: NOT implemented, the inherent write_fmt makes write!/writeln! work and keeps
  one macro call as one message
*/

/**
An in-memory sink whose contents can be read back while a [Stream] owns a clone of it.

```rust
use prettylog::{SharedBuffer, Stream};

let buffer = SharedBuffer::new();
let stream = Stream::new("memory", buffer.clone());
stream.println("hello").unwrap();
assert_eq!(buffer.take(), "hello\n");
assert_eq!(buffer.contents(), "");
```
*/
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn bytes(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// Like [contents](Self::contents), and clears the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.bytes());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SharedBuffer, Stream};

    fn buffered() -> (Stream, SharedBuffer) {
        let buffer = SharedBuffer::new();
        (Stream::new("test", buffer.clone()), buffer)
    }

    #[test]
    fn write_reaches_sink_unchanged_without_layers() {
        let (stream, buffer) = buffered();
        assert_eq!(stream.write("a\nb\n").unwrap(), 4);
        assert_eq!(buffer.contents(), "a\nb\n");
    }

    #[test]
    fn each_layer_adds_one_unit() {
        let (stream, buffer) = buffered();
        let outer = stream.push_layer().unwrap();
        let inner = stream.push_layer().unwrap();
        stream.write("x\n").unwrap();
        assert_eq!(buffer.take(), "\t\tx\n");

        assert!(stream.remove_layer(outer));
        stream.write("x\n").unwrap();
        assert_eq!(buffer.take(), "\tx\n");

        assert!(stream.remove_layer(inner));
        assert!(!stream.remove_layer(inner));
        stream.write("x\n").unwrap();
        assert_eq!(buffer.take(), "x\n");
    }

    #[test]
    fn clones_share_layers() {
        let (stream, buffer) = buffered();
        let clone = stream.clone();
        let layer = stream.push_layer().unwrap();
        clone.write("shared\n").unwrap();
        assert_eq!(buffer.take(), "\tshared\n");
        assert_eq!(clone.indent_depth(), 1);
        stream.remove_layer(layer);
        assert_eq!(clone.indent_depth(), 0);
        assert_eq!(stream, clone);
    }

    #[test]
    fn closed_stream_rejects_writes_and_layers() {
        let (stream, _buffer) = buffered();
        stream.close();
        stream.close();
        assert!(!stream.is_writable());
        assert!(stream.write("x").is_err());
        assert!(stream.push_layer().is_none());
        assert!(stream.flush().is_ok());
    }

    #[test]
    fn writeln_is_one_message() {
        let (stream, buffer) = buffered();
        let layer = stream.push_layer().unwrap();
        writeln!(stream, "value = {}", 24).unwrap();
        stream.remove_layer(layer);
        assert_eq!(buffer.contents(), "\tvalue = 24\n");
    }

    #[test]
    fn distinct_streams_are_not_equal() {
        let (a, _) = buffered();
        let (b, _) = buffered();
        assert_ne!(a, b);
        assert_eq!(Stream::stdout(), Stream::stdout());
    }
}
