//! Where a [`Context`](crate::Context) writes its output.
//!
//! The resolver and handlers never touch the process streams directly; they
//! go through an [`OutputSink`]. [`StdStreams`] is the real implementation,
//! [`BufferedOutput`] captures everything for tests.

use std::io;
use std::sync::{Arc, Mutex};

use console::Term;

/// Destination for normal and error output.
pub trait OutputSink: Send + Sync {
    /// Writes `text` to the output stream as is.
    fn write_out(&self, text: &str) -> io::Result<()>;

    /// Writes `text` to the error stream as is.
    fn write_err(&self, text: &str) -> io::Result<()>;
}

/// The process's standard output and standard error.
#[derive(Debug, Clone)]
pub struct StdStreams {
    out: Term,
    err: Term,
}

impl StdStreams {
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }
}

impl Default for StdStreams {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for StdStreams {
    fn write_out(&self, text: &str) -> io::Result<()> {
        self.out.write_str(text)?;
        self.out.flush()
    }

    fn write_err(&self, text: &str) -> io::Result<()> {
        self.err.write_str(text)?;
        self.err.flush()
    }
}

/// In-memory sink. Clones share the same buffers, so a test can keep one
/// clone and hand the other to a context.
///
/// ```
/// use switchyard::output::{BufferedOutput, OutputSink};
///
/// let buffer = BufferedOutput::new();
/// buffer.clone().write_out("hello\n").unwrap();
/// assert_eq!(buffer.out(), "hello\n");
/// assert_eq!(buffer.err(), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BufferedOutput {
    out: Arc<Mutex<String>>,
    err: Arc<Mutex<String>>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written to the output stream so far.
    pub fn out(&self) -> String {
        read_buffer(&self.out)
    }

    /// Everything written to the error stream so far.
    pub fn err(&self) -> String {
        read_buffer(&self.err)
    }
}

fn read_buffer(buffer: &Mutex<String>) -> String {
    buffer
        .lock()
        .map(|text| text.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
}

fn append(buffer: &Mutex<String>, text: &str) -> io::Result<()> {
    let mut guard = buffer
        .lock()
        .map_err(|_| io::Error::other("output buffer poisoned"))?;
    guard.push_str(text);
    Ok(())
}

impl OutputSink for BufferedOutput {
    fn write_out(&self, text: &str) -> io::Result<()> {
        append(&self.out, text)
    }

    fn write_err(&self, text: &str) -> io::Result<()> {
        append(&self.err, text)
    }
}

/// Joins display items the way `print(items, separator, terminator)` does.
pub(crate) fn join_items<I, D>(items: I, separator: &str, terminator: &str) -> String
where
    I: IntoIterator<Item = D>,
    D: std::fmt::Display,
{
    let mut text = items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator);
    text.push_str(terminator);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_output_separates_streams() {
        let buffer = BufferedOutput::new();
        buffer.write_out("a").unwrap();
        buffer.write_err("b").unwrap();
        buffer.write_out("c").unwrap();
        assert_eq!(buffer.out(), "ac");
        assert_eq!(buffer.err(), "b");
    }

    #[test]
    fn clones_share_buffers() {
        let buffer = BufferedOutput::new();
        let handed_out = buffer.clone();
        handed_out.write_err("oops").unwrap();
        assert_eq!(buffer.err(), "oops");
    }

    #[test]
    fn join_items_uses_separator_and_terminator() {
        assert_eq!(join_items(["a", "b", "c"], ", ", "\n"), "a, b, c\n");
        assert_eq!(join_items([1, 2], " ", ""), "1 2");
        assert_eq!(join_items(Vec::<String>::new(), " ", "\n"), "\n");
    }
}
