//! Terminal access behind a trait, so prompts can be scripted in tests.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Where prompts are written and answers are read.
pub trait TerminalIO: Send + Sync {
    /// Whether answers come from an interactive terminal.
    fn is_terminal(&self) -> bool;

    /// Write prompt text to stdout, without a trailing newline.
    fn write_prompt(&self, prompt: &str) -> io::Result<()>;

    /// Read a line from stdin. An empty string means end of input.
    fn read_line(&self) -> io::Result<String>;
}

/// The process's standard input and output.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealTerminal;

impl TerminalIO for RealTerminal {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn write_prompt(&self, prompt: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()
    }

    fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

/// Scripted terminal for tests.
///
/// Returns the configured responses one per `read_line` call, then reports
/// end of input. Everything written is recorded and available through
/// [`MockTerminal::written`].
#[derive(Debug)]
pub struct MockTerminal {
    is_terminal: bool,
    responses: Vec<String>,
    next: AtomicUsize,
    written: Mutex<Vec<String>>,
}

impl MockTerminal {
    fn build(is_terminal: bool, responses: Vec<String>) -> Self {
        Self {
            is_terminal,
            responses,
            next: AtomicUsize::new(0),
            written: Mutex::new(Vec::new()),
        }
    }

    /// A mock that is not a TTY and has no input.
    pub fn non_terminal() -> Self {
        Self::build(false, Vec::new())
    }

    /// A mock terminal that answers once.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::build(true, vec![response.into()])
    }

    /// A mock terminal that answers several prompts in order.
    ///
    /// Extra answers feed re-prompts after a rejected answer.
    pub fn with_responses(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::build(true, responses.into_iter().map(Into::into).collect())
    }

    /// A mock that immediately reports end of input (Ctrl+D).
    pub fn eof() -> Self {
        Self::build(true, Vec::new())
    }

    /// Every prompt written so far, in order.
    pub fn written(&self) -> Vec<String> {
        self.written
            .lock()
            .map(|written| written.clone())
            .unwrap_or_default()
    }

    /// All written prompts joined into one string.
    pub fn transcript(&self) -> String {
        self.written().concat()
    }
}

impl TerminalIO for MockTerminal {
    fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    fn write_prompt(&self, prompt: &str) -> io::Result<()> {
        if let Ok(mut written) = self.written.lock() {
            written.push(prompt.to_string());
        }
        Ok(())
    }

    fn read_line(&self) -> io::Result<String> {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(index) {
            // Lines read from stdin keep their newline.
            Some(response) => Ok(format!("{}\n", response)),
            None => Ok(String::new()),
        }
    }
}

impl<T: TerminalIO + ?Sized> TerminalIO for std::sync::Arc<T> {
    fn is_terminal(&self) -> bool {
        (**self).is_terminal()
    }

    fn write_prompt(&self, prompt: &str) -> io::Result<()> {
        (**self).write_prompt(prompt)
    }

    fn read_line(&self) -> io::Result<String> {
        (**self).read_line()
    }
}
