//! Subprocesses and prompts, seen from a [`Context`].
//!
//! Processes start in the context's directory with exactly the context's
//! environment. Prompts go through the context's terminal.

use switchyard_input::InputError;
use switchyard_process::{ProcessError, ProcessHandle, ProcessResult, ProcessRunner};

use super::Context;
use crate::convert::FromArg;

impl Context {
    /// A runner for `executable` configured with this context's environment
    /// and directory.
    pub fn process(&self, executable: impl Into<String>) -> ProcessRunner {
        ProcessRunner::new(executable)
            .env_clear()
            .envs(self.environment())
            .current_dir(self.current_dir())
    }

    /// Runs `executable` with `args` and waits for it.
    ///
    /// ```no_run
    /// # use switchyard::Context;
    /// # let ctx = Context::new(["tool"]).unwrap();
    /// let listing = ctx.run("ls", ["-a1"])?;
    /// ctx.print(listing.stdout());
    /// # Ok::<(), switchyard_process::ProcessError>(())
    /// ```
    pub fn run<I, S>(&self, executable: &str, args: I) -> Result<ProcessResult, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.process(executable).args(args).run()
    }

    /// Runs a whole command line, split with shell quoting rules.
    pub fn run_line(&self, line: &str) -> Result<ProcessResult, ProcessError> {
        let parsed = ProcessRunner::from_line(line)?;
        self.process(parsed.executable())
            .args(parsed.arguments().iter().cloned())
            .run()
    }

    /// Starts `executable` without waiting for it.
    pub fn spawn<I, S>(&self, executable: &str, args: I) -> Result<ProcessHandle, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.process(executable).args(args).spawn()
    }

    /// Starts `executable` and calls `on_exit` with its result from a
    /// background thread.
    pub fn spawn_with<I, S, F, T>(
        &self,
        executable: &str,
        args: I,
        on_exit: F,
    ) -> Result<ProcessHandle<T>, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(Result<ProcessResult, ProcessError>) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.process(executable).args(args).spawn_with(on_exit)
    }

    // === Prompts ===

    /// Whether prompts are answered by a person at a terminal.
    pub fn is_interactive(&self) -> bool {
        self.prompter.is_interactive()
    }

    /// Reads one trimmed line; `None` when it was empty.
    pub fn read(&self) -> Result<Option<String>, InputError> {
        self.prompter.read()
    }

    /// Reads until the answer converts to `T`. Failed conversions show the
    /// type's example inputs before asking again.
    pub fn read_as<T: FromArg>(&self) -> Result<T, InputError> {
        self.prompter.read_parsed(convert_answer::<T>)
    }

    /// Shows `message`, then behaves like [`read_as`](Self::read_as).
    pub fn read_with_message<T: FromArg>(&self, message: &str) -> Result<T, InputError> {
        self.prompter.read_with_message(message, convert_answer::<T>)
    }

    /// Asks a yes/no question. An empty answer is not accepted.
    pub fn confirm(&self, message: &str) -> Result<bool, InputError> {
        self.prompter.confirm(message, None)
    }

    /// Asks a yes/no question where an empty answer means `default`.
    pub fn confirm_or(&self, message: &str, default: bool) -> Result<bool, InputError> {
        self.prompter.confirm(message, Some(default))
    }

    /// Asks the user to pick one of `options` by number.
    pub fn select<S: AsRef<str>>(
        &self,
        options: &[S],
        default: Option<&str>,
        message: &str,
    ) -> Result<String, InputError> {
        self.prompter.select(options, default, message)
    }
}

fn convert_answer<T: FromArg>(input: &str) -> Result<T, String> {
    T::convert(input).map_err(|err| match err.hint() {
        Some(hint) => format!("{}\n{}", console::style(err).red(), hint),
        None => console::style(err).red().to_string(),
    })
}
