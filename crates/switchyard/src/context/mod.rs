//! Per-invocation state handed to command handlers.
//!
//! A [`Context`] is created once per root run. The resolver fills in the
//! flags, options and parameters of the command being executed and pushes a
//! [`CommandFrame`] for every subcommand it enters. Handlers then read typed
//! values from it and use it for output, subprocesses and prompts.
//!
//! # Collaborators
//!
//! | Concern | Default | Replace with |
//! |---------|---------|--------------|
//! | Output | [`StdStreams`] | [`Context::with_output`] |
//! | Prompts | real terminal | [`Context::with_terminal`] |
//! | Environment | process environment | [`Context::with_environment`] |
//! | Directory | process working directory | [`Context::with_current_dir`] |
//! | Usage styling | [`UsageTheme::default`] | [`Context::with_theme`] |
//!
//! Tests typically swap the first two:
//!
//! ```
//! use switchyard::output::BufferedOutput;
//! use switchyard::{Command, Context};
//!
//! let output = BufferedOutput::new();
//! let mut ctx = Context::new(["greet"])
//!     .unwrap()
//!     .with_output(output.clone());
//!
//! let greet = Command::new("Say hello").handler(|ctx| {
//!     ctx.print("hello");
//!     Ok(())
//! });
//! greet.run_with(&mut ctx).unwrap();
//! assert_eq!(output.out(), "hello\n");
//! ```

mod external;
mod parameters;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use switchyard_input::{Prompter, TerminalIO};

use crate::argument::{Flag, Opt, Parameter};
use crate::convert::FromArg;
use crate::error::CommandError;
use crate::output::{join_items, OutputSink, StdStreams};
use crate::token::{tokenize, Tokens};
use crate::usage::UsageTheme;

pub use parameters::Parameters;

/// One entry of the command path: a command name and the index of the
/// token that selected it.
///
/// The root frame is the executable's file name at index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    name: String,
    index: usize,
}

impl CommandFrame {
    pub(crate) fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token index where this command was entered. Only tokens after it
    /// belong to the command.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Resolved input and capabilities of one invocation.
pub struct Context {
    pub(crate) flags: HashSet<Flag>,
    pub(crate) options: HashMap<Opt, String>,
    pub(crate) parameters: Parameters,
    pub(crate) command_path: Vec<CommandFrame>,
    pub(crate) tokens: Tokens,
    environment: BTreeMap<String, String>,
    current_dir: PathBuf,
    output: Arc<dyn OutputSink>,
    prompter: Prompter,
    theme: UsageTheme,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("command_path", &self.command_path)
            .field("flags", &self.flags)
            .field("options", &self.options)
            .field("parameters", &self.parameters)
            .field("current_dir", &self.current_dir)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Tokenizes `args` (executable first) and captures the process
    /// environment and working directory.
    pub fn new<I, S>(args: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::from_tokens(tokenize(args)?))
    }

    pub fn from_tokens(tokens: Tokens) -> Self {
        let root = CommandFrame::new(tokens.executable_name(), 0);

        // Variables that are not valid UTF-8 are left out.
        let environment = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();

        Self {
            flags: HashSet::new(),
            options: HashMap::new(),
            parameters: Parameters::default(),
            command_path: vec![root],
            tokens,
            environment,
            current_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            output: Arc::new(StdStreams::new()),
            prompter: Prompter::new(),
            theme: UsageTheme::default(),
        }
    }

    /// Sends normal and error output to `output`.
    pub fn with_output<O: OutputSink + 'static>(mut self, output: O) -> Self {
        self.output = Arc::new(output);
        self
    }

    /// Reads prompt answers from `terminal`.
    pub fn with_terminal<T: TerminalIO + 'static>(mut self, terminal: T) -> Self {
        self.prompter = Prompter::with_terminal(terminal);
        self
    }

    /// Replaces the captured environment.
    pub fn with_environment<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environment = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = dir.into();
        self
    }

    pub fn with_theme(mut self, theme: UsageTheme) -> Self {
        self.theme = theme;
        self
    }

    // === Flags and options ===

    /// Every flag set for the executing command.
    pub fn flags(&self) -> &HashSet<Flag> {
        &self.flags
    }

    pub fn is_set(&self, flag: &Flag) -> bool {
        self.flags.contains(flag)
    }

    /// The string given for `option`.
    pub fn option_str(&self, option: &Opt) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }

    /// The value of `option` converted to `T`, or `None` when it was not
    /// given.
    pub fn option<T: FromArg>(&self, option: &Opt) -> Result<Option<T>, CommandError> {
        Ok(self.option_str(option).map(T::convert).transpose()?)
    }

    /// Like [`option`](Self::option), but a missing option is an error.
    pub fn required_option<T: FromArg>(&self, option: &Opt) -> Result<T, CommandError> {
        self.option(option)?
            .ok_or_else(|| CommandError::MissingOption(option.clone()))
    }

    // === Parameters ===

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Shorthand for [`Parameters::value`].
    pub fn value<T: FromArg>(&self, parameter: &Parameter) -> Result<Option<T>, CommandError> {
        Ok(self.parameters.value(parameter)?)
    }

    /// Shorthand for [`Parameters::required`].
    pub fn required<T: FromArg>(&self, parameter: &Parameter) -> Result<T, CommandError> {
        self.parameters.required(parameter)
    }

    /// Shorthand for [`Parameters::variadic_values`].
    pub fn variadic_values<T: FromArg>(&self) -> Result<Vec<T>, CommandError> {
        Ok(self.parameters.variadic_values()?)
    }

    // === Command path and arguments ===

    /// Commands entered so far, root first. Never empty.
    pub fn command_path(&self) -> &[CommandFrame] {
        &self.command_path
    }

    /// Names along the command path, e.g. `["git", "remote", "add"]`.
    pub fn command_names(&self) -> Vec<&str> {
        self.command_path.iter().map(CommandFrame::name).collect()
    }

    /// The frame of the executing command.
    pub fn current_command(&self) -> &CommandFrame {
        // The root frame is pushed at construction and never popped.
        &self.command_path[self.command_path.len() - 1]
    }

    /// Token index that separates the executing command from its parents.
    pub fn boundary(&self) -> usize {
        self.current_command().index()
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// The executable's file name.
    pub fn executable_name(&self) -> &str {
        self.tokens.executable_name()
    }

    /// Raw arguments that followed `==`, untouched.
    pub fn passthrough(&self) -> &[String] {
        self.tokens.passthrough()
    }

    // === Environment and directory ===

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    pub fn env(&self, name: &str) -> Option<&str> {
        self.environment.get(name).map(String::as_str)
    }

    /// Directory that relative paths and subprocesses start from.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Moves the context to another directory, relative to the current one.
    ///
    /// Only this context is affected; the process working directory is left
    /// alone.
    pub fn set_current_dir(&mut self, dir: impl AsRef<Path>) -> Result<(), CommandError> {
        let target = self.relative_path(dir);
        if !target.is_dir() {
            return Err(CommandError::other(format!(
                "Failed to change current directory to \"{}\"",
                target.display()
            )));
        }
        tracing::debug!(dir = %target.display(), "changed current directory");
        self.current_dir = target;
        Ok(())
    }

    /// Resolves `path` against [`current_dir`](Self::current_dir). Absolute
    /// paths are returned unchanged.
    pub fn relative_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir.join(path)
        }
    }

    // === Output ===

    pub fn theme(&self) -> &UsageTheme {
        &self.theme
    }

    /// Writes `text` and a newline to the output stream.
    pub fn print(&self, text: impl Display) {
        self.write_out(&format!("{}\n", text));
    }

    /// Writes `text` and a newline to the error stream.
    pub fn error(&self, text: impl Display) {
        self.write_err(&format!("{}\n", text));
    }

    /// Writes `items` joined by `separator`, followed by `terminator`.
    pub fn print_items<I, D>(&self, items: I, separator: &str, terminator: &str)
    where
        I: IntoIterator<Item = D>,
        D: Display,
    {
        self.write_out(&join_items(items, separator, terminator));
    }

    /// [`print_items`](Self::print_items) for the error stream.
    pub fn error_items<I, D>(&self, items: I, separator: &str, terminator: &str)
    where
        I: IntoIterator<Item = D>,
        D: Display,
    {
        self.write_err(&join_items(items, separator, terminator));
    }

    fn write_out(&self, text: &str) {
        if let Err(err) = self.output.write_out(text) {
            tracing::warn!(%err, "failed to write output");
        }
    }

    fn write_err(&self, text: &str) {
        if let Err(err) = self.output.write_err(text) {
            tracing::warn!(%err, "failed to write error output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferedOutput;

    fn context(args: &[&str]) -> Context {
        Context::new(args.iter().copied()).unwrap()
    }

    #[test]
    fn root_frame_is_executable_name() {
        let ctx = context(&["/usr/bin/tool", "a"]);
        assert_eq!(ctx.command_path(), &[CommandFrame::new("tool", 0)]);
        assert_eq!(ctx.boundary(), 0);
        assert_eq!(ctx.command_names(), vec!["tool"]);
    }

    #[test]
    fn empty_arguments_fail() {
        let result = Context::new(Vec::<String>::new());
        assert!(matches!(result, Err(CommandError::EmptyInput)));
    }

    #[test]
    fn option_accessors() {
        let output = Opt::both("output", 'o', "");
        let count = Opt::long("count", "");
        let mut ctx = context(&["tool"]);
        ctx.options.insert(output.clone(), "out.txt".into());
        ctx.options.insert(count.clone(), "three".into());

        assert_eq!(ctx.option_str(&output), Some("out.txt"));
        assert_eq!(ctx.option::<String>(&output).unwrap().as_deref(), Some("out.txt"));
        assert!(matches!(
            ctx.required_option::<u32>(&count),
            Err(CommandError::Conversion(_))
        ));

        let missing = Opt::long("missing", "");
        assert_eq!(ctx.option::<u32>(&missing).unwrap(), None);
        assert!(matches!(
            ctx.required_option::<u32>(&missing),
            Err(CommandError::MissingOption(_))
        ));
    }

    #[test]
    fn environment_can_be_replaced() {
        let ctx = context(&["tool"]).with_environment([("HOME", "/home/me")]);
        assert_eq!(ctx.env("HOME"), Some("/home/me"));
        assert_eq!(ctx.env("PATH"), None);
        assert_eq!(ctx.environment().len(), 1);
    }

    #[test]
    fn relative_paths_resolve_against_current_dir() {
        let ctx = context(&["tool"]).with_current_dir("/srv/app");
        assert_eq!(ctx.relative_path("logs"), PathBuf::from("/srv/app/logs"));
        assert_eq!(ctx.relative_path("/etc"), PathBuf::from("/etc"));
    }

    #[test]
    fn set_current_dir_requires_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("file"), "").unwrap();

        let mut ctx = context(&["tool"]).with_current_dir(dir.path());
        ctx.set_current_dir("nested").unwrap();
        assert_eq!(ctx.current_dir(), dir.path().join("nested"));

        let err = ctx.set_current_dir("../file").unwrap_err();
        assert!(err.to_string().starts_with("Failed to change current directory"));
        assert_eq!(ctx.current_dir(), dir.path().join("nested"));
    }

    #[test]
    fn output_goes_to_the_sink() {
        let output = BufferedOutput::new();
        let ctx = context(&["tool"]).with_output(output.clone());

        ctx.print("hello");
        ctx.print_items([1, 2, 3], ", ", "\n");
        ctx.error("oops");
        ctx.error_items(["a", "b"], "-", "");

        assert_eq!(output.out(), "hello\n1, 2, 3\n");
        assert_eq!(output.err(), "oops\na-b");
    }

    #[test]
    fn passthrough_arguments() {
        let ctx = context(&["wrap", "-v", "==", "ls", "-la"]);
        assert_eq!(ctx.passthrough(), &["ls".to_string(), "-la".to_string()]);
    }
}
