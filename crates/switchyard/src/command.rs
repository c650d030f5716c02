//! Command declarations and the entry points that run them.
//!
//! A [`Command`] declares what it accepts (flags, options, positional
//! parameters, an optional variadic parameter and named subcommands) and
//! what to do once its arguments are resolved (a [`Handler`]). Commands are
//! built once and can be run any number of times.
//!
//! ```
//! use switchyard::{Command, Flag, Outcome, Parameter};
//!
//! let shout = Flag::both("shout", 's', "Print in upper case");
//! let word = Parameter::new("word", "Word to print");
//!
//! let app = Command::new("Print a word")
//!     .flag(shout.clone())
//!     .parameter(word.clone())
//!     .handler(move |ctx| {
//!         let word: String = ctx.required(&word)?;
//!         if ctx.is_set(&shout) {
//!             ctx.print(word.to_uppercase());
//!         } else {
//!             ctx.print(word);
//!         }
//!         Ok(())
//!     });
//!
//! assert_eq!(app.run(["say", "-s", "hi"]).unwrap(), Outcome::Completed);
//! ```
//!
//! # Entry points
//!
//! | Method | Creates context | Reports errors | Exits |
//! |--------|-----------------|----------------|-------|
//! | [`Command::run`] | yes | no | no |
//! | [`Command::run_with`] | no | no | no |
//! | [`Command::run_or_exit`] | yes | yes | yes |
//! | [`Command::run_from_env`] | yes | yes | yes |

use std::collections::BTreeMap;
use std::fmt;

use crate::argument::{Flag, Opt, Parameter};
use crate::context::Context;
use crate::error::{RunError, EXIT_FAILURE, EXIT_SUCCESS};
use crate::resolve;
use crate::usage::render_usage;

/// The result type for handlers.
pub type HandlerResult = anyhow::Result<()>;

/// What runs once a command's arguments are resolved.
///
/// Closures taking `&mut Context` implement it, so most commands use
/// [`Command::handler`]. Implement it on a type when the handler carries
/// its own configuration.
pub trait Handler {
    fn handle(&self, ctx: &mut Context) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&mut Context) -> HandlerResult,
{
    fn handle(&self, ctx: &mut Context) -> HandlerResult {
        self(ctx)
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Arguments resolved and the handler ran, or usage was printed for a
    /// command without one.
    Completed,
    /// `-h`/`--help` was given; usage was printed and no handler ran.
    HelpRequested,
}

/// A command and everything it accepts.
pub struct Command {
    summary: String,
    flags: Vec<Flag>,
    options: Vec<Opt>,
    parameters: Vec<Parameter>,
    variadic: Option<Parameter>,
    subcommands: BTreeMap<String, Command>,
    handler: Option<Box<dyn Handler>>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("summary", &self.summary)
            .field("flags", &self.flags)
            .field("options", &self.options)
            .field("parameters", &self.parameters)
            .field("variadic", &self.variadic)
            .field("subcommands", &self.subcommands)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Replaces an equal declaration in place, or appends.
fn upsert<T: PartialEq>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|existing| *existing == item) {
        Some(position) => items[position] = item,
        None => items.push(item),
    }
}

impl Command {
    /// Creates a command with no arguments and no handler. Until a handler
    /// is set, running the command prints its usage.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            flags: Vec::new(),
            options: Vec::new(),
            parameters: Vec::new(),
            variadic: None,
            subcommands: BTreeMap::new(),
            handler: None,
        }
    }

    /// Declares a flag. Declaring the same name again replaces the first
    /// declaration.
    pub fn flag(mut self, flag: Flag) -> Self {
        upsert(&mut self.flags, flag);
        self
    }

    /// Declares an option. Declaring the same name again replaces the first
    /// declaration.
    pub fn option(mut self, option: Opt) -> Self {
        upsert(&mut self.options, option);
        self
    }

    /// Declares the next fixed positional parameter.
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        upsert(&mut self.parameters, parameter);
        self
    }

    /// Declares the parameter that collects every positional value left
    /// over once the fixed parameters are bound.
    pub fn variadic(mut self, parameter: Parameter) -> Self {
        self.variadic = Some(parameter);
        self
    }

    /// Adds a subcommand, selected when `name` is the first argument after
    /// this command's own name.
    pub fn subcommand(mut self, name: impl Into<String>, command: Command) -> Self {
        self.subcommands.insert(name.into(), command);
        self
    }

    pub fn handler<F>(self, handler: F) -> Self
    where
        F: Fn(&mut Context) -> HandlerResult + 'static,
    {
        self.with_handler(handler)
    }

    /// Like [`handler`](Self::handler), for types implementing [`Handler`].
    pub fn with_handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn options(&self) -> &[Opt] {
        &self.options
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn variadic_parameter(&self) -> Option<&Parameter> {
        self.variadic.as_ref()
    }

    /// Subcommands in name order.
    pub fn subcommands(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.subcommands
            .iter()
            .map(|(name, command)| (name.as_str(), command))
    }

    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    pub fn subcommand_named(&self, name: &str) -> Option<&Command> {
        self.subcommands.get(name)
    }

    /// Follows `names` down the subcommand tree.
    pub fn find<S: AsRef<str>>(&self, names: &[S]) -> Option<&Command> {
        names
            .iter()
            .try_fold(self, |command, name| command.subcommand_named(name.as_ref()))
    }

    pub(crate) fn handler_ref(&self) -> Option<&dyn Handler> {
        self.handler.as_deref()
    }

    /// Usage text for this command reached through `path`, styled with the
    /// default theme.
    pub fn usage<S: AsRef<str>>(&self, path: &[S]) -> String {
        render_usage(self, path, &Default::default())
    }

    // === Running ===

    /// Resolves `args` (executable first) and runs the selected handler.
    ///
    /// Output goes to the process's standard streams. Use
    /// [`run_with`](Self::run_with) to supply a configured [`Context`].
    pub fn run<I, S>(&self, args: I) -> Result<Outcome, RunError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ctx = Context::new(args)?;
        self.run_with(&mut ctx)
    }

    /// Resolves the arguments of `ctx` and runs the selected handler.
    ///
    /// `ctx` keeps everything that was resolved, including the command path
    /// reached when an error stopped the run.
    pub fn run_with(&self, ctx: &mut Context) -> Result<Outcome, RunError> {
        resolve::dispatch(self, ctx)
    }

    /// Runs with `args` and turns the result into a process exit.
    ///
    /// Returns normally on success. Help exits with status 0. Errors are
    /// reported on standard error (see [`report`](Self::report)) and exit
    /// with [`RunError::exit_code`].
    pub fn run_or_exit<I, S>(&self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ctx = match Context::new(args) {
            Ok(ctx) => ctx,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(EXIT_FAILURE);
            }
        };

        match self.run_with(&mut ctx) {
            Ok(Outcome::Completed) => {}
            Ok(Outcome::HelpRequested) => std::process::exit(EXIT_SUCCESS),
            Err(err) => {
                self.report(&ctx, &err);
                std::process::exit(err.exit_code());
            }
        }
    }

    /// [`run_or_exit`](Self::run_or_exit) with the process's own arguments.
    pub fn run_from_env(&self) {
        self.run_or_exit(std::env::args());
    }

    /// Writes `err` to the error stream of `ctx`.
    ///
    /// Usage errors are followed by the usage of the command that was
    /// executing when the error occurred. Conversion errors are followed by
    /// example inputs of the requested type.
    pub fn report(&self, ctx: &Context, err: &RunError) {
        let theme = ctx.theme();
        ctx.error(theme.error.apply_to(err));

        if let Some(hint) = err.conversion_error().and_then(|conversion| conversion.hint()) {
            ctx.error(hint);
        }

        if err.is_usage_error() {
            let path = ctx.command_names();
            if let Some(level) = self.find(&path[1..]) {
                ctx.error(render_usage(level, &path, theme));
            }
        }
    }
}
