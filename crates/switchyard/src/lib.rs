//! Argument tokenizing, subcommand resolution and dispatch for command-line
//! tools.
//!
//! `switchyard` turns a raw argument vector into a typed [`Context`] and
//! hands it to the handler of the (sub)command it names. It also renders
//! usage text and gives handlers access to subprocesses and prompts.
//!
//! # Quick Start
//!
//! ```
//! use switchyard::{Command, Flag, Opt, Parameter};
//!
//! let verbose = Flag::both("verbose", 'v', "Print verbose output");
//! let count = Opt::both("count", 'n', "Repeat n times").placeholder("n");
//! let message = Parameter::new("message", "Message to print");
//!
//! let echo = Command::new("Print a message")
//!     .flag(verbose.clone())
//!     .option(count.clone())
//!     .parameter(message.clone())
//!     .handler(move |ctx| {
//!         let text: String = ctx.required(&message)?;
//!         let times: usize = ctx.option(&count)?.unwrap_or(1);
//!         if ctx.is_set(&verbose) {
//!             ctx.error(format!("printing {} time(s)", times));
//!         }
//!         for _ in 0..times {
//!             ctx.print(&text);
//!         }
//!         Ok(())
//!     });
//!
//! echo.run(["echo", "-vn", "2", "hello"]).unwrap();
//! ```
//!
//! # Command line rules
//!
//! | Input | Meaning |
//! |-------|---------|
//! | `--name`, `-c` | flag, or option taking the next argument as value |
//! | `-abc` | flags `a` and `b`; `c` is a flag or an option |
//! | `value` | subcommand (right after its parent), else positional |
//! | `-h`, `--help` | usage of the command at that depth |
//! | `==` | stop; later arguments are only available as [`Context::passthrough`] |
//!
//! # Architecture
//!
//! ```text
//! raw args ─► token::tokenize ─► Tokens
//!                                  │
//! Command tree ──────────────────► resolve (per level, pushes CommandFrames)
//!                                  │
//!                                  ▼
//!                               Context ─► Handler
//! ```
//!
//! Typed access goes through [`FromArg`]. Output goes through an
//! [`OutputSink`](output::OutputSink), so tests can capture it with
//! [`BufferedOutput`](output::BufferedOutput).
//!
//! # Logging
//!
//! Resolution and process execution emit `tracing` events at `debug` and
//! `trace` level. The library never installs a subscriber.

pub mod argument;
pub mod command;
pub mod context;
pub mod convert;
pub mod error;
pub mod output;
mod resolve;
pub mod token;
pub mod usage;

pub use argument::{ArgumentName, Flag, Opt, Parameter};
pub use command::{Command, Handler, HandlerResult, Outcome};
pub use context::{CommandFrame, Context, Parameters};
pub use convert::FromArg;
pub use error::{
    CommandError, ConversionError, RunError, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE,
};
pub use usage::{render_usage, UsageTheme};

pub use switchyard_input::{InputError, MockTerminal, TerminalIO};
pub use switchyard_process::{ProcessError, ProcessHandle, ProcessResult, ProcessRunner};
