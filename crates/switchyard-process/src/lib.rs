//! Run external programs from command handlers.
//!
//! [`ProcessRunner`] describes one invocation. [`run`](ProcessRunner::run)
//! blocks and returns the captured, trimmed output;
//! [`spawn`](ProcessRunner::spawn) and
//! [`spawn_with`](ProcessRunner::spawn_with) return a [`ProcessHandle`]
//! that can suspend, resume, interrupt or terminate the process.
//!
//! ```no_run
//! use switchyard_process::ProcessRunner;
//!
//! let listing = ProcessRunner::new("ls").arg("-a1").run()?;
//! for entry in listing.stdout().lines() {
//!     println!("{}", entry);
//! }
//! # Ok::<(), switchyard_process::ProcessError>(())
//! ```
//!
//! Failures keep what the program said: a non-zero exit carries the trimmed
//! standard error (or standard output) as its message.

mod error;
mod handle;
mod runner;

pub use error::ProcessError;
pub use handle::ProcessHandle;
pub use runner::{ProcessResult, ProcessRunner};
