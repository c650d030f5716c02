//! Interactive terminal prompts.
//!
//! `switchyard-input` reads answers from the user once argument dispatch is
//! done: free text, typed values with re-prompting, yes/no confirmations and
//! numbered selections.
//!
//! # Quick Start
//!
//! ```ignore
//! use switchyard_input::Prompter;
//!
//! let prompter = Prompter::new();
//! let name = prompter.read_with_message("What is your name?", |s| Ok::<_, String>(s.to_string()))?;
//! if prompter.confirm("Continue?", Some(false))? {
//!     // ...
//! }
//! ```
//!
//! # Testing
//!
//! Every prompt talks to a [`TerminalIO`]. Swap the real terminal for a
//! [`MockTerminal`] to script the user's answers:
//!
//! ```
//! use switchyard_input::{MockTerminal, Prompter};
//!
//! let prompter = Prompter::with_terminal(MockTerminal::with_responses(["maybe", "y"]));
//! assert_eq!(prompter.confirm("Proceed?", None).unwrap(), true);
//! ```

mod error;
mod prompt;
mod terminal;

pub use error::InputError;
pub use prompt::Prompter;
pub use terminal::{MockTerminal, RealTerminal, TerminalIO};
