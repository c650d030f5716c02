//! Error types for argument resolution and dispatch.
//!
//! Resolution is all-or-nothing: the first problem found is raised as a
//! [`CommandError`] and nothing is retried. Handler failures travel as
//! [`anyhow::Error`] and are wrapped in [`RunError::Handler`].

use crate::argument::{Opt, Parameter};

/// Process status for a successful run (also used after help output).
pub const EXIT_SUCCESS: i32 = 0;

/// Process status for errors that are not usage related.
pub const EXIT_FAILURE: i32 = 1;

/// Process status for usage errors (`EX_USAGE` from sysexits.h).
pub const EXIT_USAGE: i32 = 64;

/// Errors raised while resolving arguments or reading resolved values.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The argument vector was empty, not even an executable name.
    #[error("Not enough arguments")]
    EmptyInput,

    /// A token matched no flag, option, subcommand or free positional slot.
    #[error("Unexpected argument \"{0}\"")]
    UnexpectedArgument(String),

    /// An option was given without a following value.
    #[error("Missing operand for {0}")]
    MissingOperand(Opt),

    /// A required option was never supplied.
    #[error("Expected option {0}")]
    MissingOption(Opt),

    /// A required parameter was never supplied.
    #[error("Missing parameter {0}")]
    MissingParameter(Parameter),

    /// A bound value could not be converted to the requested type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Usage violation detected by a handler after parsing.
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    /// Any other handler-raised failure.
    #[error("{0}")]
    Other(String),
}

impl CommandError {
    /// Create a usage error; reported together with the command's usage.
    pub fn invalid_usage(reason: impl Into<String>) -> Self {
        Self::InvalidUsage(reason.into())
    }

    /// Create a plain error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Whether the command's usage should be shown along with this error.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            CommandError::UnexpectedArgument(_)
                | CommandError::MissingOperand(_)
                | CommandError::MissingOption(_)
                | CommandError::MissingParameter(_)
                | CommandError::InvalidUsage(_)
        )
    }
}

/// A bound string could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{source_text}\" cannot be converted to {target}")]
pub struct ConversionError {
    source_text: String,
    target: &'static str,
    examples: &'static [&'static str],
}

impl ConversionError {
    pub fn new(
        source_text: impl Into<String>,
        target: &'static str,
        examples: &'static [&'static str],
    ) -> Self {
        Self {
            source_text: source_text.into(),
            target,
            examples,
        }
    }

    /// The string that failed to convert.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Name of the requested type.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Inputs that would have converted successfully.
    pub fn examples(&self) -> &'static [&'static str] {
        self.examples
    }

    /// `Examples: a, b, c`, or `None` when the type lists no examples.
    pub fn hint(&self) -> Option<String> {
        if self.examples.is_empty() {
            None
        } else {
            Some(format!("Examples: {}", self.examples.join(", ")))
        }
    }
}

/// Failure of a complete `run`: either resolution or the handler failed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Handler(anyhow::Error),
}

impl RunError {
    /// The underlying [`CommandError`], including one returned by a handler
    /// through `?`.
    pub fn command_error(&self) -> Option<&CommandError> {
        match self {
            RunError::Command(err) => Some(err),
            RunError::Handler(err) => err.downcast_ref::<CommandError>(),
        }
    }

    /// Whether usage should be reported along with this error.
    pub fn is_usage_error(&self) -> bool {
        self.command_error()
            .map(CommandError::is_usage_error)
            .unwrap_or(false)
    }

    /// The conversion error behind this failure, if that is what it was.
    pub fn conversion_error(&self) -> Option<&ConversionError> {
        match self.command_error() {
            Some(CommandError::Conversion(err)) => Some(err),
            Some(_) => None,
            None => match self {
                RunError::Handler(err) => err.downcast_ref::<ConversionError>(),
                RunError::Command(_) => None,
            },
        }
    }

    /// Process status this error maps to.
    pub fn exit_code(&self) -> i32 {
        if self.is_usage_error() {
            EXIT_USAGE
        } else {
            EXIT_FAILURE
        }
    }
}

impl From<anyhow::Error> for RunError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CommandError>() {
            Ok(command) => RunError::Command(command),
            Err(other) => RunError::Handler(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let opt = Opt::both("count", 'n', "Repeat");
        assert_eq!(
            CommandError::MissingOperand(opt.clone()).to_string(),
            "Missing operand for -n, --count"
        );
        assert_eq!(
            CommandError::MissingOption(opt).to_string(),
            "Expected option -n, --count"
        );
        assert_eq!(
            CommandError::UnexpectedArgument("x".into()).to_string(),
            "Unexpected argument \"x\""
        );
        assert_eq!(
            CommandError::invalid_usage("too many").to_string(),
            "Invalid usage: too many"
        );
        assert_eq!(CommandError::other("boom").to_string(), "boom");
    }

    #[test]
    fn usage_classification() {
        assert!(CommandError::UnexpectedArgument("x".into()).is_usage_error());
        assert!(CommandError::invalid_usage("x").is_usage_error());
        assert!(!CommandError::EmptyInput.is_usage_error());
        assert!(!CommandError::other("x").is_usage_error());
        assert!(
            !CommandError::Conversion(ConversionError::new("x", "integer", &[])).is_usage_error()
        );
    }

    #[test]
    fn conversion_message() {
        let err = ConversionError::new("maybe", "boolean", &["yes", "no"]);
        assert_eq!(err.to_string(), "\"maybe\" cannot be converted to boolean");
        assert_eq!(err.examples(), &["yes", "no"]);
        assert_eq!(err.hint().as_deref(), Some("Examples: yes, no"));
        assert_eq!(ConversionError::new("x", "string", &[]).hint(), None);
    }

    #[test]
    fn handler_errors_expose_command_errors() {
        let wrapped = anyhow::Error::from(CommandError::invalid_usage("bad"));
        let run_error = RunError::Handler(wrapped);
        assert!(run_error.is_usage_error());
        assert_eq!(run_error.exit_code(), EXIT_USAGE);

        let plain = RunError::Handler(anyhow::anyhow!("disk full"));
        assert!(plain.command_error().is_none());
        assert_eq!(plain.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn from_anyhow_unwraps_command_errors() {
        let run_error = RunError::from(anyhow::Error::from(CommandError::EmptyInput));
        assert!(matches!(run_error, RunError::Command(CommandError::EmptyInput)));

        let run_error = RunError::from(anyhow::anyhow!("other"));
        assert!(matches!(run_error, RunError::Handler(_)));
    }

    #[test]
    fn conversion_error_is_found_through_handler() {
        let err = RunError::Handler(anyhow::Error::from(ConversionError::new(
            "x",
            "integer",
            &["1"],
        )));
        assert_eq!(err.conversion_error().unwrap().target(), "integer");
    }
}
