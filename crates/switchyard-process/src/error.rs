use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while locating, launching or waiting for a process.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Nothing exists at the resolved path, or the name is not on `PATH`.
    #[error("No such file at \"{}\"", .0.display())]
    FileNotFound(PathBuf),

    /// The path exists but cannot be executed.
    #[error("Launch path \"{}\" is not an executable", .0.display())]
    NotExecutable(PathBuf),

    /// No executable was given.
    #[error("Missing launch path")]
    InvalidLaunchPath,

    /// A command line could not be split into words.
    #[error("Cannot parse command line: {0}")]
    InvalidCommandLine(#[from] shell_words::ParseError),

    /// The process finished with a non-zero status.
    ///
    /// `reason` is the trimmed standard error, or the trimmed standard output
    /// when standard error was empty.
    #[error("{}", describe_exit(.code, .reason))]
    UnsuccessfulExit {
        code: Option<i32>,
        reason: Option<String>,
    },

    #[error("Command `{0}` timed out after {1:?}")]
    Timeout(String, Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>, reason: &Option<String>) -> String {
    match (reason, code) {
        (Some(reason), _) => reason.clone(),
        (None, Some(code)) => format!("Process finished with non-zero exit value {}", code),
        (None, None) => "Process was terminated by a signal".to_string(),
    }
}

impl ProcessError {
    /// Exit status of an [`UnsuccessfulExit`](Self::UnsuccessfulExit).
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessError::UnsuccessfulExit { code, .. } => *code,
            _ => None,
        }
    }
}
