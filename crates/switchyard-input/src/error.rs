//! Error types for prompts.

/// Errors that can occur while prompting.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Input ended (Ctrl+D or closed stdin) before an answer was given.
    #[error("Prompt cancelled by user.")]
    PromptCancelled,

    /// Reading from or writing to the terminal failed.
    #[error("Prompt failed: {0}")]
    PromptFailed(#[source] std::io::Error),

    /// A selection prompt had nothing to choose from.
    #[error("Nothing to select from.")]
    NoOptions,
}
