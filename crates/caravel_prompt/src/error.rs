//! Error types for the prompt module.

use thiserror::Error;

/// Result type alias for prompt operations.
pub type PromptResult<T> = Result<T, PromptError>;

/// Errors that can occur while asking questions.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Input stream closed before a question was answered")]
    InputClosed,

    #[error("No answer recorded for question '{0}'")]
    MissingAnswer(String),

    #[error("Answer for '{name}' is not a {expected}")]
    WrongAnswerKind { name: String, expected: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
