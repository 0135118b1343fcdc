//! Error types for process execution.

use thiserror::Error;

/// Result type alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors that can occur when running external processes.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process '{program}' was terminated by a signal")]
    Terminated { program: String },

    #[error("Simulated failure: {0}")]
    Simulated(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
