//! Error types for project scaffolding.

use std::path::PathBuf;

use thiserror::Error;

use caravel_runner::RunnerError;

/// Result type alias for scaffold operations.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Errors that can occur while materializing the application template.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Failed to clone template '{repo}': {detail}")]
    CloneFailed { repo: String, detail: String },

    #[error("Project directory already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("Dependency install failed with exit code {0}")]
    InstallFailed(i32),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Package manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}
