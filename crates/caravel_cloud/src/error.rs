//! Error types for cloud operations.

use thiserror::Error;

use caravel_prompt::PromptError;
use caravel_runner::RunnerError;

/// Errors establishing the cloud identity context.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Failed to list cloud accounts: {0}")]
    ListFailed(String),

    #[error("Interactive login failed with exit code {0}")]
    LoginFailed(i32),

    #[error("No cloud accounts available after login")]
    NoAccounts,

    #[error("Failed to set active account '{account}': {detail}")]
    SetFailed { account: String, detail: String },

    #[error("Account selection failed: {0}")]
    Prompt(#[from] PromptError),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),
}

/// Errors from cloud control-plane calls.
#[derive(Error, Debug)]
pub enum ControlPlaneError {
    #[error("Control-plane operation '{operation}' failed: {detail}")]
    OperationFailed {
        operation: &'static str,
        detail: String,
    },

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),
}

/// The uploaded certificate could not be resolved to exactly one
/// thumbprint for the target hostname. The workflow never binds an
/// arbitrary certificate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CertificateLookupError {
    #[error("No uploaded certificate matches hostname '{hostname}'")]
    NoMatch { hostname: String },

    #[error("{count} certificates match hostname '{hostname}'")]
    Ambiguous { hostname: String, count: usize },
}
