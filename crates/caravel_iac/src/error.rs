//! Error types for IaC operations.

use thiserror::Error;

use caravel_runner::RunnerError;

/// Result type alias for IaC operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors that can occur while generating artifacts or driving the engine.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Failed to write IaC artifact '{file}': {source}")]
    ArtifactWrite {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Terraform init failed with exit code {0}")]
    InitFailed(i32),

    #[error("Terraform plan failed with exit code {0}")]
    PlanFailed(i32),

    #[error("Terraform apply failed with exit code {0}")]
    ApplyFailed(i32),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),
}

/// A post-provisioning step referenced an output name that the apply run
/// did not produce. Raised instead of ever substituting a placeholder,
/// since output values are interpolated into control-plane calls.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Provisioning output '{0}' was not produced by apply")]
pub struct MissingOutputError(pub String);
