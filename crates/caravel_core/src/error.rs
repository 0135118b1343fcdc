//! Error types for the workflow core.

use thiserror::Error;

use caravel_cloud::{ConfigureError, IdentityError};
use caravel_iac::{IacError, MissingOutputError};
use caravel_prompt::PromptError;

use crate::stage::Stage;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, ProvisionFailure>;

/// Underlying cause of a run failure.
#[derive(Error, Debug)]
pub enum StepError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Iac(#[from] IacError),

    #[error(transparent)]
    Output(#[from] MissingOutputError),

    #[error(transparent)]
    Configure(#[from] ConfigureError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// A fatal run failure, surfaced with the stage the run had reached.
///
/// Distinct from a user-declined checkpoint, which halts the run cleanly
/// and is reported through the run outcome, not as an error.
#[derive(Error, Debug)]
#[error("Provisioning failed at stage '{stage}': {source}")]
pub struct ProvisionFailure {
    pub stage: Stage,
    #[source]
    pub source: StepError,
}

impl ProvisionFailure {
    pub fn new(stage: Stage, source: impl Into<StepError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
