//! # caravel_core
//!
//! The provisioning workflow engine for Caravel.
//!
//! One linear pipeline with one optional branch: resolve the cloud
//! identity, generate the IaC artifacts, init/plan, pause for a human
//! apply decision, apply and capture outputs, then (when a custom domain
//! was requested) run the post-provisioning chain with its own DNS
//! checkpoint. No persistence, no retries, no parallelism.

pub mod context;
pub mod error;
pub mod orchestrator;
pub mod stage;

pub use context::{ReferenceArchitecture, SessionSettings};
pub use error::{CoreResult, ProvisionFailure, StepError};
pub use orchestrator::{ProvisionOrchestrator, RunOutcome, RunReport};
pub use stage::Stage;
