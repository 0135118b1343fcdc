//! Checkpoint gates: blocking human go/no-go decisions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PromptResult;
use crate::question::{Prompter, Question};

/// Identifies a checkpoint in the provisioning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateId {
    /// Before `terraform apply`: the destructive/billable transition.
    ApplyInfrastructure,
    /// Before binding the custom domain: external DNS records must exist.
    DnsRecordsCreated,
}

impl GateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateId::ApplyInfrastructure => "apply-infrastructure",
            GateId::DnsRecordsCreated => "dns-records-created",
        }
    }
}

impl std::fmt::Display for GateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded human decision at a gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateDecision {
    pub gate: GateId,
    pub approved: bool,
}

/// Pauses the pipeline for an explicit human decision.
///
/// `ask` blocks until the operator answers; there is no timeout and no
/// default. A negative answer is not an error: callers treat it as
/// "halt this branch cleanly".
pub struct CheckpointGate {
    prompter: Arc<dyn Prompter>,
    decisions: Vec<GateDecision>,
}

impl CheckpointGate {
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self {
            prompter,
            decisions: Vec::new(),
        }
    }

    /// Ask the operator for a go/no-go decision and record it.
    pub fn ask(&mut self, gate: GateId, message: &str) -> PromptResult<bool> {
        info!("Checkpoint '{}': waiting for operator decision", gate);
        let answers = self
            .prompter
            .ask(&[Question::confirm(gate.as_str(), message)])?;
        let approved = answers.confirmed(gate.as_str())?;
        self.decisions.push(GateDecision { gate, approved });
        info!(
            "Checkpoint '{}': {}",
            gate,
            if approved { "approved" } else { "declined" }
        );
        Ok(approved)
    }

    /// The most recent decision recorded for a gate, if any.
    pub fn decision(&self, gate: GateId) -> Option<GateDecision> {
        self.decisions.iter().rev().find(|d| d.gate == gate).copied()
    }

    /// All decisions recorded so far, in order.
    pub fn decisions(&self) -> &[GateDecision] {
        &self.decisions
    }
}
