//! Pipeline stage tracking.

use serde::{Deserialize, Serialize};

/// Position in the provisioning pipeline.
///
/// Transitions are strictly forward; `Failed` is terminal and reachable
/// from any other stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Idle,
    IdentityResolved,
    ArtifactsWritten,
    Initialized,
    Planned,
    Applied,
    OutputsCaptured,
    DomainConfigured,
    CertificateBound,
    EndpointUpdated,
    VpnExported,
    Complete,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::IdentityResolved => "identity-resolved",
            Stage::ArtifactsWritten => "artifacts-written",
            Stage::Initialized => "initialized",
            Stage::Planned => "planned",
            Stage::Applied => "applied",
            Stage::OutputsCaptured => "outputs-captured",
            Stage::DomainConfigured => "domain-configured",
            Stage::CertificateBound => "certificate-bound",
            Stage::EndpointUpdated => "endpoint-updated",
            Stage::VpnExported => "vpn-exported",
            Stage::Complete => "complete",
            Stage::Failed => "failed",
        }
    }

    /// Check if the stage is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Complete | Stage::Failed)
    }

    fn ordinal(&self) -> usize {
        match self {
            Stage::Idle => 0,
            Stage::IdentityResolved => 1,
            Stage::ArtifactsWritten => 2,
            Stage::Initialized => 3,
            Stage::Planned => 4,
            Stage::Applied => 5,
            Stage::OutputsCaptured => 6,
            Stage::DomainConfigured => 7,
            Stage::CertificateBound => 8,
            Stage::EndpointUpdated => 9,
            Stage::VpnExported => 10,
            Stage::Complete => 11,
            Stage::Failed => 12,
        }
    }

    /// Check if a transition to `next` is legal.
    pub fn can_transition_to(&self, next: Stage) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Stage::Failed {
            return true;
        }
        next.ordinal() > self.ordinal()
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
