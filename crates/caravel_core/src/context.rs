//! Per-run session parameters.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use caravel_cloud::DomainBinding;

/// A provisionable reference architecture from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceArchitecture {
    SecureAml,
    SecureTeamsCopilot,
}

impl ReferenceArchitecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceArchitecture::SecureAml => "secure-aml",
            ReferenceArchitecture::SecureTeamsCopilot => "secure-teams-copilot",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "secure-aml" | "secureaml" => Some(ReferenceArchitecture::SecureAml),
            "secure-teams-copilot" | "secure teams copilot" => {
                Some(ReferenceArchitecture::SecureTeamsCopilot)
            }
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            ReferenceArchitecture::SecureAml,
            ReferenceArchitecture::SecureTeamsCopilot,
        ]
    }

    /// Name shown in the interview.
    pub fn display_name(&self) -> &'static str {
        match self {
            ReferenceArchitecture::SecureAml => "SecureAML",
            ReferenceArchitecture::SecureTeamsCopilot => "Secure Teams CoPilot",
        }
    }

    /// Terraform module source for the architecture's infrastructure.
    pub fn module_source(&self) -> &'static str {
        match self {
            ReferenceArchitecture::SecureAml => "github.com/caravel-tools/ref-secure-aml",
            ReferenceArchitecture::SecureTeamsCopilot => {
                "github.com/caravel-tools/ref-secure-teams-copilot"
            }
        }
    }

    /// Application template repository cloned after provisioning.
    pub fn template_repo(&self) -> &'static str {
        match self {
            ReferenceArchitecture::SecureAml => {
                "https://github.com/caravel-tools/template-secure-aml.git"
            }
            ReferenceArchitecture::SecureTeamsCopilot => {
                "https://github.com/caravel-tools/template-secure-teams-copilot.git"
            }
        }
    }
}

impl std::fmt::Display for ReferenceArchitecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable per-run parameters, collected once at interview time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Project name, used as the resource prefix
    pub project_name: String,
    /// Chosen reference architecture
    pub architecture: ReferenceArchitecture,
    /// Custom domain parameters; absent skips the post-provision chain
    pub domain: Option<DomainBinding>,
    /// Tenant forwarded to the interactive login, if any
    pub login_tenant: Option<String>,
    /// Directory the IaC artifacts and exports are written to
    pub working_dir: PathBuf,
}

impl SessionSettings {
    pub fn new(
        project_name: impl Into<String>,
        architecture: ReferenceArchitecture,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            architecture,
            domain: None,
            login_tenant: None,
            working_dir: working_dir.into(),
        }
    }

    /// Request the custom-domain post-provision chain.
    pub fn with_domain(mut self, domain: DomainBinding) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_login_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.login_tenant = Some(tenant.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_from_str() {
        assert_eq!(
            ReferenceArchitecture::from_str("secure-aml"),
            Some(ReferenceArchitecture::SecureAml)
        );
        assert_eq!(
            ReferenceArchitecture::from_str("Secure Teams CoPilot"),
            Some(ReferenceArchitecture::SecureTeamsCopilot)
        );
        assert_eq!(ReferenceArchitecture::from_str("unknown"), None);
    }

    #[test]
    fn test_session_settings_builder() {
        let settings = SessionSettings::new(
            "my-project",
            ReferenceArchitecture::SecureAml,
            "/work",
        )
        .with_domain(DomainBinding::new("bot.example.com", "/certs/bot.pfx", "pw"))
        .with_login_tenant("contoso.example");

        assert_eq!(settings.project_name, "my-project");
        assert!(settings.domain.is_some());
        assert_eq!(settings.login_tenant.as_deref(), Some("contoso.example"));
    }
}
