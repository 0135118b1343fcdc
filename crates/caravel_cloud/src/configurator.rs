//! The post-provisioning configuration chain.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use caravel_iac::{MissingOutputError, ProvisioningOutputs};
use caravel_prompt::{CheckpointGate, GateId, PromptError};

use crate::control::AzureControlPlane;
use crate::error::{CertificateLookupError, ControlPlaneError};

/// Local file the VPN client configuration is exported to.
pub const VPN_CLIENT_CONFIG_FILE: &str = "vpn-client-config.xml";

/// The custom-domain parameters collected at interview time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainBinding {
    /// Hostname to bind to the provisioned app service
    pub hostname: String,
    /// Path to the PFX certificate for the hostname
    pub certificate_path: PathBuf,
    /// Password protecting the certificate file
    pub certificate_password: String,
}

impl DomainBinding {
    pub fn new(
        hostname: impl Into<String>,
        certificate_path: impl Into<PathBuf>,
        certificate_password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            certificate_path: certificate_path.into(),
            certificate_password: certificate_password.into(),
        }
    }
}

/// One step of the post-provisioning chain, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigureStep {
    VerificationToken,
    DnsGate,
    BindHostname,
    UploadCertificate,
    ResolveThumbprint,
    BindCertificate,
    UpdateEndpoint,
    ExportVpnProfile,
}

impl ConfigureStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigureStep::VerificationToken => "verification-token",
            ConfigureStep::DnsGate => "dns-gate",
            ConfigureStep::BindHostname => "bind-hostname",
            ConfigureStep::UploadCertificate => "upload-certificate",
            ConfigureStep::ResolveThumbprint => "resolve-thumbprint",
            ConfigureStep::BindCertificate => "bind-certificate",
            ConfigureStep::UpdateEndpoint => "update-endpoint",
            ConfigureStep::ExportVpnProfile => "export-vpn-profile",
        }
    }

    /// The fixed execution order of the chain.
    pub fn order() -> Vec<ConfigureStep> {
        vec![
            ConfigureStep::VerificationToken,
            ConfigureStep::DnsGate,
            ConfigureStep::BindHostname,
            ConfigureStep::UploadCertificate,
            ConfigureStep::ResolveThumbprint,
            ConfigureStep::BindCertificate,
            ConfigureStep::UpdateEndpoint,
            ConfigureStep::ExportVpnProfile,
        ]
    }
}

impl std::fmt::Display for ConfigureStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// All eight steps completed.
    Completed,
    /// The operator declined the DNS checkpoint; later steps did not run.
    HaltedAtDnsGate,
}

/// A chain step failed; no later step was executed.
#[derive(Error, Debug)]
#[error("Post-provision step '{step}' failed: {source}")]
pub struct ConfigureError {
    pub step: ConfigureStep,
    #[source]
    pub source: ConfigureStepError,
}

impl ConfigureError {
    fn new(step: ConfigureStep, source: impl Into<ConfigureStepError>) -> Self {
        Self {
            step,
            source: source.into(),
        }
    }
}

/// Underlying cause of a chain failure.
#[derive(Error, Debug)]
pub enum ConfigureStepError {
    #[error(transparent)]
    ControlPlane(#[from] ControlPlaneError),

    #[error(transparent)]
    CertificateLookup(#[from] CertificateLookupError),

    #[error(transparent)]
    MissingOutput(#[from] MissingOutputError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Failed to write VPN client configuration: {0}")]
    VpnExport(#[from] std::io::Error),
}

/// Runs the ordered post-provisioning chain against the control plane.
///
/// Every step consumes fields of the captured provisioning outputs and
/// performs one external call; the first failure aborts the remainder and
/// surfaces the originating step.
pub struct PostProvisionConfigurator {
    control: AzureControlPlane,
    working_dir: PathBuf,
}

impl PostProvisionConfigurator {
    pub fn new(control: AzureControlPlane, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            control,
            working_dir: working_dir.into(),
        }
    }

    pub async fn run(
        &self,
        gate: &mut CheckpointGate,
        binding: &DomainBinding,
        outputs: &ProvisioningOutputs,
    ) -> Result<ConfigureOutcome, ConfigureError> {
        use ConfigureStep as Step;

        // 1. Resolve the domain verification token.
        let resource_group = field(outputs, "resource_group_name", Step::VerificationToken)?;
        let app_service = field(outputs, "app_service_name", Step::VerificationToken)?;
        let token = self
            .control
            .domain_verification_id(resource_group, app_service)
            .await
            .map_err(|e| ConfigureError::new(Step::VerificationToken, e))?;
        info!("Resolved domain verification token for {}", app_service);

        // 2. The workflow cannot verify DNS itself; the operator must
        //    create the records out of band and confirm.
        let firewall_ip = field(outputs, "firewall_pip", Step::DnsGate)?;
        let message = format!(
            "Create a TXT record 'asuid.{}' with value '{}' and an A record \
             pointing '{}' at {}. Are the DNS records in place?",
            binding.hostname, token, binding.hostname, firewall_ip
        );
        let approved = gate
            .ask(GateId::DnsRecordsCreated, &message)
            .map_err(|e| ConfigureError::new(Step::DnsGate, e))?;
        if !approved {
            info!("DNS checkpoint declined; leaving the domain unbound");
            return Ok(ConfigureOutcome::HaltedAtDnsGate);
        }

        // 3. Bind the custom hostname.
        self.control
            .add_hostname(resource_group, app_service, &binding.hostname)
            .await
            .map_err(|e| ConfigureError::new(Step::BindHostname, e))?;
        info!("Bound hostname {} to {}", binding.hostname, app_service);

        // 4. Upload the certificate.
        self.control
            .upload_certificate(
                resource_group,
                app_service,
                &binding.certificate_path,
                &binding.certificate_password,
            )
            .await
            .map_err(|e| ConfigureError::new(Step::UploadCertificate, e))?;

        // 5. Resolve the uploaded certificate's thumbprint. Zero or
        //    multiple matches must never bind an arbitrary certificate.
        let thumbprints = self
            .control
            .certificate_thumbprints(resource_group, &binding.hostname)
            .await
            .map_err(|e| ConfigureError::new(Step::ResolveThumbprint, e))?;
        let thumbprint = match thumbprints.as_slice() {
            [single] => single.clone(),
            [] => {
                return Err(ConfigureError::new(
                    Step::ResolveThumbprint,
                    CertificateLookupError::NoMatch {
                        hostname: binding.hostname.clone(),
                    },
                ))
            }
            many => {
                return Err(ConfigureError::new(
                    Step::ResolveThumbprint,
                    CertificateLookupError::Ambiguous {
                        hostname: binding.hostname.clone(),
                        count: many.len(),
                    },
                ))
            }
        };

        // 6. Bind the certificate with SNI.
        self.control
            .bind_certificate(resource_group, app_service, &thumbprint)
            .await
            .map_err(|e| ConfigureError::new(Step::BindCertificate, e))?;
        info!("Bound certificate {} with SNI", thumbprint);

        // 7. Repoint the bot's message endpoint at the custom hostname.
        let bot_service = field(outputs, "bot_service_name", Step::UpdateEndpoint)?;
        let endpoint = format!("https://{}/api/messages", binding.hostname);
        self.control
            .update_bot_endpoint(resource_group, bot_service, &endpoint)
            .await
            .map_err(|e| ConfigureError::new(Step::UpdateEndpoint, e))?;
        info!("Bot endpoint updated to {}", endpoint);

        // 8. Export the VPN client configuration.
        let gateway = field(outputs, "vnet_gateway_name", Step::ExportVpnProfile)?;
        let profile = self
            .control
            .generate_vpn_client_config(resource_group, gateway)
            .await
            .map_err(|e| ConfigureError::new(Step::ExportVpnProfile, e))?;
        let export_path = self.working_dir.join(VPN_CLIENT_CONFIG_FILE);
        fs::write(&export_path, profile)
            .map_err(|e| ConfigureError::new(Step::ExportVpnProfile, e))?;
        info!("VPN client configuration exported to {:?}", export_path);

        Ok(ConfigureOutcome::Completed)
    }
}

fn field<'a>(
    outputs: &'a ProvisioningOutputs,
    name: &str,
    step: ConfigureStep,
) -> Result<&'a str, ConfigureError> {
    outputs
        .field_str(name)
        .map_err(|e| ConfigureError::new(step, e))
}
