//! Thin wrapper around the cloud control-plane CLI.
//!
//! One method per control-plane operation, each a single external call
//! with discrete arguments. Domain decisions over the returned values
//! (which thumbprint to bind, when to abort) live in the configurator.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use caravel_runner::{CommandSpec, ProcessRunner};

use crate::error::ControlPlaneError;

/// Azure control-plane client.
pub struct AzureControlPlane {
    runner: Arc<dyn ProcessRunner>,
}

impl AzureControlPlane {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// The custom-domain verification token of an app service.
    pub async fn domain_verification_id(
        &self,
        resource_group: &str,
        app_service: &str,
    ) -> Result<String, ControlPlaneError> {
        let stdout = self
            .run(
                "show-verification-id",
                CommandSpec::new("az").args([
                    "webapp",
                    "show",
                    "--resource-group",
                    resource_group,
                    "--name",
                    app_service,
                    "--query",
                    "customDomainVerificationId",
                    "-o",
                    "tsv",
                ]),
            )
            .await?;
        Ok(stdout.trim().to_string())
    }

    /// Bind a custom hostname to an app service.
    pub async fn add_hostname(
        &self,
        resource_group: &str,
        app_service: &str,
        hostname: &str,
    ) -> Result<(), ControlPlaneError> {
        self.run(
            "add-hostname",
            CommandSpec::new("az").args([
                "webapp",
                "config",
                "hostname",
                "add",
                "--resource-group",
                resource_group,
                "--webapp-name",
                app_service,
                "--hostname",
                hostname,
            ]),
        )
        .await?;
        Ok(())
    }

    /// Upload a certificate to an app service.
    pub async fn upload_certificate(
        &self,
        resource_group: &str,
        app_service: &str,
        certificate_path: &Path,
        certificate_password: &str,
    ) -> Result<(), ControlPlaneError> {
        let certificate_file = certificate_path.display().to_string();
        self.run(
            "upload-certificate",
            CommandSpec::new("az").args([
                "webapp",
                "config",
                "ssl",
                "upload",
                "--resource-group",
                resource_group,
                "--name",
                app_service,
                "--certificate-file",
                certificate_file.as_str(),
                "--certificate-password",
                certificate_password,
            ]),
        )
        .await?;
        Ok(())
    }

    /// Thumbprints of uploaded certificates covering a hostname.
    pub async fn certificate_thumbprints(
        &self,
        resource_group: &str,
        hostname: &str,
    ) -> Result<Vec<String>, ControlPlaneError> {
        let query = format!("[?contains(hostNames, '{}')].thumbprint", hostname);
        let stdout = self
            .run(
                "list-certificates",
                CommandSpec::new("az").args([
                    "webapp",
                    "config",
                    "ssl",
                    "list",
                    "--resource-group",
                    resource_group,
                    "--query",
                    query.as_str(),
                    "-o",
                    "tsv",
                ]),
            )
            .await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Bind a certificate thumbprint to an app service with SNI.
    pub async fn bind_certificate(
        &self,
        resource_group: &str,
        app_service: &str,
        thumbprint: &str,
    ) -> Result<(), ControlPlaneError> {
        self.run(
            "bind-certificate",
            CommandSpec::new("az").args([
                "webapp",
                "config",
                "ssl",
                "bind",
                "--resource-group",
                resource_group,
                "--name",
                app_service,
                "--certificate-thumbprint",
                thumbprint,
                "--ssl-type",
                "SNI",
            ]),
        )
        .await?;
        Ok(())
    }

    /// Repoint a bot service's message endpoint.
    pub async fn update_bot_endpoint(
        &self,
        resource_group: &str,
        bot_service: &str,
        endpoint: &str,
    ) -> Result<(), ControlPlaneError> {
        self.run(
            "update-bot-endpoint",
            CommandSpec::new("az").args([
                "bot",
                "update",
                "--resource-group",
                resource_group,
                "--name",
                bot_service,
                "--endpoint",
                endpoint,
            ]),
        )
        .await?;
        Ok(())
    }

    /// Generate the VPN client configuration for a virtual network
    /// gateway. Returns the CLI's response; the caller persists it.
    pub async fn generate_vpn_client_config(
        &self,
        resource_group: &str,
        gateway: &str,
    ) -> Result<String, ControlPlaneError> {
        self.run(
            "generate-vpn-client-config",
            CommandSpec::new("az").args([
                "network",
                "vnet-gateway",
                "vpn-client",
                "generate",
                "--resource-group",
                resource_group,
                "--name",
                gateway,
                "-o",
                "tsv",
            ]),
        )
        .await
    }

    async fn run(
        &self,
        operation: &'static str,
        spec: CommandSpec,
    ) -> Result<String, ControlPlaneError> {
        debug!("Control plane: {}", spec.display_line());
        let result = self.runner.run_captured(&spec).await?;
        if !result.success() {
            return Err(ControlPlaneError::OperationFailed {
                operation,
                detail: result.combined_output().trim().to_string(),
            });
        }
        Ok(result.stdout)
    }
}
