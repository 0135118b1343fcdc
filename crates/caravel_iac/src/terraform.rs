//! Thin wrapper around the Terraform engine.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use caravel_runner::{CommandSpec, ProcessRunner};

use crate::error::{IacError, IacResult};
use crate::outputs::ProvisioningOutputs;

/// Plan/apply controller for the IaC engine.
///
/// Each operation is one external invocation. `init`, `plan`, and `apply`
/// run with the engine's streams attached to the controlling terminal so
/// the operator can watch progress and answer engine prompts; the
/// controller never inspects or branches on engine output content.
pub struct TerraformCli {
    runner: Arc<dyn ProcessRunner>,
    working_dir: PathBuf,
}

impl TerraformCli {
    pub fn new(runner: Arc<dyn ProcessRunner>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            working_dir: working_dir.into(),
        }
    }

    /// Run `terraform init` against the generated artifacts.
    pub async fn init(&self) -> IacResult<()> {
        info!("Running terraform init in {:?}", self.working_dir);
        let result = self.runner.run_interactive(&self.command(["init"])).await?;
        if !result.success() {
            return Err(IacError::InitFailed(result.exit_code));
        }
        Ok(())
    }

    /// Run `terraform plan` with the given variable file. The change-set
    /// is shown on the terminal, not parsed.
    pub async fn plan(&self, vars_file: &str) -> IacResult<()> {
        info!("Running terraform plan in {:?}", self.working_dir);
        let var_file_arg = format!("-var-file={}", vars_file);
        let spec = self.command(["plan", var_file_arg.as_str()]);
        let result = self.runner.run_interactive(&spec).await?;
        if !result.success() {
            return Err(IacError::PlanFailed(result.exit_code));
        }
        Ok(())
    }

    /// Run `terraform apply` unattended. Approval is enforced by the
    /// workflow's own checkpoint gate, never by the engine.
    pub async fn apply(&self, vars_file: &str) -> IacResult<()> {
        info!("Running terraform apply in {:?}", self.working_dir);
        let var_file_arg = format!("-var-file={}", vars_file);
        let spec = self.command(["apply", var_file_arg.as_str(), "-auto-approve"]);
        let result = self.runner.run_interactive(&spec).await?;
        if !result.success() {
            return Err(IacError::ApplyFailed(result.exit_code));
        }
        Ok(())
    }

    /// Query the engine's structured outputs.
    ///
    /// Best-effort: invocation or parse failure degrades to an empty
    /// mapping so the operator still has the engine output on the
    /// terminal. Missing-field strictness is enforced at lookup time by
    /// [`ProvisioningOutputs::field`].
    pub async fn read_outputs(&self) -> ProvisioningOutputs {
        let spec = self.command(["output", "-json"]);
        match self.runner.run_captured(&spec).await {
            Ok(result) if result.success() => ProvisioningOutputs::capture(&result.stdout),
            Ok(result) => {
                warn!(
                    "terraform output exited with code {}; continuing without structured outputs",
                    result.exit_code
                );
                ProvisioningOutputs::empty()
            }
            Err(e) => {
                warn!("Could not query provisioning outputs: {}", e);
                ProvisioningOutputs::empty()
            }
        }
    }

    fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("terraform")
            .args(args)
            .current_dir(&self.working_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravel_runner::{CallMode, MockResponse, MockRunner};

    fn terraform_with(runner: &MockRunner) -> TerraformCli {
        TerraformCli::new(Arc::new(runner.clone()), "/work")
    }

    #[tokio::test]
    async fn test_init_runs_interactively() {
        let runner = MockRunner::new();
        terraform_with(&runner).init().await.unwrap();

        let calls = runner.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].mode, CallMode::Interactive);
        assert_eq!(calls[0].display_line(), "terraform init");
    }

    #[tokio::test]
    async fn test_init_nonzero_exit_is_fatal() {
        let runner = MockRunner::new().add_response(MockResponse::failure(1, "backend error"));
        let err = terraform_with(&runner).init().await.unwrap_err();
        assert!(matches!(err, IacError::InitFailed(1)));
    }

    #[tokio::test]
    async fn test_plan_passes_vars_file() {
        let runner = MockRunner::new();
        terraform_with(&runner).plan("terraform.tfvars").await.unwrap();

        let calls = runner.get_calls();
        assert_eq!(
            calls[0].args,
            vec!["plan", "-var-file=terraform.tfvars"]
        );
    }

    #[tokio::test]
    async fn test_apply_is_unattended() {
        let runner = MockRunner::new();
        terraform_with(&runner).apply("terraform.tfvars").await.unwrap();

        let calls = runner.get_calls();
        assert!(calls[0].args.contains(&"-auto-approve".to_string()));
        assert_eq!(calls[0].mode, CallMode::Interactive);
    }

    #[tokio::test]
    async fn test_read_outputs_parses_mapping() {
        let raw = r#"{"resource_group_name":{"value":"rg1"}}"#;
        let runner = MockRunner::new().add_response(MockResponse::success(raw));

        let outputs = terraform_with(&runner).read_outputs().await;
        assert_eq!(outputs.field_str("resource_group_name").unwrap(), "rg1");

        let calls = runner.get_calls();
        assert_eq!(calls[0].mode, CallMode::Captured);
        assert_eq!(calls[0].args, vec!["output", "-json"]);
    }

    #[tokio::test]
    async fn test_read_outputs_degrades_on_failure() {
        let runner = MockRunner::new().add_response(MockResponse::failure(1, "no state"));
        let outputs = terraform_with(&runner).read_outputs().await;
        assert!(outputs.is_empty());
    }

    #[tokio::test]
    async fn test_read_outputs_degrades_on_runner_error() {
        let runner = MockRunner::new().simulate_failure("spawn failed");
        let outputs = terraform_with(&runner).read_outputs().await;
        assert!(outputs.is_empty());
    }
}
