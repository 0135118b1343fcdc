//! Cloud account/subscription resolution.

use std::sync::Arc;

use tracing::{debug, info};

use caravel_prompt::{Prompter, Question};
use caravel_runner::{CommandSpec, ProcessRunner};

use crate::error::IdentityError;

const SUBSCRIPTION_QUESTION: &str = "subscription_id";

/// Establishes and validates the active cloud account context.
pub struct IdentityResolver {
    runner: Arc<dyn ProcessRunner>,
    prompter: Arc<dyn Prompter>,
    login_tenant: Option<String>,
}

impl IdentityResolver {
    pub fn new(runner: Arc<dyn ProcessRunner>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            runner,
            prompter,
            login_tenant: None,
        }
    }

    /// Direct the interactive login at a specific tenant.
    pub fn with_login_tenant(mut self, tenant: Option<String>) -> Self {
        self.login_tenant = tenant;
        self
    }

    /// Resolve the active subscription id.
    ///
    /// Lists known accounts; if none exist, runs an interactive login on
    /// the controlling terminal (blocking until it completes or fails)
    /// and lists again. An already-active account is returned without
    /// prompting. With candidates but no active account, the operator
    /// chooses one and the choice is committed.
    ///
    /// Side effect: `login` and the committed selection mutate the
    /// ambient cloud CLI's persisted active-account state.
    pub async fn resolve(&self) -> Result<String, IdentityError> {
        let mut candidates = self.list_accounts().await?;

        if candidates.is_empty() {
            info!("No cloud accounts found; starting interactive login");
            self.login().await?;
            candidates = self.list_accounts().await?;
            if candidates.is_empty() {
                return Err(IdentityError::NoAccounts);
            }
        }

        if let Some(active) = self.active_account().await? {
            debug!("Using active subscription {}", active);
            return Ok(active);
        }

        let answers = self.prompter.ask(&[Question::select(
            SUBSCRIPTION_QUESTION,
            "Select a subscription:",
            candidates,
        )])?;
        let chosen = answers.text(SUBSCRIPTION_QUESTION)?.to_string();

        self.set_active(&chosen).await?;
        info!("Active subscription set to {}", chosen);
        Ok(chosen)
    }

    async fn list_accounts(&self) -> Result<Vec<String>, IdentityError> {
        let spec = CommandSpec::new("az").args(["account", "list", "--query", "[].id", "-o", "tsv"]);
        let result = self.runner.run_captured(&spec).await?;
        if !result.success() {
            return Err(IdentityError::ListFailed(result.stderr.trim().to_string()));
        }
        Ok(result
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// The currently active subscription, if the CLI has one set.
    async fn active_account(&self) -> Result<Option<String>, IdentityError> {
        let spec = CommandSpec::new("az").args(["account", "show", "--query", "id", "-o", "tsv"]);
        let result = self.runner.run_captured(&spec).await?;
        if !result.success() {
            // The CLI reports an error when no account context exists.
            return Ok(None);
        }
        let id = result.stdout.trim();
        if id.is_empty() {
            Ok(None)
        } else {
            Ok(Some(id.to_string()))
        }
    }

    async fn login(&self) -> Result<(), IdentityError> {
        let mut spec = CommandSpec::new("az").arg("login");
        if let Some(tenant) = &self.login_tenant {
            spec = spec.args(["--tenant", tenant.as_str()]);
        }
        let result = self.runner.run_interactive(&spec).await?;
        if !result.success() {
            return Err(IdentityError::LoginFailed(result.exit_code));
        }
        Ok(())
    }

    async fn set_active(&self, account: &str) -> Result<(), IdentityError> {
        let spec = CommandSpec::new("az").args(["account", "set", "--subscription", account]);
        let result = self.runner.run_captured(&spec).await?;
        if !result.success() {
            return Err(IdentityError::SetFailed {
                account: account.to_string(),
                detail: result.stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}
