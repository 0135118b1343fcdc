//! Provision command - run the provisioning pipeline on its own.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use caravel_cloud::DomainBinding;
use caravel_core::{
    ProvisionOrchestrator, ReferenceArchitecture, RunOutcome, RunReport, SessionSettings,
};
use caravel_prompt::{Prompter, Question, TerminalPrompter};
use caravel_runner::ShellRunner;

#[derive(Args)]
pub struct ProvisionArgs {
    /// Project name, used as the cloud resource prefix
    #[arg(short, long)]
    pub name: Option<String>,

    /// Reference architecture (secure-aml, secure-teams-copilot)
    #[arg(short, long)]
    pub architecture: Option<String>,

    /// Custom domain to bind to the provisioned application
    #[arg(long)]
    pub custom_domain: Option<String>,

    /// Path to the PFX certificate for the custom domain
    #[arg(long, requires = "custom_domain")]
    pub certificate: Option<PathBuf>,

    /// Environment variable holding the certificate password
    #[arg(long, default_value = "CARAVEL_CERT_PASSWORD")]
    pub certificate_password_env: String,

    /// Tenant for the interactive cloud login
    #[arg(long, env = "CARAVEL_TENANT")]
    pub tenant: Option<String>,

    /// Directory the IaC artifacts are written to (defaults to the
    /// current directory)
    #[arg(long)]
    pub working_dir: Option<PathBuf>,
}

pub async fn execute(args: ProvisionArgs) -> Result<()> {
    let prompter = Arc::new(TerminalPrompter::new());
    let settings = build_settings(&args, prompter.as_ref())?;

    info!(
        "Provisioning '{}' ({})",
        settings.project_name, settings.architecture
    );

    let report = ProvisionOrchestrator::new(Arc::new(ShellRunner::new()), prompter, settings)
        .run()
        .await?;

    print_report(&report);
    Ok(())
}

/// Build the immutable session settings, interviewing the operator for
/// anything the flags did not supply.
pub fn build_settings(args: &ProvisionArgs, prompter: &dyn Prompter) -> Result<SessionSettings> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => {
            let answers = prompter.ask(&[Question::input_with_default(
                "project_name",
                "What is your project name?",
                "my-project",
            )])?;
            answers.text("project_name")?.to_string()
        }
    };

    let architecture = match &args.architecture {
        Some(value) => ReferenceArchitecture::from_str(value)
            .with_context(|| format!("Unknown reference architecture: {}", value))?,
        None => {
            let choices: Vec<String> = ReferenceArchitecture::all()
                .iter()
                .map(|a| a.display_name().to_string())
                .collect();
            let answers = prompter.ask(&[Question::select(
                "architecture",
                "Please select a reference architecture:",
                choices,
            )])?;
            ReferenceArchitecture::from_str(answers.text("architecture")?)
                .context("Unknown reference architecture selected")?
        }
    };

    let working_dir = match &args.working_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    let mut settings = SessionSettings::new(name, architecture, working_dir);

    if let Some(hostname) = &args.custom_domain {
        let certificate = args
            .certificate
            .as_ref()
            .context("--certificate is required with --custom-domain")?;
        let password = std::env::var(&args.certificate_password_env).with_context(|| {
            format!(
                "Certificate password not found in ${}",
                args.certificate_password_env
            )
        })?;
        settings = settings.with_domain(DomainBinding::new(hostname, certificate, password));
    }

    if let Some(tenant) = &args.tenant {
        settings = settings.with_login_tenant(tenant);
    }

    Ok(settings)
}

pub fn print_report(report: &RunReport) {
    match &report.outcome {
        RunOutcome::Completed => {
            println!("✅ Provisioning complete for '{}'", report.project_name);
            if !report.outputs.is_empty() {
                println!("Captured outputs: {}", report.outputs.names().join(", "));
            }
        }
        RunOutcome::HaltedByUser { gate } => {
            println!(
                "🛑 Run stopped by user decision at checkpoint '{}' (stage reached: {})",
                gate, report.stage
            );
        }
    }
}
