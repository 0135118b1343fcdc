//! Create command - provision infrastructure and scaffold the
//! application template around it.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use caravel_core::ProvisionOrchestrator;
use caravel_prompt::TerminalPrompter;
use caravel_runner::{ProcessRunner, ShellRunner};
use caravel_scaffold::{rename_package, write_deploy_script, DependencyInstaller, TemplateFetcher};

use super::provision::{build_settings, print_report, ProvisionArgs};

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub provision: ProvisionArgs,

    /// Skip dependency installation after cloning the template
    #[arg(long)]
    pub skip_install: bool,
}

pub async fn execute(args: CreateArgs) -> Result<()> {
    let prompter = Arc::new(TerminalPrompter::new());
    let runner: Arc<dyn ProcessRunner> = Arc::new(ShellRunner::new());

    let settings = build_settings(&args.provision, prompter.as_ref())?;
    let project_name = settings.project_name.clone();
    let architecture = settings.architecture;
    let working_dir = settings.working_dir.clone();

    let report = ProvisionOrchestrator::new(runner.clone(), prompter, settings)
        .run()
        .await?;
    print_report(&report);

    if report.user_halted() {
        // Nothing was provisioned; there is nothing to scaffold against.
        return Ok(());
    }

    let destination = working_dir.join(&project_name);
    info!("Scaffolding application template into {:?}", destination);

    TemplateFetcher::new(runner.clone())
        .fetch(architecture.template_repo(), &destination)
        .await
        .context("Failed to clone the application template")?;

    rename_package(&destination, &project_name)
        .context("Failed to update the package manifest")?;

    let resource_group = report.outputs.field_str("resource_group_name")?;
    let app_service = report.outputs.field_str("app_service_name")?;
    write_deploy_script(&destination, resource_group, app_service)
        .context("Failed to write the deploy script")?;

    if !args.skip_install {
        DependencyInstaller::new(runner)
            .install(&destination)
            .await
            .context("Failed to install dependencies")?;
    }

    println!("✅ Application '{}' created at {:?}", project_name, destination);
    println!();
    println!("Next steps:");
    println!("  cd {}", project_name);
    println!("  ./deploy.sh");

    Ok(())
}
