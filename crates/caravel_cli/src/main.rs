//! Caravel CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success (including runs halted by an operator decision)
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Identity error
//! - 4: IaC error
//! - 5: Control-plane error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use caravel_core::{ProvisionFailure, StepError};
use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const IDENTITY_ERROR: u8 = 3;
    pub const IAC_ERROR: u8 = 4;
    pub const CONTROL_PLANE_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive("caravel=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Provision(args) => commands::provision::execute(args).await,
        Commands::Create(args) => commands::create::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(failure) = e.downcast_ref::<ProvisionFailure>() {
        return match failure.source {
            StepError::Identity(_) => ExitCodes::IDENTITY_ERROR,
            StepError::Iac(_) | StepError::Output(_) => ExitCodes::IAC_ERROR,
            StepError::Configure(_) => ExitCodes::CONTROL_PLANE_ERROR,
            StepError::Prompt(_) => ExitCodes::GENERAL_ERROR,
        };
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("argument") || msg.contains("required with") || msg.contains("unknown") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
