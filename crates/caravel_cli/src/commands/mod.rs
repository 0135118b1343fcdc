//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod create;
pub mod provision;

#[derive(Parser)]
#[command(
    name = "caravel",
    about = "Interactive scaffolder for cloud reference architectures",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Provision infrastructure for a reference architecture
    Provision(provision::ProvisionArgs),

    /// Provision infrastructure, then scaffold the application template
    Create(create::CreateArgs),
}
