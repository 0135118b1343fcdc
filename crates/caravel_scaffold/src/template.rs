//! Template repository cloning.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use caravel_runner::{CommandSpec, ProcessRunner};

use crate::error::{ScaffoldError, ScaffoldResult};

/// Clones application template repositories.
pub struct TemplateFetcher {
    runner: Arc<dyn ProcessRunner>,
}

impl TemplateFetcher {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Shallow-clone a template into `destination` and detach it from
    /// its origin by stripping the `.git` directory.
    pub async fn fetch(&self, repo: &str, destination: &Path) -> ScaffoldResult<()> {
        if destination.exists() {
            return Err(ScaffoldError::DestinationExists(destination.to_path_buf()));
        }

        info!("Cloning template {} into {:?}", repo, destination);
        let destination_arg = destination.display().to_string();
        let spec = CommandSpec::new("git").args([
            "clone",
            "--depth",
            "1",
            repo,
            destination_arg.as_str(),
        ]);
        let result = self.runner.run_captured(&spec).await?;
        if !result.success() {
            return Err(ScaffoldError::CloneFailed {
                repo: repo.to_string(),
                detail: result.stderr.trim().to_string(),
            });
        }

        let git_dir = destination.join(".git");
        if git_dir.exists() {
            fs::remove_dir_all(&git_dir)?;
        }
        Ok(())
    }
}
