//! Dependency installation for scaffolded projects.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use caravel_runner::{CommandSpec, ProcessRunner};

use crate::error::{ScaffoldError, ScaffoldResult};

/// Installs the scaffolded project's dependencies.
pub struct DependencyInstaller {
    runner: Arc<dyn ProcessRunner>,
}

impl DependencyInstaller {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Run `npm install` in the project directory, with output on the
    /// controlling terminal.
    pub async fn install(&self, project_dir: &Path) -> ScaffoldResult<()> {
        info!("Installing dependencies in {:?}", project_dir);
        let spec = CommandSpec::new("npm").arg("install").current_dir(project_dir);
        let result = self.runner.run_interactive(&spec).await?;
        if !result.success() {
            return Err(ScaffoldError::InstallFailed(result.exit_code));
        }
        Ok(())
    }
}
