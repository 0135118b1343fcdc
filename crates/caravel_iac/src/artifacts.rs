//! Generation of the two IaC input files.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::{IacError, IacResult};

/// Variable values file consumed by plan and apply.
pub const VARS_FILE: &str = "terraform.tfvars";

/// Module reference file naming the remote reference architecture.
pub const MODULE_FILE: &str = "main.tf";

/// Writes the variable file and module-reference file the engine consumes.
///
/// Writes are idempotent overwrites: no prior content is validated and the
/// last write wins. The workflow never reads these files back.
pub struct ArtifactWriter {
    working_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Render both artifacts into the working directory.
    pub fn write(&self, subscription_id: &str, prefix: &str, module_source: &str) -> IacResult<()> {
        let tfvars = format!(
            "subscription_id = \"{}\"\nprefix          = \"{}\"\n",
            subscription_id, prefix
        );
        self.write_file(VARS_FILE, &tfvars)?;

        let main_tf = format!(
            r#"module "reference_architecture" {{
  source          = "{}"
  subscription_id = var.subscription_id
  prefix          = var.prefix
}}

variable "subscription_id" {{}}
variable "prefix" {{}}
"#,
            module_source
        );
        self.write_file(MODULE_FILE, &main_tf)?;

        info!(
            "Wrote {} and {} to {:?}",
            VARS_FILE, MODULE_FILE, self.working_dir
        );
        Ok(())
    }

    fn write_file(&self, name: &str, content: &str) -> IacResult<()> {
        fs::write(self.working_dir.join(name), content).map_err(|source| {
            IacError::ArtifactWrite {
                file: name.to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_renders_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        writer
            .write("sub-123", "my-project", "github.com/example/ref-arch")
            .unwrap();

        let tfvars = fs::read_to_string(dir.path().join(VARS_FILE)).unwrap();
        assert!(tfvars.contains(r#"subscription_id = "sub-123""#));
        assert!(tfvars.contains(r#"prefix          = "my-project""#));

        let main_tf = fs::read_to_string(dir.path().join(MODULE_FILE)).unwrap();
        assert!(main_tf.contains(r#"source          = "github.com/example/ref-arch""#));
        assert!(main_tf.contains("var.subscription_id"));
    }

    #[test]
    fn test_write_overwrites_prior_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(VARS_FILE), "stale = true").unwrap();

        let writer = ArtifactWriter::new(dir.path());
        writer.write("sub-456", "other", "github.com/example/other").unwrap();

        let tfvars = fs::read_to_string(dir.path().join(VARS_FILE)).unwrap();
        assert!(!tfvars.contains("stale"));
        assert!(tfvars.contains("sub-456"));
    }

    #[test]
    fn test_write_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path().join("does-not-exist"));

        let err = writer
            .write("sub", "prefix", "github.com/example/ref-arch")
            .unwrap_err();
        assert!(matches!(err, IacError::ArtifactWrite { .. }));
    }
}
