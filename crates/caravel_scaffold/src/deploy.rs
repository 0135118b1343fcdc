//! Deployment script emission.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ScaffoldResult;

const DEPLOY_SCRIPT: &str = "deploy.sh";

/// Write a zip-deploy script into the project, parameterized with the
/// provisioned resource group and app service names.
pub fn write_deploy_script(
    project_dir: &Path,
    resource_group: &str,
    app_service: &str,
) -> ScaffoldResult<PathBuf> {
    let content = format!(
        r#"#!/bin/bash

RESOURCE_GROUP="{resource_group}"
APP_SERVICE_NAME="{app_service}"

echo "Stopping the app..."
az webapp stop --resource-group "$RESOURCE_GROUP" --name "$APP_SERVICE_NAME"

zip -r app.zip .

az webapp deploy \
  --resource-group "$RESOURCE_GROUP" \
  --name "$APP_SERVICE_NAME" \
  --src-path app.zip \
  --type zip \
  --clean

rm app.zip

echo "Starting the app..."
az webapp start --resource-group "$RESOURCE_GROUP" --name "$APP_SERVICE_NAME"

echo "Deployment completed and app is running!"
"#
    );

    let path = project_dir.join(DEPLOY_SCRIPT);
    fs::write(&path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }

    debug!("Wrote deploy script to {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_interpolates_resource_names() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_deploy_script(dir.path(), "demo-rg", "demo-app").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("#!/bin/bash"));
        assert!(content.contains(r#"RESOURCE_GROUP="demo-rg""#));
        assert!(content.contains(r#"APP_SERVICE_NAME="demo-app""#));
        assert!(content.contains("az webapp deploy"));
    }

    #[cfg(unix)]
    #[test]
    fn test_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();

        let path = write_deploy_script(dir.path(), "rg", "app").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
