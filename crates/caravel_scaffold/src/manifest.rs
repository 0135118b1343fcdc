//! Package manifest rewriting for cloned templates.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;

use crate::error::ScaffoldResult;

const MANIFEST_FILE: &str = "package.json";

/// Set the `name` field of the project's package manifest, preserving
/// everything else. A template without a manifest gets a minimal one.
pub fn rename_package(project_dir: &Path, name: &str) -> ScaffoldResult<()> {
    let path = project_dir.join(MANIFEST_FILE);

    let mut manifest: Value = if path.exists() {
        serde_json::from_str(&fs::read_to_string(&path)?)?
    } else {
        json!({})
    };

    manifest["name"] = Value::String(name.to_string());

    fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
    debug!("Set package name to '{}' in {:?}", name, path);
    Ok(())
}
