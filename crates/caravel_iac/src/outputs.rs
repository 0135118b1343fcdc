//! Structured provisioning outputs captured after a successful apply.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::MissingOutputError;

/// The named result values produced by `terraform output -json`.
///
/// Each entry is the engine's output object (`{"value": ..., ...}`).
/// Populated exactly once after a successful apply; lookups for names the
/// apply did not produce fail with [`MissingOutputError`] rather than
/// returning any placeholder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisioningOutputs {
    values: HashMap<String, Value>,
}

impl ProvisioningOutputs {
    /// An empty mapping, used when output capture degrades.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the engine's structured output text.
    ///
    /// Parsing is best-effort: malformed text yields an empty mapping with
    /// a logged warning, matching the telemetry policy of the capture
    /// step. Lookup strictness lives in [`field`](Self::field), not here.
    pub fn capture(raw: &str) -> Self {
        match serde_json::from_str::<HashMap<String, Value>>(raw) {
            Ok(values) => {
                debug!("Captured {} provisioning output(s)", values.len());
                Self { values }
            }
            Err(e) => {
                warn!("Could not parse provisioning outputs: {}", e);
                Self::empty()
            }
        }
    }

    /// Get the value of a named output.
    pub fn field(&self, name: &str) -> Result<&Value, MissingOutputError> {
        self.values
            .get(name)
            .and_then(|entry| entry.get("value"))
            .ok_or_else(|| MissingOutputError(name.to_string()))
    }

    /// Get the value of a named output as a string.
    pub fn field_str(&self, name: &str) -> Result<&str, MissingOutputError> {
        self.field(name)?
            .as_str()
            .ok_or_else(|| MissingOutputError(name.to_string()))
    }

    /// Output names present in the captured mapping, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_and_field_roundtrip() {
        let raw = r#"{"resource_group_name":{"value":"rg1"},"app_service_name":{"value":"app1"}}"#;
        let outputs = ProvisioningOutputs::capture(raw);

        assert_eq!(outputs.field_str("resource_group_name").unwrap(), "rg1");
        assert_eq!(outputs.field_str("app_service_name").unwrap(), "app1");
        assert_eq!(
            outputs.field("bot_service_name").unwrap_err(),
            MissingOutputError("bot_service_name".to_string())
        );
    }

    #[test]
    fn test_field_returns_exact_stored_value() {
        let raw = r#"{"instance_count":{"value":3}}"#;
        let outputs = ProvisioningOutputs::capture(raw);

        // The stored value comes back uncoerced.
        assert_eq!(outputs.field("instance_count").unwrap(), &serde_json::json!(3));
        // A non-string value is missing as far as string interpolation goes.
        assert!(outputs.field_str("instance_count").is_err());
    }

    #[test]
    fn test_entry_without_value_wrapper_is_missing() {
        let raw = r#"{"resource_group_name":{"type":"string"}}"#;
        let outputs = ProvisioningOutputs::capture(raw);
        assert!(outputs.field("resource_group_name").is_err());
    }

    #[test]
    fn test_capture_malformed_degrades_to_empty() {
        let outputs = ProvisioningOutputs::capture("not json at all");
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_names_sorted() {
        let raw = r#"{"b":{"value":"2"},"a":{"value":"1"}}"#;
        let outputs = ProvisioningOutputs::capture(raw);
        assert_eq!(outputs.names(), vec!["a", "b"]);
        assert_eq!(outputs.len(), 2);
    }
}
