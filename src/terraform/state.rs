//! Decoding of Terraform outputs.

use std::collections::BTreeMap;
use std::fs;

use camino::Utf8Path;
use serde_json::Value;
use tracing::debug;

use super::{
    OUTPUT_KEY_AVAILABILITY_SET_ID, OUTPUT_KEY_AVAILABILITY_SET_NAME,
    OUTPUT_KEY_RESOURCE_GROUP_NAME, OUTPUT_KEY_ROUTE_TABLE_NAME, OUTPUT_KEY_SECURITY_GROUP_NAME,
    OUTPUT_KEY_SUBNET_NAME, OUTPUT_KEY_VNET_NAME, OUTPUT_KEY_VNET_RESOURCE_GROUP,
};
use crate::error::AzinfraError;

const STATE_KEYS: &[&str] = &[
    OUTPUT_KEY_VNET_NAME,
    OUTPUT_KEY_VNET_RESOURCE_GROUP,
    OUTPUT_KEY_SUBNET_NAME,
    OUTPUT_KEY_ROUTE_TABLE_NAME,
    OUTPUT_KEY_AVAILABILITY_SET_ID,
    OUTPUT_KEY_AVAILABILITY_SET_NAME,
    OUTPUT_KEY_SECURITY_GROUP_NAME,
    OUTPUT_KEY_RESOURCE_GROUP_NAME,
];

/// Outputs of an applied Terraform configuration.
///
/// An empty field means Terraform did not (yet) produce the output. The
/// availability set fields stay empty for zoned clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerraformState {
    pub vnet_name: String,
    pub vnet_resource_group: String,
    pub subnet_name: String,
    pub route_table_name: String,
    pub availability_set_id: String,
    pub availability_set_name: String,
    pub security_group_name: String,
    pub resource_group_name: String,
}

impl TerraformState {
    /// Builds the state from a flat map of output names to values.
    ///
    /// Unknown outputs are ignored, missing ones are left empty.
    pub fn from_outputs(outputs: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| outputs.get(key).cloned().unwrap_or_default();
        Self {
            vnet_name: get(OUTPUT_KEY_VNET_NAME),
            vnet_resource_group: get(OUTPUT_KEY_VNET_RESOURCE_GROUP),
            subnet_name: get(OUTPUT_KEY_SUBNET_NAME),
            route_table_name: get(OUTPUT_KEY_ROUTE_TABLE_NAME),
            availability_set_id: get(OUTPUT_KEY_AVAILABILITY_SET_ID),
            availability_set_name: get(OUTPUT_KEY_AVAILABILITY_SET_NAME),
            security_group_name: get(OUTPUT_KEY_SECURITY_GROUP_NAME),
            resource_group_name: get(OUTPUT_KEY_RESOURCE_GROUP_NAME),
        }
    }

    /// Decodes the state from JSON.
    ///
    /// Accepts the document printed by `terraform output -json`, where every
    /// output is an object with a `value` field, a flat object of output
    /// names to strings, and a persisted state file, whose outputs sit under
    /// a top-level `outputs` object. A `null` value counts as missing.
    ///
    /// # Errors
    /// Returns `AzinfraError::Decode` if the document is not a JSON object,
    /// carries none of the known outputs, or a known output holds something
    /// other than a string.
    pub fn from_json(data: &str) -> Result<Self, AzinfraError> {
        let document: Value = serde_json::from_str(data)
            .map_err(|e| AzinfraError::Decode(format!("invalid terraform output JSON: {}", e)))?;
        let Value::Object(document) = document else {
            return Err(AzinfraError::Decode(
                "terraform output must be a JSON object".to_string(),
            ));
        };
        let entries = match document.get("outputs") {
            Some(Value::Object(outputs)) => outputs,
            Some(other) => {
                return Err(AzinfraError::Decode(format!(
                    "terraform state 'outputs' must be a JSON object, got {}",
                    other
                )));
            }
            None => &document,
        };
        if !STATE_KEYS.iter().any(|key| entries.contains_key(*key)) {
            return Err(AzinfraError::Decode(format!(
                "terraform output contains none of the expected outputs ({})",
                STATE_KEYS.join(", ")
            )));
        }

        let mut outputs = BTreeMap::new();
        for key in STATE_KEYS {
            let Some(entry) = entries.get(*key) else {
                continue;
            };
            let value = match entry {
                Value::Object(wrapped) => wrapped.get("value").unwrap_or(&Value::Null),
                other => other,
            };
            match value {
                Value::String(s) => {
                    outputs.insert(key.to_string(), s.clone());
                }
                Value::Null => {}
                other => {
                    return Err(AzinfraError::Decode(format!(
                        "output '{}' must be a string, got {}",
                        key, other
                    )));
                }
            }
        }

        Ok(Self::from_outputs(&outputs))
    }
}

/// Reads and decodes a Terraform output file.
pub fn load_state(path: &Utf8Path) -> Result<TerraformState, AzinfraError> {
    let data = fs::read_to_string(path).map_err(|e| AzinfraError::io(path.as_str(), e))?;
    let state = TerraformState::from_json(&data)?;
    debug!("loaded terraform state from {}", path);
    Ok(state)
}
