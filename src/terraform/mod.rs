//! Translation between infrastructure configs and the Terraform engine.
//!
//! [`chart`] compiles an infrastructure config into the values rendered into
//! the Terraform configuration, [`state`] decodes the outputs Terraform
//! produced, and [`status`] turns those outputs into an infrastructure status.
//!
//! The output keys below are the contract between both directions: the
//! compiler tells Terraform to expose exactly these outputs and the state
//! decoder reads them back under the same names.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::api::{ClientAuth, VNetLayout};

pub mod chart;
pub mod state;
pub mod status;

pub use chart::{AvailabilityMode, ChartValues, compute_chart_values};
pub use state::{TerraformState, load_state};
pub use status::status_from_terraform_state;

pub const OUTPUT_KEY_RESOURCE_GROUP_NAME: &str = "resourceGroupName";
pub const OUTPUT_KEY_VNET_NAME: &str = "vnetName";
pub const OUTPUT_KEY_VNET_RESOURCE_GROUP: &str = "vnetResourceGroup";
pub const OUTPUT_KEY_SUBNET_NAME: &str = "subnetName";
pub const OUTPUT_KEY_ROUTE_TABLE_NAME: &str = "routeTableName";
pub const OUTPUT_KEY_SECURITY_GROUP_NAME: &str = "securityGroupName";
pub const OUTPUT_KEY_AVAILABILITY_SET_ID: &str = "availabilitySetID";
pub const OUTPUT_KEY_AVAILABILITY_SET_NAME: &str = "availabilitySetName";

/// Outputs exposed in every mode.
pub const BASE_OUTPUT_KEYS: &[&str] = &[
    OUTPUT_KEY_RESOURCE_GROUP_NAME,
    OUTPUT_KEY_VNET_NAME,
    OUTPUT_KEY_SUBNET_NAME,
    OUTPUT_KEY_ROUTE_TABLE_NAME,
    OUTPUT_KEY_SECURITY_GROUP_NAME,
];

/// Environment variable carrying the service principal client ID.
pub const TF_VAR_CLIENT_ID: &str = "TF_VAR_CLIENT_ID";
/// Environment variable carrying the service principal client secret.
pub const TF_VAR_CLIENT_SECRET: &str = "TF_VAR_CLIENT_SECRET";

/// Ordered set of output keys Terraform has to expose.
///
/// Serializes as a map from each key to itself, which is the shape the
/// Terraform templates iterate over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputKeys(Vec<&'static str>);

impl OutputKeys {
    /// Builds the catalog for a resolved mode.
    pub fn for_mode(layout: &VNetLayout, availability: &AvailabilityMode) -> Self {
        let mut keys = BASE_OUTPUT_KEYS.to_vec();
        if !layout.creates_vnet() {
            keys.push(OUTPUT_KEY_VNET_RESOURCE_GROUP);
        }
        if availability.uses_availability_set() {
            keys.push(OUTPUT_KEY_AVAILABILITY_SET_ID);
            keys.push(OUTPUT_KEY_AVAILABILITY_SET_NAME);
        }
        Self(keys)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }
}

impl Serialize for OutputKeys {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|key| (key, key)))
    }
}

/// Environment handed to the Terraform process.
///
/// Client credentials travel through the environment instead of the chart
/// values so they never show up in rendered configuration.
pub fn terraform_variables_environment(auth: &ClientAuth) -> BTreeMap<String, String> {
    BTreeMap::from([
        (TF_VAR_CLIENT_ID.to_string(), auth.client_id.clone()),
        (TF_VAR_CLIENT_SECRET.to_string(), auth.client_secret.clone()),
    ])
}
