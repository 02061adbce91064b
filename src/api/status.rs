//! Infrastructure status reported back to the platform.

use serde::{Deserialize, Serialize};
use strum::Display;

/// API version of the status schema.
pub const STATUS_API_VERSION: &str = "azure.provider.extensions.gardener.cloud/v1alpha1";

/// Kind of the status object.
pub const STATUS_KIND: &str = "InfrastructureStatus";

/// Type marker carried by serialized status objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    pub api_version: String,
    pub kind: String,
}

impl TypeMeta {
    /// The marker stamped on every [`InfrastructureStatus`].
    pub fn infrastructure_status() -> Self {
        Self {
            api_version: STATUS_API_VERSION.to_string(),
            kind: STATUS_KIND.to_string(),
        }
    }
}

/// What a resource is used for.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Purpose {
    /// Used by the worker nodes.
    #[default]
    Nodes,
    /// Used internally by the control plane.
    Internal,
}

/// Status of the Azure infrastructure of a cluster.
///
/// List fields are always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureStatus {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub networks: NetworkStatus,
    pub resource_group: ResourceGroup,
    pub availability_sets: Vec<AvailabilitySet>,
    pub route_tables: Vec<RouteTable>,
    pub security_groups: Vec<SecurityGroup>,
    pub zoned: bool,
}

/// Network status of the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    #[serde(rename = "vnet")]
    pub vnet: VNetStatus,
    pub subnets: Vec<Subnet>,
}

/// Status of the virtual network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VNetStatus {
    pub name: String,
    /// Set only when an existing VNet from another resource group is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub name: String,
    pub purpose: Purpose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySet {
    pub name: String,
    pub id: String,
    pub purpose: Purpose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    pub name: String,
    pub purpose: Purpose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub name: String,
    pub purpose: Purpose,
}
