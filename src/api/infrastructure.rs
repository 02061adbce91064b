//! Provider configuration of an Azure infrastructure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AzinfraError;

/// Provider-specific configuration attached to an infrastructure resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureConfig {
    /// Network layout of the cluster.
    pub networks: NetworkConfig,
    /// Whether the cluster spreads its nodes over availability zones.
    /// Non-zoned clusters place their nodes in an availability set instead.
    #[serde(default)]
    pub zoned: bool,
}

impl InfrastructureConfig {
    /// Checks the configuration for contradictions.
    ///
    /// Resolves the VNet descriptor (which rejects ambiguous descriptors)
    /// and requires a non-empty worker CIDR.
    pub fn validate(&self) -> Result<(), AzinfraError> {
        self.networks.vnet.layout()?;
        if self.networks.workers.trim().is_empty() {
            return Err(AzinfraError::Validation(
                "networks.workers must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Network configuration of the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Virtual network to create or reuse.
    pub vnet: VNet,
    /// CIDR of the worker subnet.
    pub workers: String,
    /// Service endpoints enabled on the worker subnet.
    #[serde(default)]
    pub service_endpoints: Vec<String>,
}

/// Virtual network descriptor.
///
/// Either `cidr` is set (a new VNet is created) or `name` together with
/// `resource_group` is set (an existing VNet is reused).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VNet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

/// Resolved ownership of the virtual network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VNetLayout {
    /// The engine creates a VNet named after the cluster with this CIDR.
    Create { cidr: String },
    /// The engine looks up a VNet that already exists.
    Existing { name: String, resource_group: String },
}

impl VNetLayout {
    /// Returns true if the engine has to create the virtual network.
    pub fn creates_vnet(&self) -> bool {
        matches!(self, VNetLayout::Create { .. })
    }
}

impl VNet {
    /// Resolves the descriptor into a [`VNetLayout`].
    pub fn layout(&self) -> Result<VNetLayout, AzinfraError> {
        let name = non_empty(self.name.as_deref());
        let cidr = non_empty(self.cidr.as_deref());
        let resource_group = non_empty(self.resource_group.as_deref());

        match (cidr, resource_group) {
            (Some(_), Some(_)) => Err(AzinfraError::Validation(
                "networks.vnet.cidr and networks.vnet.resourceGroup are mutually exclusive"
                    .to_string(),
            )),
            (Some(cidr), None) => Ok(VNetLayout::Create { cidr: cidr.to_string() }),
            (None, Some(resource_group)) => match name {
                Some(name) => Ok(VNetLayout::Existing {
                    name: name.to_string(),
                    resource_group: resource_group.to_string(),
                }),
                None => Err(AzinfraError::Validation(format!(
                    "networks.vnet.name is required when reusing a vnet from resource group '{}'",
                    resource_group
                ))),
            },
            (None, None) => Err(AzinfraError::Validation(
                "networks.vnet must specify either a cidr (new vnet) or a name and \
                resourceGroup (existing vnet)"
                    .to_string(),
            )),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Service principal credentials used by the provisioning engine.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientAuth {
    #[serde(rename = "subscriptionID")]
    pub subscription_id: String,
    #[serde(rename = "tenantID")]
    pub tenant_id: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

impl fmt::Debug for ClientAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAuth")
            .field("subscription_id", &self.subscription_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// The infrastructure resource being reconciled.
///
/// The namespace doubles as the resource group and cluster name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureResource {
    pub namespace: String,
    pub name: String,
    pub region: String,
}
