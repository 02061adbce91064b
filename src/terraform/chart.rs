//! Chart value computation for the Terraform configuration.
//!
//! The values form the variable tree rendered into the Terraform templates.
//! Its key paths (`azure.*`, `create.*`, `resourceGroup.*`, `identity.enabled`,
//! `clusterName`, `networks.worker`, `outputKeys.*`) are consumed verbatim by
//! those templates, so renaming any field is a breaking change.

use serde::Serialize;
use tracing::debug;

use super::OutputKeys;
use crate::api::{
    ClientAuth, ClusterContext, DomainCounts, InfrastructureConfig, InfrastructureResource,
    VNetLayout,
};
use crate::error::AzinfraError;

/// How the nodes of a cluster are spread for availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityMode {
    /// Nodes are spread over availability zones.
    Zoned,
    /// Nodes are placed in an availability set with the given domain counts.
    AvailabilitySet(DomainCounts),
}

impl AvailabilityMode {
    /// Resolves the mode from the config, looking up domain counts for
    /// non-zoned clusters.
    pub fn resolve(
        config: &InfrastructureConfig,
        cluster: &ClusterContext,
    ) -> Result<Self, AzinfraError> {
        if config.zoned {
            Ok(AvailabilityMode::Zoned)
        } else {
            Ok(AvailabilityMode::AvailabilitySet(cluster.domain_counts()?))
        }
    }

    pub fn uses_availability_set(&self) -> bool {
        matches!(self, AvailabilityMode::AvailabilitySet(_))
    }

    fn domain_counts(&self) -> Option<DomainCounts> {
        match self {
            AvailabilityMode::Zoned => None,
            AvailabilityMode::AvailabilitySet(counts) => Some(*counts),
        }
    }
}

/// Values rendered into the Terraform configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartValues {
    pub azure: AzureValues,
    pub create: CreateValues,
    pub resource_group: ResourceGroupValues,
    pub identity: IdentityValues,
    pub cluster_name: String,
    pub networks: NetworkValues,
    pub output_keys: OutputKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureValues {
    #[serde(rename = "subscriptionID")]
    pub subscription_id: String,
    #[serde(rename = "tenantID")]
    pub tenant_id: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_update_domains: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_fault_domains: Option<u32>,
}

/// Which resources Terraform creates instead of looking them up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateValues {
    pub resource_group: bool,
    pub vnet: bool,
    pub availability_set: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceGroupValues {
    pub name: String,
    pub vnet: VNetValues,
    pub subnet: SubnetValues,
}

/// Either `cidr` (new VNet) or `resourceGroup` (existing VNet) is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VNetValues {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetValues {
    pub service_endpoints: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdentityValues {
    // No managed identity support yet; the templates still expect the flag.
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkValues {
    pub worker: String,
}

impl ChartValues {
    /// Returns the values as an untyped JSON tree.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Renders the values as a YAML document.
    pub fn to_yaml(&self) -> serde_yaml::Result<String> {
        serde_yaml::to_string(self)
    }
}

/// Computes the chart values for the Terraform configuration of `infra`.
///
/// The namespace of the infrastructure resource names both the resource group
/// and the cluster. A new VNet is named after the cluster, an existing one is
/// referenced by its own name and resource group.
///
/// # Errors
/// Returns `AzinfraError::Validation` if the VNet descriptor is contradictory,
/// the infrastructure and cluster regions differ or, for non-zoned clusters,
/// the cloud profile has no domain counts for the region.
#[tracing::instrument(skip_all, fields(namespace = %infra.namespace, zoned = config.zoned))]
pub fn compute_chart_values(
    infra: &InfrastructureResource,
    auth: &ClientAuth,
    config: &InfrastructureConfig,
    cluster: &ClusterContext,
) -> Result<ChartValues, AzinfraError> {
    if infra.region != cluster.region {
        return Err(AzinfraError::Validation(format!(
            "infrastructure region '{}' does not match cluster region '{}'",
            infra.region, cluster.region
        )));
    }
    let layout = config.networks.vnet.layout()?;
    let availability = AvailabilityMode::resolve(config, cluster)?;
    debug!(?layout, ?availability, "resolved infrastructure mode");

    let counts = availability.domain_counts();
    let azure = AzureValues {
        subscription_id: auth.subscription_id.clone(),
        tenant_id: auth.tenant_id.clone(),
        region: infra.region.clone(),
        count_update_domains: counts.map(|c| c.update_domains),
        count_fault_domains: counts.map(|c| c.fault_domains),
    };

    let vnet = match &layout {
        VNetLayout::Create { cidr } => VNetValues {
            name: infra.namespace.clone(),
            cidr: Some(cidr.clone()),
            resource_group: None,
        },
        VNetLayout::Existing { name, resource_group } => VNetValues {
            name: name.clone(),
            cidr: None,
            resource_group: Some(resource_group.clone()),
        },
    };

    Ok(ChartValues {
        azure,
        create: CreateValues {
            resource_group: true,
            vnet: layout.creates_vnet(),
            availability_set: availability.uses_availability_set(),
        },
        resource_group: ResourceGroupValues {
            name: infra.namespace.clone(),
            vnet,
            subnet: SubnetValues {
                service_endpoints: config.networks.service_endpoints.clone(),
            },
        },
        identity: IdentityValues { enabled: false },
        cluster_name: infra.namespace.clone(),
        networks: NetworkValues {
            worker: config.networks.workers.clone(),
        },
        output_keys: OutputKeys::for_mode(&layout, &availability),
    })
}
