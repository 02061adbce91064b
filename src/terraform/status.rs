//! Infrastructure status computed from Terraform outputs.

use tracing::debug;

use super::TerraformState;
use crate::api::{
    AvailabilitySet, InfrastructureConfig, InfrastructureStatus, NetworkStatus, Purpose,
    ResourceGroup, RouteTable, SecurityGroup, Subnet, TypeMeta, VNetLayout, VNetStatus,
};

/// Computes the infrastructure status from the Terraform state.
///
/// Availability sets follow what Terraform produced: an empty availability
/// set ID yields an empty list. Only `zoned` is taken from the config.
/// Empty identifiers are passed through; they mean Terraform has not
/// produced the output yet.
#[tracing::instrument(skip_all, fields(zoned = config.zoned))]
pub fn status_from_terraform_state(
    state: &TerraformState,
    config: &InfrastructureConfig,
) -> InfrastructureStatus {
    let availability_sets = if state.availability_set_id.is_empty() {
        Vec::new()
    } else {
        vec![AvailabilitySet {
            name: state.availability_set_name.clone(),
            id: state.availability_set_id.clone(),
            purpose: Purpose::Nodes,
        }]
    };

    let vnet_resource_group = if state.vnet_resource_group.is_empty() {
        match config.networks.vnet.layout() {
            Ok(VNetLayout::Existing { resource_group, .. }) => Some(resource_group),
            _ => None,
        }
    } else {
        Some(state.vnet_resource_group.clone())
    };

    debug!(
        availability_sets = availability_sets.len(),
        "computed infrastructure status"
    );

    InfrastructureStatus {
        type_meta: TypeMeta::infrastructure_status(),
        networks: NetworkStatus {
            vnet: VNetStatus {
                name: state.vnet_name.clone(),
                resource_group: vnet_resource_group,
            },
            subnets: vec![Subnet {
                name: state.subnet_name.clone(),
                purpose: Purpose::Nodes,
            }],
        },
        resource_group: ResourceGroup {
            name: state.resource_group_name.clone(),
        },
        availability_sets,
        route_tables: vec![RouteTable {
            name: state.route_table_name.clone(),
            purpose: Purpose::Nodes,
        }],
        security_groups: vec![SecurityGroup {
            name: state.security_group_name.clone(),
            purpose: Purpose::Nodes,
        }],
        zoned: config.zoned,
    }
}
