use azinfra::api::{
    ClientAuth, CloudProfileConfig, ClusterContext, DomainCount, InfrastructureConfig,
    InfrastructureResource, NetworkConfig, VNet,
};
use azinfra::terraform::TerraformState;

pub const TEST_CIDR: &str = "10.1.0.0/16";
pub const TEST_SERVICE_ENDPOINT: &str = "Microsoft.Test";
pub const COUNT_FAULT_DOMAINS: u32 = 1;
pub const COUNT_UPDATE_DOMAINS: u32 = 2;

/// Infrastructure resource in namespace `bar` located in `eu-west-1`.
#[allow(dead_code)]
pub fn infrastructure() -> InfrastructureResource {
    InfrastructureResource {
        namespace: "bar".to_string(),
        name: "infra".to_string(),
        region: "eu-west-1".to_string(),
    }
}

#[allow(dead_code)]
pub fn client_auth() -> ClientAuth {
    ClientAuth {
        subscription_id: "subscription_id".to_string(),
        tenant_id: "tenant_id".to_string(),
        client_id: "client_id".to_string(),
        client_secret: "client_secret".to_string(),
    }
}

/// Zoned config creating a new VNet `vnet` with [`TEST_CIDR`].
#[allow(dead_code)]
pub fn new_vnet_config() -> InfrastructureConfig {
    InfrastructureConfig {
        networks: NetworkConfig {
            vnet: VNet {
                name: Some("vnet".to_string()),
                cidr: Some(TEST_CIDR.to_string()),
                resource_group: None,
            },
            workers: TEST_CIDR.to_string(),
            service_endpoints: vec![TEST_SERVICE_ENDPOINT.to_string()],
        },
        zoned: true,
    }
}

/// Zoned config reusing VNet `test` from resource group `test-rg`.
#[allow(dead_code)]
pub fn existing_vnet_config() -> InfrastructureConfig {
    let mut config = new_vnet_config();
    config.networks.vnet = VNet {
        name: Some("test".to_string()),
        cidr: None,
        resource_group: Some("test-rg".to_string()),
    };
    config
}

/// Cluster context with domain counts for the region of [`infrastructure`].
#[allow(dead_code)]
pub fn cluster() -> ClusterContext {
    let region = infrastructure().region;
    ClusterContext::new(
        region.clone(),
        CloudProfileConfig {
            count_fault_domains: vec![DomainCount {
                region: region.clone(),
                count: COUNT_FAULT_DOMAINS,
            }],
            count_update_domains: vec![DomainCount {
                region,
                count: COUNT_UPDATE_DOMAINS,
            }],
        },
    )
}

/// Full Terraform state of a non-zoned cluster.
#[allow(dead_code)]
pub fn full_state() -> TerraformState {
    TerraformState {
        vnet_name: "vnet_name".to_string(),
        subnet_name: "subnet_name".to_string(),
        route_table_name: "routTable_name".to_string(),
        availability_set_id: "as_id".to_string(),
        availability_set_name: "as_name".to_string(),
        security_group_name: "sg_name".to_string(),
        resource_group_name: "rg_name".to_string(),
        ..Default::default()
    }
}
