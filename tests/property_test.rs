//! Property-based tests for the chart value compiler and status extractor.
//!
//! Both directions share the output key names, so for every mode the keys
//! the compiler asks Terraform to expose must be exactly the ones the
//! extractor reads back into the status.

mod helpers;

use std::collections::BTreeMap;

use azinfra::api::{InfrastructureConfig, NetworkConfig, VNet};
use azinfra::terraform::{
    OUTPUT_KEY_AVAILABILITY_SET_ID, OUTPUT_KEY_AVAILABILITY_SET_NAME,
    OUTPUT_KEY_RESOURCE_GROUP_NAME, OUTPUT_KEY_ROUTE_TABLE_NAME, OUTPUT_KEY_SECURITY_GROUP_NAME,
    OUTPUT_KEY_SUBNET_NAME, OUTPUT_KEY_VNET_NAME, OUTPUT_KEY_VNET_RESOURCE_GROUP, TerraformState,
    compute_chart_values, status_from_terraform_state,
};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}"
}

fn arb_cidr() -> impl Strategy<Value = String> {
    (1u8..=254, 0u8..=255, 8u8..=28).prop_map(|(a, b, bits)| format!("{}.{}.0.0/{}", a, b, bits))
}

/// Either a new VNet (`Some(cidr)`) or an existing one (`None`).
fn arb_vnet() -> impl Strategy<Value = VNet> {
    prop_oneof![
        (proptest::option::of(arb_name()), arb_cidr()).prop_map(|(name, cidr)| VNet {
            name,
            cidr: Some(cidr),
            resource_group: None,
        }),
        (arb_name(), arb_name()).prop_map(|(name, rg)| VNet {
            name: Some(name),
            cidr: None,
            resource_group: Some(rg),
        }),
    ]
}

fn arb_config() -> impl Strategy<Value = InfrastructureConfig> {
    (
        arb_vnet(),
        arb_cidr(),
        proptest::collection::vec("Microsoft\\.[A-Z][a-z]{2,8}", 0..4),
        any::<bool>(),
    )
        .prop_map(|(vnet, workers, service_endpoints, zoned)| InfrastructureConfig {
            networks: NetworkConfig {
                vnet,
                workers,
                service_endpoints,
            },
            zoned,
        })
}

proptest! {
    #[test]
    fn prop_compile_is_deterministic(config in arb_config()) {
        let infra = helpers::infrastructure();
        let auth = helpers::client_auth();
        let cluster = helpers::cluster();

        let first = compute_chart_values(&infra, &auth, &config, &cluster).unwrap();
        let second = compute_chart_values(&infra, &auth, &config, &cluster).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_create_vnet_matches_descriptor(config in arb_config()) {
        let values = compute_chart_values(
            &helpers::infrastructure(),
            &helpers::client_auth(),
            &config,
            &helpers::cluster(),
        )
        .unwrap();
        let tree = values.to_value().unwrap();

        let has_cidr = config.networks.vnet.cidr.is_some();
        prop_assert_eq!(tree["create"]["vnet"].as_bool(), Some(has_cidr));
        prop_assert_eq!(tree["resourceGroup"]["vnet"].get("cidr").is_some(), has_cidr);
        prop_assert_eq!(tree["resourceGroup"]["vnet"].get("resourceGroup").is_some(), !has_cidr);
        prop_assert_eq!(tree["outputKeys"].get(OUTPUT_KEY_VNET_RESOURCE_GROUP).is_some(), !has_cidr);
    }

    #[test]
    fn prop_zoned_controls_availability_set(config in arb_config()) {
        let values = compute_chart_values(
            &helpers::infrastructure(),
            &helpers::client_auth(),
            &config,
            &helpers::cluster(),
        )
        .unwrap();
        let tree = values.to_value().unwrap();
        let azure = &tree["azure"];

        prop_assert_eq!(tree["create"]["availabilitySet"].as_bool(), Some(!config.zoned));
        prop_assert_eq!(azure.get("countFaultDomains").is_some(), !config.zoned);
        prop_assert_eq!(azure.get("countUpdateDomains").is_some(), !config.zoned);
        prop_assert_eq!(tree["outputKeys"].get(OUTPUT_KEY_AVAILABILITY_SET_ID).is_some(), !config.zoned);
        prop_assert_eq!(tree["outputKeys"].get(OUTPUT_KEY_AVAILABILITY_SET_NAME).is_some(), !config.zoned);
    }

    #[test]
    fn prop_every_output_key_reaches_the_status(config in arb_config(), suffix in arb_name()) {
        let values = compute_chart_values(
            &helpers::infrastructure(),
            &helpers::client_auth(),
            &config,
            &helpers::cluster(),
        )
        .unwrap();

        // Terraform exposes every requested output with a distinct value.
        let outputs: BTreeMap<String, String> = values
            .output_keys
            .iter()
            .map(|key| (key.to_string(), format!("{}-{}", key, suffix)))
            .collect();
        let state = TerraformState::from_outputs(&outputs);
        let status = status_from_terraform_state(&state, &config);

        let value = |key: &str| format!("{}-{}", key, suffix);
        prop_assert_eq!(&status.resource_group.name, &value(OUTPUT_KEY_RESOURCE_GROUP_NAME));
        prop_assert_eq!(&status.networks.vnet.name, &value(OUTPUT_KEY_VNET_NAME));
        prop_assert_eq!(&status.networks.subnets[0].name, &value(OUTPUT_KEY_SUBNET_NAME));
        prop_assert_eq!(&status.route_tables[0].name, &value(OUTPUT_KEY_ROUTE_TABLE_NAME));
        prop_assert_eq!(&status.security_groups[0].name, &value(OUTPUT_KEY_SECURITY_GROUP_NAME));

        if config.zoned {
            prop_assert!(status.availability_sets.is_empty());
        } else {
            prop_assert_eq!(status.availability_sets.len(), 1);
            prop_assert_eq!(&status.availability_sets[0].id, &value(OUTPUT_KEY_AVAILABILITY_SET_ID));
            prop_assert_eq!(&status.availability_sets[0].name, &value(OUTPUT_KEY_AVAILABILITY_SET_NAME));
        }

        let vnet_resource_group = status.networks.vnet.resource_group.clone();
        if config.networks.vnet.cidr.is_some() {
            prop_assert_eq!(vnet_resource_group, None);
        } else {
            prop_assert_eq!(vnet_resource_group, Some(value(OUTPUT_KEY_VNET_RESOURCE_GROUP)));
        }
        prop_assert_eq!(status.zoned, config.zoned);
    }
}
