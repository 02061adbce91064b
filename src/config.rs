//! Manifest and credentials loading.

use std::fs::File;
use std::io::BufReader;

use camino::Utf8Path;
use serde::Deserialize;
use tracing::debug;

use crate::api::{
    ClientAuth, CloudProfileConfig, ClusterContext, InfrastructureConfig, InfrastructureResource,
};
use crate::error::AzinfraError;

/// Everything needed to translate one infrastructure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// The infrastructure resource being reconciled.
    pub infrastructure: InfrastructureResource,
    /// Azure-specific configuration of the infrastructure.
    pub provider_config: InfrastructureConfig,
    /// Azure section of the cloud profile.
    #[serde(default)]
    pub cloud_profile: CloudProfileConfig,
}

impl Manifest {
    /// Validates the provider configuration.
    pub fn validate(&self) -> Result<(), AzinfraError> {
        self.provider_config.validate()
    }

    /// Cluster context for the infrastructure's region.
    pub fn cluster_context(&self) -> ClusterContext {
        ClusterContext::new(self.infrastructure.region.clone(), self.cloud_profile.clone())
    }
}

fn load_yaml<T>(path: &Utf8Path) -> Result<T, AzinfraError>
where
    T: for<'de> Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| AzinfraError::io(path.as_str(), e))?;
    let reader = BufReader::new(file);
    serde_yaml::from_reader(reader)
        .map_err(|e| AzinfraError::Config(format!("YAML parse error in {}: {}", path, e)))
}

/// Loads a manifest from a YAML file.
pub fn load_manifest(path: &Utf8Path) -> Result<Manifest, AzinfraError> {
    let manifest: Manifest = load_yaml(path)?;
    debug!(
        namespace = %manifest.infrastructure.namespace,
        region = %manifest.infrastructure.region,
        "loaded manifest from {}",
        path
    );
    Ok(manifest)
}

/// Loads service principal credentials from a YAML file.
pub fn load_client_auth(path: &Utf8Path) -> Result<ClientAuth, AzinfraError> {
    let auth: ClientAuth = load_yaml(path)?;
    for (field, value) in [
        ("subscriptionID", &auth.subscription_id),
        ("tenantID", &auth.tenant_id),
        ("clientID", &auth.client_id),
        ("clientSecret", &auth.client_secret),
    ] {
        if value.trim().is_empty() {
            return Err(AzinfraError::Validation(format!(
                "credentials field '{}' must not be empty: {}",
                field, path
            )));
        }
    }
    Ok(auth)
}
