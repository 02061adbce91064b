//! Cloud profile settings and the cluster context derived from them.

use serde::{Deserialize, Serialize};

use crate::error::AzinfraError;

/// Provider section of the cloud profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProfileConfig {
    /// Fault domain counts per region.
    #[serde(default)]
    pub count_fault_domains: Vec<DomainCount>,
    /// Update domain counts per region.
    #[serde(default)]
    pub count_update_domains: Vec<DomainCount>,
}

/// Number of domains available in a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub region: String,
    pub count: u32,
}

/// Availability set domain counts of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainCounts {
    pub fault_domains: u32,
    pub update_domains: u32,
}

fn find_domain_count(counts: &[DomainCount], region: &str, kind: &str) -> Result<u32, AzinfraError> {
    counts
        .iter()
        .find(|c| c.region == region)
        .map(|c| c.count)
        .ok_or_else(|| {
            AzinfraError::Validation(format!(
                "could not find a {} domain count for region '{}'",
                kind, region
            ))
        })
}

/// Cluster-level inputs of the chart value computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterContext {
    pub region: String,
    pub cloud_profile: CloudProfileConfig,
}

impl ClusterContext {
    pub fn new(region: impl Into<String>, cloud_profile: CloudProfileConfig) -> Self {
        Self {
            region: region.into(),
            cloud_profile,
        }
    }

    /// Looks up the fault and update domain counts of the cluster's region.
    ///
    /// Only meaningful for non-zoned clusters.
    pub fn domain_counts(&self) -> Result<DomainCounts, AzinfraError> {
        Ok(DomainCounts {
            fault_domains: find_domain_count(
                &self.cloud_profile.count_fault_domains,
                &self.region,
                "fault",
            )?,
            update_domains: find_domain_count(
                &self.cloud_profile.count_update_domains,
                &self.region,
                "update",
            )?,
        })
    }
}
