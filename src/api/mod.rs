//! Typed inputs and outputs of the translation layer.

mod cloudprofile;
mod infrastructure;
mod status;

pub use cloudprofile::{CloudProfileConfig, ClusterContext, DomainCount, DomainCounts};
pub use infrastructure::{
    ClientAuth, InfrastructureConfig, InfrastructureResource, NetworkConfig, VNet, VNetLayout,
};
pub use status::{
    AvailabilitySet, InfrastructureStatus, NetworkStatus, Purpose, ResourceGroup, RouteTable,
    STATUS_API_VERSION, STATUS_KIND, SecurityGroup, Subnet, TypeMeta, VNetStatus,
};
