//! Mutations of generated control plane and kubelet manifests.
//!
//! These are plain edits on manifest data; fetching the manifests and
//! writing them back is left to the caller.

mod args;
mod ensurer;

pub use args::CommandLine;
pub use ensurer::{
    CLOUD_PROVIDER_CONFIG_MAP_KEY, CLOUD_PROVIDER_CONFIG_NAME, CLOUD_PROVIDER_KUBELET_CONFIG_NAME,
    Container, KubeletConfiguration, PodSpec, PodTemplate, UnitOption, Volume, VolumeMount,
    VolumeSource, ensure_kube_apiserver, ensure_kube_controller_manager,
    ensure_kubelet_configuration, ensure_kubelet_exec_start, kubelet_cloud_provider_config,
    must_mount_etc_ssl,
};
