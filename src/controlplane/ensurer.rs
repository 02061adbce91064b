//! Azure-specific requirements for control plane and kubelet manifests.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::args::CommandLine;

/// Name of the config map (and volume) holding the cloud provider config.
pub const CLOUD_PROVIDER_CONFIG_NAME: &str = "cloud-provider-config";
/// Name of the config map holding the kubelet's cloud provider config.
pub const CLOUD_PROVIDER_KUBELET_CONFIG_NAME: &str = "cloud-provider-config-kubelet";
/// Key of the cloud provider config inside its config map.
pub const CLOUD_PROVIDER_CONFIG_MAP_KEY: &str = "cloudprovider.conf";

const CONTROL_PLANE_CLOUD_CONFIG: &str = "/etc/kubernetes/cloudprovider/cloudprovider.conf";
const KUBELET_CLOUD_CONFIG: &str = "/var/lib/kubelet/cloudprovider.conf";
const ETC_SSL_NAME: &str = "etc-ssl";

const LABEL_TO_PUBLIC_NETWORKS: &str = "networking.gardener.cloud/to-public-networks";
const LABEL_TO_PRIVATE_NETWORKS: &str = "networking.gardener.cloud/to-private-networks";
const LABEL_TO_BLOCKED_CIDRS: &str = "networking.gardener.cloud/to-blocked-cidrs";
const LABEL_VALUE_ALLOWED: &str = "allowed";

/// Feature gates that must not be set on the kubelet.
const REMOVED_KUBELET_FEATURE_GATES: &[&str] =
    &["VolumeSnapshotDataSource", "CSINodeInfo", "CSIDriverRegistry"];

static K8S_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)\.(\d+)(?:\.\d+)?$").expect("version pattern is valid")
});

/// Pod template of a control plane deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplate {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub volumes: Vec<Volume>,
}

impl PodSpec {
    fn container_mut(&mut self, name: &str) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub volume_mounts: Vec<VolumeMount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    #[serde(flatten)]
    pub source: VolumeSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolumeSource {
    HostPath { path: String },
    ConfigMap { name: String },
}

/// A single `Key=Value` entry of a systemd unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOption {
    pub section: String,
    pub name: String,
    pub value: String,
}

/// Subset of the kubelet configuration touched by the mutations.
///
/// Fields other than the feature gates are preserved untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeletConfiguration {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub feature_gates: BTreeMap<String, bool>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

fn etc_ssl_volume_mount() -> VolumeMount {
    VolumeMount {
        name: ETC_SSL_NAME.to_string(),
        mount_path: "/etc/ssl".to_string(),
        read_only: true,
    }
}

fn etc_ssl_volume() -> Volume {
    Volume {
        name: ETC_SSL_NAME.to_string(),
        source: VolumeSource::HostPath { path: "/etc/ssl".to_string() },
    }
}

fn cloud_provider_config_volume_mount() -> VolumeMount {
    VolumeMount {
        name: CLOUD_PROVIDER_CONFIG_NAME.to_string(),
        mount_path: "/etc/kubernetes/cloudprovider".to_string(),
        read_only: false,
    }
}

fn cloud_provider_config_volume() -> Volume {
    Volume {
        name: CLOUD_PROVIDER_CONFIG_NAME.to_string(),
        source: VolumeSource::ConfigMap { name: CLOUD_PROVIDER_CONFIG_NAME.to_string() },
    }
}

fn ensure_volume_mount_with_name(mounts: &mut Vec<VolumeMount>, mount: VolumeMount) {
    match mounts.iter_mut().find(|m| m.name == mount.name) {
        Some(existing) => *existing = mount,
        None => mounts.push(mount),
    }
}

fn ensure_volume_with_name(volumes: &mut Vec<Volume>, volume: Volume) {
    match volumes.iter_mut().find(|v| v.name == volume.name) {
        Some(existing) => *existing = volume,
        None => volumes.push(volume),
    }
}

/// Whether `/etc/ssl` of the host has to be mounted into control plane pods.
///
/// Images from Kubernetes 1.17 on no longer ship the well-known root CAs.
/// Anything other than a plain `major.minor[.patch]` version, including
/// pre-releases, is treated as older.
pub fn must_mount_etc_ssl(version: &str) -> bool {
    let Some(caps) = K8S_VERSION.captures(version.trim()) else {
        return false;
    };
    let (Ok(major), Ok(minor)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
        return false;
    };
    (major, minor) >= (1, 17)
}

fn ensure_volume_mounts(container: &mut Container, version: &str) {
    ensure_volume_mount_with_name(&mut container.volume_mounts, cloud_provider_config_volume_mount());
    if must_mount_etc_ssl(version) {
        ensure_volume_mount_with_name(&mut container.volume_mounts, etc_ssl_volume_mount());
    }
}

fn ensure_volumes(spec: &mut PodSpec, version: &str) {
    ensure_volume_with_name(&mut spec.volumes, cloud_provider_config_volume());
    if must_mount_etc_ssl(version) {
        ensure_volume_with_name(&mut spec.volumes, etc_ssl_volume());
    }
}

fn edit_command(container: &mut Container, edit: impl FnOnce(&mut CommandLine)) {
    let mut command = CommandLine::new(std::mem::take(&mut container.command));
    edit(&mut command);
    container.command = command.into_args();
}

/// Applies the Azure requirements to the kube-apiserver pod template.
pub fn ensure_kube_apiserver(template: &mut PodTemplate, version: &str) {
    if let Some(container) = template.spec.container_mut("kube-apiserver") {
        edit_command(container, |cmd| {
            cmd.ensure_flag("--cloud-provider=", "azure");
            cmd.ensure_flag("--cloud-config=", CONTROL_PLANE_CLOUD_CONFIG);
            cmd.ensure_flag_contains("--enable-admission-plugins=", "PersistentVolumeLabel", ",");
            cmd.ensure_no_flag_contains(
                "--disable-admission-plugins=",
                "PersistentVolumeLabel",
                ",",
            );
        });
        ensure_volume_mounts(container, version);
    }
    ensure_volumes(&mut template.spec, version);
    debug!("ensured kube-apiserver pod template");
}

/// Applies the Azure requirements to the kube-controller-manager pod template.
pub fn ensure_kube_controller_manager(template: &mut PodTemplate, version: &str) {
    if let Some(container) = template.spec.container_mut("kube-controller-manager") {
        edit_command(container, |cmd| {
            cmd.ensure_flag("--cloud-provider=", "external");
            cmd.ensure_flag("--cloud-config=", CONTROL_PLANE_CLOUD_CONFIG);
            cmd.ensure_flag("--external-cloud-volume-plugin=", "azure");
        });
        ensure_volume_mounts(container, version);
    }
    for label in [LABEL_TO_PUBLIC_NETWORKS, LABEL_TO_PRIVATE_NETWORKS, LABEL_TO_BLOCKED_CIDRS] {
        template
            .labels
            .insert(label.to_string(), LABEL_VALUE_ALLOWED.to_string());
    }
    ensure_volumes(&mut template.spec, version);
    debug!("ensured kube-controller-manager pod template");
}

/// Points the kubelet's `ExecStart` at the Azure cloud provider.
pub fn ensure_kubelet_exec_start(options: &mut [UnitOption]) {
    let Some(exec_start) = options
        .iter_mut()
        .find(|o| o.section == "Service" && o.name == "ExecStart")
    else {
        return;
    };
    let mut command = CommandLine::parse(&exec_start.value);
    command.ensure_flag("--cloud-provider=", "azure");
    command.ensure_flag("--cloud-config=", KUBELET_CLOUD_CONFIG);
    exec_start.value = command.serialize(1, " \\\n    ");
}

/// Removes feature gates the kubelet must not enable.
pub fn ensure_kubelet_configuration(config: &mut KubeletConfiguration) {
    for gate in REMOVED_KUBELET_FEATURE_GATES {
        config.feature_gates.remove(*gate);
    }
}

/// Returns the kubelet cloud provider config from its config map data.
///
/// `None` means the config map does not exist or carries no config, in
/// which case the kubelet keeps its current file.
pub fn kubelet_cloud_provider_config(data: Option<&BTreeMap<String, String>>) -> Option<String> {
    let Some(data) = data else {
        info!("configmap {} not found", CLOUD_PROVIDER_KUBELET_CONFIG_NAME);
        return None;
    };
    data.get(CLOUD_PROVIDER_CONFIG_MAP_KEY)
        .filter(|conf| !conf.is_empty())
        .cloned()
}
