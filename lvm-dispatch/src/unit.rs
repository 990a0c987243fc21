// SPDX-License-Identifier: GPL-3.0-only

//! Privileged execution unit manifest
//!
//! The manifest serializes to the cluster's Pod shape. One unit is created
//! per dispatched action and pinned to the action's node.

use std::collections::BTreeMap;

use lvm_types::{PullPolicy, VolumeAction};
use serde::{Deserialize, Serialize};

pub const PROVISIONER_COMMAND: &str = "/csi-lvmplugin-provisioner";
pub const TERMINATION_MESSAGE_PATH: &str = "/termination.log";
const HOST_PATH_TYPE: &str = "DirectoryOrCreate";

/// Host paths mounted into every unit: (volume name, path, bidirectional)
///
/// Device nodes and LVM metadata written inside the unit must show up on
/// the host and in other instances of the driver.
pub const HOST_MOUNTS: [(&str, &str, bool); 5] = [
    ("devices", "/dev", true),
    ("modules", "/lib/modules", false),
    ("lvmbackup", "/etc/lvm/backup", true),
    ("lvmcache", "/etc/lvm/cache", true),
    ("lvmlock", "/run/lock/lvm", true),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MountPropagation {
    Bidirectional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionUnit {
    pub api_version: String,
    pub kind: String,
    pub metadata: UnitMetadata,
    pub spec: UnitSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMetadata {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSpec {
    pub restart_policy: String,
    pub node_name: String,
    pub tolerations: Vec<Toleration>,
    pub containers: Vec<Container>,
    pub volumes: Vec<Volume>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toleration {
    pub operator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub volume_mounts: Vec<VolumeMount>,
    pub termination_message_path: String,
    pub image_pull_policy: PullPolicy,
    pub security_context: SecurityContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    pub privileged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub read_only: bool,
    pub mount_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_propagation: Option<MountPropagation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    pub host_path: HostPathSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPathSource {
    pub path: String,
    #[serde(rename = "type")]
    pub path_type: String,
}

/// Name of the unit that runs `action`
pub fn unit_name(action: &VolumeAction) -> String {
    format!("{}-{}", action.kind.tag(), action.name)
}

impl ExecutionUnit {
    /// Build the unit for `action`, running the provisioner with `args`
    pub fn for_action(
        action: &VolumeAction,
        args: Vec<String>,
        labels: BTreeMap<String, String>,
    ) -> Self {
        let volume_mounts = HOST_MOUNTS
            .iter()
            .map(|(name, path, bidirectional)| VolumeMount {
                name: name.to_string(),
                read_only: false,
                mount_path: path.to_string(),
                mount_propagation: bidirectional.then_some(MountPropagation::Bidirectional),
            })
            .collect();

        let volumes = HOST_MOUNTS
            .iter()
            .map(|(name, path, _)| Volume {
                name: name.to_string(),
                host_path: HostPathSource {
                    path: path.to_string(),
                    path_type: HOST_PATH_TYPE.to_string(),
                },
            })
            .collect();

        Self {
            api_version: "v1".to_string(),
            kind: "Pod".to_string(),
            metadata: UnitMetadata {
                name: unit_name(action),
                namespace: action.namespace.clone(),
                labels,
            },
            spec: UnitSpec {
                restart_policy: "Never".to_string(),
                node_name: action.node_name.clone(),
                tolerations: vec![Toleration {
                    operator: "Exists".to_string(),
                }],
                containers: vec![Container {
                    name: format!("csi-lvmplugin-{}", action.kind.tag()),
                    image: action.provisioner_image.clone(),
                    command: vec![PROVISIONER_COMMAND.to_string()],
                    args,
                    volume_mounts,
                    termination_message_path: TERMINATION_MESSAGE_PATH.to_string(),
                    image_pull_policy: action.pull_policy,
                    security_context: SecurityContext { privileged: true },
                }],
                volumes,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}
