// SPDX-License-Identifier: GPL-3.0-only

//! Driver configuration
//!
//! Built once at startup and handed to the dispatcher. Values are read from
//! a TOML document; missing optional keys fall back to the driver defaults.

use std::fs;
use std::path::{Path, PathBuf};

use lvm_types::{ActionKind, PullPolicy, VolumeAction};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const DEFAULT_VERSION: &str = "dev";
pub const DEFAULT_LVM_TIMEOUT_SECS: u32 = 60;
pub const DEFAULT_SNAPSHOT_TIMEOUT_SECS: u32 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub driver_name: String,
    pub node_id: String,

    /// Reported in execution unit labels
    #[serde(default = "default_version")]
    pub version: String,

    /// Comma separated device glob patterns
    #[serde(default)]
    pub devices_pattern: String,

    #[serde(default)]
    pub vg_name: String,

    /// Namespace execution units are created in
    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub provisioner_image: String,

    #[serde(default, deserialize_with = "pull_policy_flag")]
    pub pull_policy: PullPolicy,

    #[serde(default = "default_lvm_timeout")]
    pub lvm_timeout_secs: u32,

    #[serde(default = "default_snapshot_timeout")]
    pub snapshot_timeout_secs: u32,

    #[serde(default)]
    pub snapshot_buffer_percentage: u32,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_lvm_timeout() -> u32 {
    DEFAULT_LVM_TIMEOUT_SECS
}

fn default_snapshot_timeout() -> u32 {
    DEFAULT_SNAPSHOT_TIMEOUT_SECS
}

fn pull_policy_flag<'de, D>(deserializer: D) -> Result<PullPolicy, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(PullPolicy::from_flag(&value))
}

impl DriverConfig {
    pub fn new(driver_name: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            driver_name: driver_name.into(),
            node_id: node_id.into(),
            version: default_version(),
            devices_pattern: String::new(),
            vg_name: String::new(),
            namespace: String::new(),
            provisioner_image: String::new(),
            pull_policy: PullPolicy::default(),
            lvm_timeout_secs: DEFAULT_LVM_TIMEOUT_SECS,
            snapshot_timeout_secs: DEFAULT_SNAPSHOT_TIMEOUT_SECS,
            snapshot_buffer_percentage: 0,
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.driver_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "driver_name must not be empty".to_string(),
            ));
        }
        if self.node_id.trim().is_empty() {
            return Err(ConfigError::Invalid("node_id must not be empty".to_string()));
        }
        Ok(())
    }

    /// A `kind` action for volume `name` on `node`, pre-filled from this config
    pub fn action(
        &self,
        kind: ActionKind,
        name: impl Into<String>,
        node: impl Into<String>,
    ) -> VolumeAction {
        let mut action = VolumeAction::new(kind, name, node);
        action.devices_pattern = self.devices_pattern.clone();
        action.provisioner_image = self.provisioner_image.clone();
        action.pull_policy = self.pull_policy;
        action.namespace = self.namespace.clone();
        action.vg_name = self.vg_name.clone();
        action.snapshot_buffer_percentage = self.snapshot_buffer_percentage;
        action
    }

    /// Seconds the dispatcher waits for a `kind` action to finish
    pub fn retry_budget(&self, kind: ActionKind) -> u32 {
        if kind.is_snapshot() {
            self.snapshot_timeout_secs
        } else {
            self.lvm_timeout_secs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
driver_name = "lvm.csi.metal-stack.io"
node_id = "node-1"
version = "v0.6.0"
devices_pattern = "/dev/nvme[0-9]n1,/dev/sdb"
vg_name = "csi-lvm"
namespace = "csi-lvm"
provisioner_image = "metalstack/csi-lvmplugin-provisioner:v0.6.0"
pull_policy = "IfNotPresent"
lvm_timeout_secs = 90
snapshot_buffer_percentage = 25
"#;

    #[test]
    fn parses_full_document() {
        let config = DriverConfig::from_toml_str(FULL).expect("parse config");
        assert_eq!(config.version, "v0.6.0");
        assert_eq!(config.pull_policy, PullPolicy::IfNotPresent);
        assert_eq!(config.lvm_timeout_secs, 90);
        assert_eq!(config.snapshot_timeout_secs, DEFAULT_SNAPSHOT_TIMEOUT_SECS);
        assert_eq!(config.snapshot_buffer_percentage, 25);
    }

    #[test]
    fn applies_defaults() {
        let config = DriverConfig::from_toml_str("driver_name = \"lvm\"\nnode_id = \"n\"\n")
            .expect("parse config");
        assert_eq!(config, DriverConfig::new("lvm", "n"));
    }

    #[test]
    fn unknown_pull_policy_pulls_always() {
        let raw = "driver_name = \"lvm\"\nnode_id = \"n\"\npull_policy = \"never\"\n";
        let config = DriverConfig::from_toml_str(raw).expect("parse config");
        assert_eq!(config.pull_policy, PullPolicy::Always);
    }

    #[test]
    fn rejects_empty_node_id() {
        let err = DriverConfig::from_toml_str("driver_name = \"lvm\"\nnode_id = \"\"\n")
            .expect_err("empty node id");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(FULL.as_bytes()).expect("write config");

        let config = DriverConfig::load(file.path()).expect("load config");
        assert_eq!(config.vg_name, "csi-lvm");

        let missing = DriverConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn actions_inherit_config_and_budget() {
        let config = DriverConfig::from_toml_str(FULL).expect("parse config");
        let action = config.action(ActionKind::CreateSnapshot, "pvc-1", "node-2");

        assert_eq!(action.node_name, "node-2");
        assert_eq!(action.namespace, "csi-lvm");
        assert_eq!(action.pull_policy, PullPolicy::IfNotPresent);
        assert_eq!(action.snapshot_buffer_percentage, 25);
        assert_eq!(config.retry_budget(ActionKind::CreateSnapshot), 600);
        assert_eq!(config.retry_budget(ActionKind::Delete), 90);
    }
}
