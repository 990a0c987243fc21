// SPDX-License-Identifier: GPL-3.0-only

//! Volume actions executed on a remote node

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BackupTarget, LvmType};

/// Operation carried out by a privileged execution unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Delete,
    CreateSnapshot,
    RestoreSnapshot,
}

impl ActionKind {
    /// Short tag used in execution unit and container names
    pub fn tag(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::CreateSnapshot => "createsnapshot",
            Self::RestoreSnapshot => "restoresnapshot",
        }
    }

    pub fn is_snapshot(self) -> bool {
        matches!(self, Self::CreateSnapshot | Self::RestoreSnapshot)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Image pull policy of the provisioner container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullPolicy {
    #[default]
    Always,
    IfNotPresent,
}

impl PullPolicy {
    /// Interpret a user-supplied flag value.
    ///
    /// Only `ifnotpresent` (any case) is recognised; everything else pulls always.
    pub fn from_flag(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("ifnotpresent") {
            Self::IfNotPresent
        } else {
            Self::Always
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "Always",
            Self::IfNotPresent => "IfNotPresent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("invalid empty name or path or node")]
    MissingTarget,

    #[error("createlv without lvm type")]
    MissingLvmType,
}

/// A volume operation to run on a specific node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeAction {
    pub kind: ActionKind,

    /// Logical volume name
    pub name: String,

    /// Node the execution unit is pinned to
    pub node_name: String,

    /// Size in bytes
    pub size: u64,

    /// Required for `Create`
    pub lvm_type: Option<LvmType>,

    /// Comma separated device glob patterns
    pub devices_pattern: String,

    pub provisioner_image: String,
    pub pull_policy: PullPolicy,

    /// Namespace the execution unit is created in
    pub namespace: String,

    pub vg_name: String,
    pub snapshot_name: String,
    pub backup_target: BackupTarget,
    pub snapshot_buffer_percentage: u32,
}

impl VolumeAction {
    pub fn new(kind: ActionKind, name: impl Into<String>, node_name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            node_name: node_name.into(),
            size: 0,
            lvm_type: None,
            devices_pattern: String::new(),
            provisioner_image: String::new(),
            pull_policy: PullPolicy::default(),
            namespace: String::new(),
            vg_name: String::new(),
            snapshot_name: String::new(),
            backup_target: BackupTarget::default(),
            snapshot_buffer_percentage: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ActionError> {
        if self.name.is_empty() || self.node_name.is_empty() {
            return Err(ActionError::MissingTarget);
        }
        if self.kind == ActionKind::Create && self.lvm_type.is_none() {
            return Err(ActionError::MissingLvmType);
        }
        Ok(())
    }
}
