// SPDX-License-Identifier: GPL-3.0-only

use lvm_types::{ActionError, BackupTargetError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiError;

/// Coarse classification handed to protocol adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    ClusterApi,
    /// The unit failed on its node; the workload should be scheduled elsewhere
    ExecutionFailed,
    Timeout,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Validation(#[from] ActionError),

    #[error("unable to encode provisioner arguments: {0}")]
    Encoding(#[from] BackupTargetError),

    #[error("cluster api error: {0}")]
    ClusterApi(#[from] ApiError),

    #[error("provisioner pod {unit} terminated with failure")]
    ExecutionFailed { unit: String },

    #[error("create process {unit} timeout after {seconds} seconds")]
    Timeout { unit: String, seconds: u64 },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Encoding(_) => ErrorKind::Validation,
            Self::ClusterApi(_) => ErrorKind::ClusterApi,
            Self::ExecutionFailed { .. } => ErrorKind::ExecutionFailed,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Whether the requesting workload should be retried on another node
    pub fn reschedule_elsewhere(&self) -> bool {
        self.kind() == ErrorKind::ExecutionFailed
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
