// SPDX-License-Identifier: GPL-3.0-only

//! Narrow view of the cluster API used by the dispatcher

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::unit::ExecutionUnit;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("resource already exists")]
    AlreadyExists,

    #[error("resource not found")]
    NotFound,

    #[error("{0}")]
    Other(String),
}

/// Observed lifecycle phase of an execution unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

/// Create, read and delete a single named execution unit
#[async_trait]
pub trait ExecutionUnitApi: Send + Sync {
    async fn create(&self, namespace: &str, unit: &ExecutionUnit) -> Result<(), ApiError>;

    async fn phase(&self, namespace: &str, name: &str) -> Result<UnitPhase, ApiError>;

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), ApiError>;
}
