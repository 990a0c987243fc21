// SPDX-License-Identifier: GPL-3.0-only

//! Backup target parameters
//!
//! The driver never interprets these values. They are handed to the
//! provisioner as a single opaque command-line token.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupTargetError {
    #[error("unable to serialize backup target: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("backup target token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("backup target token does not hold valid parameters: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// S3-style location that snapshot contents are replicated to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_passphrase: Option<String>,
}

impl BackupTarget {
    /// Encode into a single flag-safe token (base64 of the JSON form).
    ///
    /// Field order is fixed, so equal parameters always produce the same token.
    pub fn encode(&self) -> Result<String, BackupTargetError> {
        let json = serde_json::to_vec(self).map_err(BackupTargetError::Serialize)?;
        Ok(STANDARD.encode(json))
    }

    pub fn decode(token: &str) -> Result<Self, BackupTargetError> {
        let json = STANDARD.decode(token.trim())?;
        serde_json::from_slice(&json).map_err(BackupTargetError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BackupTarget {
        BackupTarget {
            endpoint: Some("https://s3.example.com".to_string()),
            access_key: Some("AKIA".to_string()),
            secret_key: Some("s3cr3t/with+chars".to_string()),
            bucket: Some("snapshots".to_string()),
            region: None,
            encryption_passphrase: None,
        }
    }

    #[test]
    fn encoding_is_stable_and_reversible() {
        let target = sample();
        let first = target.encode().expect("encode");
        let second = target.clone().encode().expect("encode");
        assert_eq!(first, second);
        assert!(!first.contains(' '));
        assert_eq!(BackupTarget::decode(&first).expect("decode"), target);
    }

    #[test]
    fn empty_target_encodes_to_empty_object() {
        let token = BackupTarget::default().encode().expect("encode");
        assert_eq!(token, STANDARD.encode("{}"));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            BackupTarget::decode("***"),
            Err(BackupTargetError::Base64(_))
        ));
        let not_json = STANDARD.encode("plain text");
        assert!(matches!(
            BackupTarget::decode(&not_json),
            Err(BackupTargetError::Deserialize(_))
        ));
    }
}
