// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Error types for host-side volume operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Precondition(String),

    #[error("{message}: `{command}` output: {output}")]
    ExternalTool {
        command: String,
        output: String,
        message: String,
    },

    #[error("invalid device pattern: {0}")]
    InvalidPattern(String),

    #[error("unexpected output from `{command}`: {output}")]
    UnexpectedOutput { command: String, output: String },
}

impl SysError {
    /// Raw tool output attached to the error, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::ExternalTool { output, .. } | Self::UnexpectedOutput { output, .. } => {
                Some(output)
            }
            _ => None,
        }
    }
}

/// Result type alias for host-side operations
pub type Result<T> = std::result::Result<T, SysError>;
