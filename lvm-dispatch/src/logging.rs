// SPDX-License-Identifier: GPL-3.0-only

use tracing_subscriber::{EnvFilter, fmt};

/// Filter from `RUST_LOG`, or `directive` when unset or unparsable
pub fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init(directive: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(directive))
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_directive() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(env_filter("lvm_dispatch=debug").to_string(), "lvm_dispatch=debug");
        }
    }

    #[test]
    fn init_is_idempotent() {
        init("warn");
        init("info");
        tracing::info!("logging initialised twice");
    }
}
