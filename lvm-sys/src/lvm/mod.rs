// SPDX-License-Identifier: GPL-3.0-only

//! LVM volume group, logical volume and snapshot management
//!
//! Existence is always queried live against the host; nothing is cached.
//! Operations on the same group or volume are not synchronised here, so
//! callers must serialise work per volume name.

pub mod logical_volume;
pub mod snapshot;
pub mod volume_group;

pub use logical_volume::{effective_lvm_type, lvcreate_args, lvextend_args};
pub use snapshot::snapshot_args;
pub use volume_group::{resolve_devices, split_patterns};

use tracing::debug;

use crate::command::{
    CommandRunner, HostCommandRunner, LVM_TOOLS, args, exec, missing_tools, probe, render,
};
use crate::error::{Result, SysError};

/// LVM tool wrapper bound to a command runner
#[derive(Debug, Clone, Default)]
pub struct LvmCommands<R = HostCommandRunner> {
    runner: R,
}

impl LvmCommands<HostCommandRunner> {
    pub fn host() -> Self {
        Self::new(HostCommandRunner)
    }
}

impl<R: CommandRunner> LvmCommands<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// LVM binaries that cannot be found on this host
    pub fn missing_tools(&self) -> Vec<String> {
        missing_tools(LVM_TOOLS)
    }

    /// Check whether the volume group exists
    pub fn vg_exists(&self, vg: &str) -> bool {
        self.reports_name("vgs", vg.to_string(), "vg_name", vg)
    }

    /// Check whether `vg/name` resolves to a logical volume (or snapshot)
    pub fn lv_exists(&self, vg: &str, name: &str) -> bool {
        self.reports_name("lvs", format!("{vg}/{name}"), "lv_name", name)
    }

    /// Number of physical volumes backing the group
    pub fn pv_count(&self, vg: &str) -> Result<u32> {
        let query = args([vg, "--noheadings", "-o", "pv_count"]);
        let out = exec(&self.runner, "vgs", &query)?;
        out.trim()
            .parse()
            .map_err(|_| SysError::UnexpectedOutput {
                command: render("vgs", &query),
                output: out,
            })
    }

    fn reports_name(&self, program: &str, target: String, field: &str, expected: &str) -> bool {
        let query = vec![
            target,
            "--noheadings".to_string(),
            "-o".to_string(),
            field.to_string(),
        ];
        match probe(&self.runner, program, &query) {
            Ok(out) if out.success => out.output.trim() == expected,
            Ok(out) => {
                debug!("{} reported no match for {}: {}", program, expected, out.output.trim());
                false
            }
            Err(e) => {
                debug!("unable to run {}: {}", program, e);
                false
            }
        }
    }
}
