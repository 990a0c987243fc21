// SPDX-License-Identifier: GPL-3.0-only

use lvm_types::{LV_OWNERSHIP_TAG, LvmType};
use tracing::{info, warn};

use super::LvmCommands;
use crate::command::{CommandRunner, args, exec};
use crate::error::{Result, SysError};

/// Layout actually used for a group with `pv_count` physical volumes.
///
/// Striped and mirrored layouts need at least two physical volumes; with
/// fewer, every request falls back to linear.
pub fn effective_lvm_type(requested: LvmType, pv_count: u32) -> LvmType {
    if pv_count < 2 {
        LvmType::Linear
    } else {
        requested
    }
}

/// Arguments for `lvcreate`, with `lvm_type` already resolved
pub fn lvcreate_args(
    vg: &str,
    name: &str,
    size: u64,
    lvm_type: LvmType,
    pv_count: u32,
) -> Vec<String> {
    let mut args = args(["-v", "-n", name, "-W", "y", "-L"]);
    args.push(format!("{size}b"));

    match lvm_type {
        LvmType::Striped => {
            args.extend(["--type", "striped", "--stripes"].map(String::from));
            args.push(pv_count.to_string());
        }
        LvmType::Mirror => {
            args.extend(["--type", "raid1", "--mirrors", "1", "--nosync"].map(String::from));
        }
        LvmType::Linear => {}
    }

    args.push("--add-tag".to_string());
    args.push(LV_OWNERSHIP_TAG.to_string());
    args.push(vg.to_string());
    args
}

/// Arguments for `lvextend`; filesystem volumes also get their filesystem resized
pub fn lvextend_args(vg: &str, name: &str, size: u64, raw_block: bool) -> Vec<String> {
    vec![
        "-L".to_string(),
        format!("{size}b"),
        if raw_block { "-n" } else { "-r" }.to_string(),
        format!("{vg}/{name}"),
    ]
}

impl<R: CommandRunner> LvmCommands<R> {
    /// Create a logical volume of `size` bytes.
    ///
    /// An existing volume of the same name is left untouched.
    pub fn create_volume(
        &self,
        vg: &str,
        name: &str,
        size: u64,
        lvm_type: LvmType,
    ) -> Result<String> {
        if self.lv_exists(vg, name) {
            info!("logicalvolume: {} already exists", name);
            return Ok(name.to_string());
        }

        if size == 0 {
            return Err(SysError::Validation("size must be greater than 0".to_string()));
        }

        let pvs = self.pv_count(vg)?;
        let effective = effective_lvm_type(lvm_type, pvs);
        if effective != lvm_type {
            warn!(
                "pvcount of {} is {}: only linear is supported, ignoring requested type {}",
                vg, pvs, lvm_type
            );
        }

        exec(&self.runner, "lvcreate", &lvcreate_args(vg, name, size, effective, pvs))
    }

    /// Grow a volume to `size` bytes.
    ///
    /// Whether `size` is actually larger is left to `lvextend`.
    pub fn extend_volume(
        &self,
        vg: &str,
        name: &str,
        size: u64,
        raw_block: bool,
    ) -> Result<String> {
        if !self.lv_exists(vg, name) {
            return Err(SysError::Precondition(format!(
                "logical volume {name} does not exist"
            )));
        }

        exec(&self.runner, "lvextend", &lvextend_args(vg, name, size, raw_block))
    }

    /// Remove a volume; a missing one counts as already removed
    pub fn remove_volume(&self, vg: &str, name: &str) -> Result<String> {
        if !self.lv_exists(vg, name) {
            return Ok(format!("logical volume {name} not found in volumegroup {vg}."));
        }

        let target = format!("{vg}/{name}");
        exec(&self.runner, "lvremove", &args(["-q", "-y", &target]))
    }
}
