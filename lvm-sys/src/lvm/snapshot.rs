// SPDX-License-Identifier: GPL-3.0-only

use lvm_types::snapshot_reserve_sectors;

use super::LvmCommands;
use crate::command::{CommandRunner, args, exec};
use crate::error::{Result, SysError};

/// Arguments for a copy-on-write snapshot of `vg/origin`
pub fn snapshot_args(vg: &str, origin: &str, snapshot: &str, origin_size: u64) -> Vec<String> {
    let source = format!("{vg}/{origin}");
    let size = format!("{}s", snapshot_reserve_sectors(origin_size));
    args(["-q", "-s", &source, "-n", snapshot, "-y", "-L", &size])
}

impl<R: CommandRunner> LvmCommands<R> {
    /// Snapshot `origin` as `snapshot`.
    ///
    /// Names LVM reserves for itself (such as those starting with
    /// "snapshot") are not checked here.
    pub fn create_snapshot(
        &self,
        vg: &str,
        origin: &str,
        snapshot: &str,
        origin_size: u64,
    ) -> Result<String> {
        self.require_vg(vg)?;
        if !self.lv_exists(vg, origin) {
            return Err(SysError::Precondition(format!(
                "logical volume {origin} does not exist"
            )));
        }
        if self.lv_exists(vg, snapshot) {
            return Err(SysError::Precondition(format!(
                "logical snapshot volume {snapshot} already exists"
            )));
        }

        exec(&self.runner, "lvcreate", &snapshot_args(vg, origin, snapshot, origin_size))
    }

    /// Remove a snapshot. Unlike [`LvmCommands::remove_volume`], a missing
    /// snapshot is an error.
    pub fn delete_snapshot(&self, vg: &str, snapshot: &str) -> Result<String> {
        self.require_vg(vg)?;
        if !self.lv_exists(vg, snapshot) {
            return Err(SysError::Precondition(format!(
                "logical snapshot volume {snapshot} does not exist"
            )));
        }

        let target = format!("{vg}/{snapshot}");
        exec(&self.runner, "lvremove", &args(["-q", "-y", &target]))
    }

    fn require_vg(&self, vg: &str) -> Result<()> {
        if self.vg_exists(vg) {
            Ok(())
        } else {
            Err(SysError::Precondition(format!("volume group {vg} does not exist")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvm_types::GIB;

    #[test]
    fn snapshot_size_is_given_in_sectors() {
        let args = snapshot_args("data", "pvc-1", "pvc-1-snap", GIB);
        assert_eq!(
            args,
            vec!["-q", "-s", "data/pvc-1", "-n", "pvc-1-snap", "-y", "-L", "2107152s"]
        );
    }
}
