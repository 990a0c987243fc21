// SPDX-License-Identifier: GPL-3.0-only

use lvm_types::VG_OWNERSHIP_TAG;
use tracing::{info, warn};

use super::LvmCommands;
use crate::command::{CommandRunner, exec, probe};
use crate::error::{Result, SysError};

/// Split a comma separated pattern list, dropping blank entries
pub fn split_patterns(devices_pattern: &str) -> Vec<&str> {
    devices_pattern
        .split(',')
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .collect()
}

/// Expand glob patterns into device paths.
///
/// A pattern without matches contributes nothing. Paths matched by more
/// than one pattern are listed once, in first-seen order.
pub fn resolve_devices(patterns: &[&str]) -> Result<Vec<String>> {
    let mut devices: Vec<String> = Vec::new();
    for pattern in patterns {
        info!("search devices: {}", pattern);
        let paths = glob::glob(pattern)
            .map_err(|e| SysError::InvalidPattern(format!("{pattern}: {e}")))?;
        let mut found = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) => found.push(path.display().to_string()),
                Err(e) => warn!("unable to read glob match for {}: {}", pattern, e),
            }
        }
        info!("found: {:?}", found);
        for device in found {
            if !devices.contains(&device) {
                devices.push(device);
            }
        }
    }
    Ok(devices)
}

impl<R: CommandRunner> LvmCommands<R> {
    /// Rescan and activate every volume group on the host.
    ///
    /// Failures are logged only; a later existence check decides.
    pub fn activate_volume_groups(&self) {
        match probe(&self.runner, "vgscan", &[]) {
            Ok(out) if !out.success => {
                info!("unable to scan for volumegroups: {}", out.output.trim())
            }
            Err(e) => info!("unable to scan for volumegroups: {}", e),
            Ok(_) => {}
        }
        match probe(&self.runner, "vgchange", &["-ay".to_string()]) {
            Ok(out) if !out.success => {
                info!("unable to activate volumegroups: {}", out.output.trim())
            }
            Err(e) => info!("unable to activate volumegroups: {}", e),
            Ok(_) => {}
        }
    }

    /// Make sure a volume group named `name` exists.
    ///
    /// Returns the group name when it already exists (possibly after
    /// re-activation), otherwise the raw `vgcreate` output.
    pub fn ensure_volume_group(&self, name: &str, devices_pattern: &str) -> Result<String> {
        if self.vg_exists(name) {
            info!("volumegroup: {} already exists", name);
            return Ok(name.to_string());
        }

        self.activate_volume_groups();
        if self.vg_exists(name) {
            info!("volumegroup: {} already exists", name);
            return Ok(name.to_string());
        }

        let physical_volumes = resolve_devices(&split_patterns(devices_pattern))?;
        let mut args = vec!["-v".to_string(), name.to_string()];
        args.extend(physical_volumes);
        args.push("--add-tag".to_string());
        args.push(VG_OWNERSHIP_TAG.to_string());

        exec(&self.runner, "vgcreate", &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn splits_and_trims_patterns() {
        assert_eq!(
            split_patterns(" /dev/sdb , /dev/nvme*n1,,"),
            vec!["/dev/sdb", "/dev/nvme*n1"]
        );
        assert!(split_patterns("").is_empty());
    }

    #[test]
    fn resolves_union_of_matches() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["loop0", "loop1", "other"] {
            File::create(dir.path().join(name)).expect("create device stub");
        }
        let loops = format!("{}/loop*", dir.path().display());
        let first = format!("{}/loop0", dir.path().display());
        let none = format!("{}/sd*", dir.path().display());

        let devices = resolve_devices(&[&first, &loops, &none]).expect("resolve");
        assert_eq!(
            devices,
            vec![first.clone(), format!("{}/loop1", dir.path().display())]
        );
    }

    #[test]
    fn rejects_malformed_pattern() {
        assert!(matches!(
            resolve_devices(&["/dev/[sd"]),
            Err(SysError::InvalidPattern(_))
        ));
    }
}
