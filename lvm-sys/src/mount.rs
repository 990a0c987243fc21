// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem and bind mounts of logical volumes
//!
//! Mounts are made with shared propagation so they are visible outside the
//! mount namespace of the process performing them.

use std::fs::{self, File, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::{error, info};

use crate::command::{
    CommandRunner, HostCommandRunner, MOUNT_TOOLS, exec, missing_tools, probe, render,
};
use crate::error::{Result, SysError};

pub const DEFAULT_FS_TYPE: &str = "ext4";

/// Mode applied to mount points so workloads running as any user can write
pub const DEFAULT_MOUNT_MODE: u32 = 0o777;

/// Substring of `mount` output that marks an existing mount as success
const ALREADY_MOUNTED: &str = "already mounted";

pub fn device_path(vg: &str, lv: &str) -> String {
    format!("/dev/{vg}/{lv}")
}

/// Mount manager bound to a command runner
#[derive(Debug, Clone)]
pub struct MountCommands<R = HostCommandRunner> {
    runner: R,
    fs_type: String,
    mode: u32,
}

impl MountCommands<HostCommandRunner> {
    pub fn host() -> Self {
        Self::new(HostCommandRunner)
    }
}

impl<R: CommandRunner> MountCommands<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            fs_type: DEFAULT_FS_TYPE.to_string(),
            mode: DEFAULT_MOUNT_MODE,
        }
    }

    pub fn with_fs_type(mut self, fs_type: impl Into<String>) -> Self {
        self.fs_type = fs_type.into();
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn fs_type(&self) -> &str {
        &self.fs_type
    }

    /// Mount and format binaries that cannot be found on this host
    pub fn missing_tools(&self) -> Vec<String> {
        let mkfs = format!("mkfs.{}", self.fs_type);
        let mut tools: Vec<&str> = MOUNT_TOOLS.to_vec();
        tools.push(&mkfs);
        missing_tools(&tools)
    }

    /// Whether `blkid` reports our filesystem type on the device.
    ///
    /// This is a plain substring match on the probe output, not a check of
    /// the filesystem identity.
    pub fn is_formatted(&self, device: &str) -> bool {
        match probe(&self.runner, "blkid", &[device.to_string()]) {
            Ok(out) => {
                if !out.success {
                    info!(
                        "unable to check if {} is already formatted: {}",
                        device,
                        out.output.trim()
                    );
                }
                out.output.contains(self.fs_type.as_str())
            }
            Err(e) => {
                info!("unable to check if {} is already formatted: {}", device, e);
                false
            }
        }
    }

    /// Format the volume if needed and mount it at `mount_path`
    pub fn mount_filesystem(&self, lv: &str, mount_path: &Path, vg: &str) -> Result<String> {
        let device = device_path(vg, lv);

        if !self.is_formatted(&device) {
            info!("formatting with mkfs.{} {}", self.fs_type, device);
            exec(&self.runner, &format!("mkfs.{}", self.fs_type), &[device.clone()])?;
        }

        fs::create_dir_all(mount_path).map_err(|e| {
            SysError::Io(std::io::Error::new(
                e.kind(),
                format!("unable to create mount directory for lv {lv}: {e}"),
            ))
        })?;

        let args = vec![
            "--make-shared".to_string(),
            "-t".to_string(),
            self.fs_type.clone(),
            device,
            mount_path.display().to_string(),
        ];
        self.mount(&args, mount_path)
    }

    /// Bind mount the volume's device node at `mount_path` (raw block access)
    pub fn bind_mount_block(&self, lv: &str, mount_path: &Path, vg: &str) -> Result<String> {
        let device = device_path(vg, lv);

        // A device node can only be bind mounted onto an existing file.
        if !mount_path.exists() {
            if let Some(parent) = mount_path.parent() {
                fs::create_dir_all(parent)?;
            }
            File::create(mount_path).map_err(|e| {
                SysError::Io(std::io::Error::new(
                    e.kind(),
                    format!("unable to create mount target for lv {lv}: {e}"),
                ))
            })?;
        }

        let args = vec![
            "--make-shared".to_string(),
            "--bind".to_string(),
            device,
            mount_path.display().to_string(),
        ];
        self.mount(&args, mount_path)
    }

    /// Lazily force-unmount `target`.
    ///
    /// Never fails: errors, including "not mounted", are logged and the raw
    /// output is returned.
    pub fn unmount(&self, target: &Path) -> String {
        let args = vec![
            "--lazy".to_string(),
            "--force".to_string(),
            target.display().to_string(),
        ];
        info!("{}", render("umount", &args));
        match probe(&self.runner, "umount", &args) {
            Ok(out) => {
                if !out.success {
                    error!("unable to umount {}: {}", target.display(), out.output.trim());
                }
                out.output
            }
            Err(e) => {
                error!("unable to umount {}: {}", target.display(), e);
                String::new()
            }
        }
    }

    fn mount(&self, args: &[String], mount_path: &Path) -> Result<String> {
        let rendered = render("mount", args);
        info!("{}", rendered);
        let out = self.runner.run("mount", args)?;
        if !out.success && !out.output.contains(ALREADY_MOUNTED) {
            return Err(SysError::ExternalTool {
                command: rendered,
                output: out.output,
                message: format!("unable to mount {}", mount_path.display()),
            });
        }

        fs::set_permissions(mount_path, Permissions::from_mode(self.mode))?;
        info!("mount output: {}", out.output.trim());
        Ok(out.output)
    }
}
