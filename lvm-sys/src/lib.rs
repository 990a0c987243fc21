// SPDX-License-Identifier: GPL-3.0-only

//! Host-side operations for the LVM volume driver
//!
//! This crate drives the LVM and filesystem command-line tools on the
//! current node:
//! - Volume group creation and re-activation
//! - Logical volume create/extend/remove with layout fallback
//! - Copy-on-write snapshots
//! - Formatting, mounting and bind mounting of volumes
//!
//! These operations require root and access to the host's `/dev`.

pub mod command;
pub mod error;
pub mod lvm;
pub mod mount;

pub use command::{CommandRunner, HostCommandRunner, LVM_TOOLS, MOUNT_TOOLS, ToolOutput, render};
pub use error::{Result, SysError};
pub use lvm::LvmCommands;
pub use mount::{DEFAULT_FS_TYPE, DEFAULT_MOUNT_MODE, MountCommands, device_path};
