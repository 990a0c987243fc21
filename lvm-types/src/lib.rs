// SPDX-License-Identifier: GPL-3.0-only

//! Shared domain models for the LVM volume driver
//!
//! These types are used throughout the stack:
//!
//! - **lvm-sys**: Host-side managers take `LvmType` and the ownership tags
//! - **lvm-dispatch**: Encodes a `VolumeAction` into a privileged execution unit
//! - **protocol adapters**: Build `VolumeAction` values from incoming requests

pub mod action;
pub mod backup;
pub mod common;
pub mod lvm;

pub use action::{ActionError, ActionKind, PullPolicy, VolumeAction};
pub use backup::{BackupTarget, BackupTargetError};
pub use common::{GIB, KIB, MIB, TIB};
pub use lvm::{
    LV_OWNERSHIP_TAG, LvmType, SECTOR_SIZE, SNAPSHOT_RESERVE_SECTORS, UnknownLvmType,
    VG_OWNERSHIP_TAG, snapshot_reserve_sectors,
};
