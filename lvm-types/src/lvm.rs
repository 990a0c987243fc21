// SPDX-License-Identifier: GPL-3.0-only

//! LVM (Logical Volume Manager) types
//!
//! Volume layout types, ownership tags and snapshot sizing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag added to every volume group created by the driver
pub const VG_OWNERSHIP_TAG: &str = "vg.metal-stack.io/csi-lvm-driver";

/// Tag added to every logical volume created by the driver
pub const LV_OWNERSHIP_TAG: &str = "lv.metal-stack.io/csi-lvm-driver";

/// Sector size used by `lvcreate -L <n>s`
pub const SECTOR_SIZE: u64 = 512;

/// Fixed copy-on-write reserve (~5 MiB) added to every snapshot.
pub const SNAPSHOT_RESERVE_SECTORS: u64 = 10_000;

/// Layout of a logical volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LvmType {
    Linear,
    Striped,
    Mirror,
}

impl LvmType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Striped => "striped",
            Self::Mirror => "mirror",
        }
    }

    /// Whether this layout spreads data across more than one physical volume
    pub fn needs_multiple_pvs(self) -> bool {
        match self {
            Self::Linear => false,
            Self::Striped | Self::Mirror => true,
        }
    }
}

impl fmt::Display for LvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lvmType is incorrect: {0}")]
pub struct UnknownLvmType(pub String);

impl FromStr for LvmType {
    type Err = UnknownLvmType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "striped" => Ok(Self::Striped),
            "mirror" => Ok(Self::Mirror),
            other => Err(UnknownLvmType(other.to_string())),
        }
    }
}

/// Size of a snapshot of an origin volume, in 512-byte sectors.
///
/// Small volumes would otherwise exhaust their copy-on-write area almost
/// immediately, so a fixed reserve is always added.
pub fn snapshot_reserve_sectors(origin_size_bytes: u64) -> u64 {
    origin_size_bytes / SECTOR_SIZE + SNAPSHOT_RESERVE_SECTORS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GIB;

    #[test]
    fn snapshot_reserve_for_one_gib() {
        assert_eq!(snapshot_reserve_sectors(GIB), 2_107_152);
    }

    #[test]
    fn snapshot_reserve_for_five_gib() {
        assert_eq!(snapshot_reserve_sectors(5 * GIB), 10_495_760);
    }

    #[test]
    fn snapshot_reserve_floors_partial_sectors() {
        assert_eq!(snapshot_reserve_sectors(511), SNAPSHOT_RESERVE_SECTORS);
        assert_eq!(snapshot_reserve_sectors(1023), SNAPSHOT_RESERVE_SECTORS + 1);
    }

    #[test]
    fn parses_known_types_and_rejects_others() {
        assert_eq!("striped".parse::<LvmType>(), Ok(LvmType::Striped));
        assert_eq!("mirror".parse::<LvmType>(), Ok(LvmType::Mirror));
        let err = "raid5".parse::<LvmType>().unwrap_err();
        assert_eq!(err.to_string(), "lvmType is incorrect: raid5");
    }

    #[test]
    fn only_linear_fits_a_single_pv() {
        assert!(!LvmType::Linear.needs_multiple_pvs());
        assert!(LvmType::Striped.needs_multiple_pvs());
        assert!(LvmType::Mirror.needs_multiple_pvs());
    }
}
