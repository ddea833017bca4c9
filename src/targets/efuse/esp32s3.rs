//! eFuse field table for the ESP32-S3.
//!
//! Shares its eFuse controller generation (11 blocks, MAC and wafer-version
//! fields living in BLOCK1) with the ESP32-S2.

#![allow(unused)]

use super::EfuseField;

/// Total size in bytes of each block.
pub(crate) const BLOCK_SIZES: &[u32] = &[24, 24, 32, 32, 32, 32, 32, 32, 32, 32, 32];

/// Factory-programmed MAC address, low word.
pub(crate) const MAC0: EfuseField = EfuseField::new(1, 0, 0, 32);
/// Factory-programmed MAC address, high half-word.
pub(crate) const MAC1: EfuseField = EfuseField::new(1, 1, 0, 16);

/// Disables the wafer-version-major consistency check done by ROM code.
pub(crate) const DISABLE_WAFER_VERSION_MAJOR: EfuseField = EfuseField::new(0, 5, 160, 1);
/// Wafer version, major.
pub(crate) const WAFER_VERSION_MAJOR: EfuseField = EfuseField::new(1, 3, 114, 2);
/// Most-significant bit of the wafer minor version.
pub(crate) const WAFER_VERSION_MINOR_HI: EfuseField = EfuseField::new(1, 3, 116, 1);
/// Package version.
pub(crate) const PKG_VERSION: EfuseField = EfuseField::new(1, 4, 128, 4);
/// Least-significant bits of the wafer minor version.
pub(crate) const WAFER_VERSION_MINOR_LO: EfuseField = EfuseField::new(1, 4, 132, 3);
/// 192-bit block reserved for user data.
pub(crate) const BLOCK_USR_DATA: EfuseField = EfuseField::new(3, 0, 0, 192);
