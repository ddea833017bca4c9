//! eFuse field table for the ESP32-P4.
//!
//! Shares its eFuse controller generation (11 blocks, MAC and wafer-version
//! fields living in BLOCK1) with the ESP32-C5/C6/H2 and ESP32-S2.

#![allow(unused)]

use super::EfuseField;

/// Total size in bytes of each block.
pub(crate) const BLOCK_SIZES: &[u32] = &[24, 24, 32, 32, 32, 32, 32, 32, 32, 32, 32];

/// Factory-programmed MAC address, low word.
pub(crate) const MAC0: EfuseField = EfuseField::new(1, 0, 0, 32);
/// Factory-programmed MAC address, high half-word.
pub(crate) const MAC1: EfuseField = EfuseField::new(1, 1, 32, 16);

/// Wafer version, minor.
pub(crate) const WAFER_VERSION_MINOR: EfuseField = EfuseField::new(1, 2, 64, 4);
/// Wafer version, major.
pub(crate) const WAFER_VERSION_MAJOR: EfuseField = EfuseField::new(1, 2, 68, 2);
/// Disables the wafer-version-major consistency check done by ROM code.
pub(crate) const DISABLE_WAFER_VERSION_MAJOR: EfuseField = EfuseField::new(1, 2, 70, 1);
/// Package version.
pub(crate) const PKG_VERSION: EfuseField = EfuseField::new(1, 2, 90, 3);
/// 192-bit block reserved for user data.
pub(crate) const BLOCK_USR_DATA: EfuseField = EfuseField::new(3, 0, 0, 192);
