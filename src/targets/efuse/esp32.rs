//! eFuse field table for the original ESP32.
//!
//! Unlike the later C/S/H-series chips, the ESP32's eFuse controller exposes
//! a single contiguous register window rather than a multi-block layout, so
//! every field here lives in block 0.

#![allow(unused)]

use super::EfuseField;

/// Factory-programmed MAC address, low word.
pub(crate) const MAC0: EfuseField = EfuseField::new(0, 1, 32, 32);
/// Factory-programmed MAC address, high half-word.
pub(crate) const MAC1: EfuseField = EfuseField::new(0, 2, 64, 16);

/// Chip revision bit 0 (combined with [`CHIP_VER_REV2`] and an APB control
/// register bit to form the full revision number).
pub(crate) const CHIP_VER_REV1: EfuseField = EfuseField::new(0, 3, 111, 1);
/// Legacy 2-bit chip version field, superseded by the revision bits.
pub(crate) const CHIP_VERSION: EfuseField = EfuseField::new(0, 3, 108, 2);
/// Chip revision bit 1.
pub(crate) const CHIP_VER_REV2: EfuseField = EfuseField::new(0, 5, 180, 1);
/// Set when the rated CPU frequency differs from the default.
pub(crate) const CHIP_CPU_FREQ_RATED: EfuseField = EfuseField::new(0, 3, 109, 1);
/// When [`CHIP_CPU_FREQ_RATED`] is set, selects 160 MHz (0) or 240 MHz (1).
pub(crate) const CHIP_CPU_FREQ_LOW: EfuseField = EfuseField::new(0, 3, 108, 1);
/// Package version, low 3 bits.
pub(crate) const CHIP_VER_PKG: EfuseField = EfuseField::new(0, 3, 105, 3);
/// Package version, most-significant bit.
pub(crate) const CHIP_VER_PKG_4BIT: EfuseField = EfuseField::new(0, 3, 98, 1);
/// Flash encryption coding scheme (none, 3/4, or repeat).
pub(crate) const CODING_SCHEME: EfuseField = EfuseField::new(0, 6, 192, 2);
/// Set when the application CPU core has been disabled.
pub(crate) const CHIP_VER_DIS_APP_CPU: EfuseField = EfuseField::new(0, 3, 96, 1);
/// Set when Bluetooth has been disabled.
pub(crate) const CHIP_VER_DIS_BT: EfuseField = EfuseField::new(0, 3, 97, 1);
/// Set when the ADC reference voltage has been calibrated into eFuse.
pub(crate) const ADC_VREF: EfuseField = EfuseField::new(0, 4, 136, 1);
/// Set when BLOCK3 is partially reserved for system use.
pub(crate) const BLK3_PART_RESERVE: EfuseField = EfuseField::new(0, 3, 110, 1);
/// Minor chip revision.
pub(crate) const MINOR_VERSION: EfuseField = EfuseField::new(0, 5, 184, 2);
