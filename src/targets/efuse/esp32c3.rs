//! eFuse field table for the ESP32-C3.

#![allow(unused)]

use super::EfuseField;

/// Factory-programmed MAC address, low word.
pub(crate) const MAC0: EfuseField = EfuseField::new(0, 17, 544, 32);
/// Factory-programmed MAC address, high half-word.
pub(crate) const MAC1: EfuseField = EfuseField::new(0, 18, 576, 16);

/// Major chip revision.
pub(crate) const MAJOR_VERSION: EfuseField = EfuseField::new(0, 22, 728, 2);
/// Most-significant bit of the minor chip revision.
pub(crate) const MINOR_VERSION_HI: EfuseField = EfuseField::new(0, 22, 727, 1);
/// Least-significant bits of the minor chip revision.
pub(crate) const MINOR_VERSION_LO: EfuseField = EfuseField::new(0, 20, 658, 3);
