//! eFuse field table for the ESP8266.
//!
//! The ESP8266's eFuse controller predates the MAC0/MAC1-field convention
//! used by the ESP32 family: the MAC address is reconstructed from three
//! whole 32-bit words rather than two fixed fields, with the OUI half
//! chosen from a couple of hard-coded fallbacks when word 3 is unset.

#![allow(unused)]

use super::EfuseField;

/// eFuse word 0, used for the low 24 bits of the station MAC address.
pub(crate) const WORD0: EfuseField = EfuseField::new(0, 0, 0, 32);
/// eFuse word 1, used for the next 16 bits of the MAC address.
pub(crate) const WORD1: EfuseField = EfuseField::new(0, 1, 32, 32);
/// eFuse word 3, carrying the OUI when the device was provisioned with one.
pub(crate) const WORD3: EfuseField = EfuseField::new(0, 3, 96, 32);
