//! Host-side toolkit for provisioning, inspecting, and maintaining the flash
//! storage of ESP8266/ESP32-family microcontrollers over a serial or USB
//! transport.
//!
//! This crate covers three layers, leaves-first: the ROM/stub loader
//! protocol engine (connection, command framing, reset sequencing, flashing)
//! behind the `serialport` feature; and, always available, the
//! device-independent codecs for data that lives *inside* flash once it's
//! been read back to the host — application images, partition tables,
//! embedded filesystems, and the NVS key/value store.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod connection;
pub mod elf;
pub mod error;
pub mod flasher;
pub mod fs;
pub mod image_format;
pub mod nvs;
pub mod targets;

mod command;
#[cfg(any(feature = "serialport", feature = "usb-raw"))]
pub mod interface;
#[cfg(feature = "usb-raw")]
pub mod usb_transport;

#[cfg(feature = "std")]
pub mod logging {
    //! Convenience logger initialization for applications embedding this crate.
    use env_logger::Env;
    use log::LevelFilter;

    pub fn initialize_logger(filter: LevelFilter) {
        env_logger::Builder::from_env(Env::default().default_filter_or(filter.as_str()))
            .format_target(false)
            .init();
    }
}
