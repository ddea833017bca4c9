//! Detection, mounting, and serialization of the embedded filesystem images
//! that ESP-family partitions carry: LittleFS, SPIFFS, and FAT.
//!
//! Every codec in this module operates on an in-memory byte image handed to
//! it by the caller (typically bytes read back from flash by
//! [`crate::flasher`]); none of them talk to a device directly. A mounted
//! filesystem owns its image exclusively and is consumed by [`Filesystem::to_image`]
//! — there is no way to keep using an instance after serializing it back out.

#[cfg(feature = "std")]
pub mod fat;
pub mod littlefs;
pub mod spiffs;

use alloc::{string::String, vec::Vec};

use crate::error::FsError;

#[cfg(feature = "std")]
pub use fat::FatFs;
pub use littlefs::LittleFs;
pub use spiffs::Spiffs;

/// Flash page/block sizes used by ESP8266 filesystem images, which differ
/// from the desktop-oriented defaults most littlefs/spiffs tooling assumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Desktop-style block/page sizing.
    Generic,
    /// ESP8266, whose flash geometry forces larger blocks.
    Esp8266,
}

/// The filesystem format identified in a candidate region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FsKind {
    LittleFs,
    Spiffs,
    Fat,
}

/// A single entry returned by [`Filesystem::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: String,
    pub is_dir: bool,
    pub size: usize,
}

/// Common contract implemented by every mounted filesystem codec.
///
/// `to_image` takes `self` by value: once a filesystem has been serialized
/// back to bytes, that instance is spent and the caller hands the resulting
/// buffer to the flasher.
pub trait Filesystem {
    fn list(&self, path: &str) -> Result<Vec<DirEntry>, FsError>;
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError>;
    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError>;
    fn delete(&mut self, path: &str) -> Result<(), FsError>;
    fn mkdir(&mut self, path: &str) -> Result<(), FsError>;
    /// Upper-bound estimate, in bytes, of flash consumed by the current
    /// contents. Used to drive a percent-used indicator; callers must not
    /// rely on it being exact.
    fn estimate_used(&self) -> usize;
    fn to_image(self) -> Vec<u8>;
}

/// Probes the head of `data` (at most 8 KiB are inspected) and reports which
/// filesystem format it matches, without mounting it.
///
/// Probe order is significant: LittleFS, then FAT, then SPIFFS, matching the
/// specificity of each format's signature (LittleFS's tag is the least
/// likely to collide by accident; SPIFFS's bare magic word the most).
pub fn detect(data: &[u8], target: Target) -> Result<FsKind, FsError> {
    let head = &data[..data.len().min(8192)];

    if littlefs::probe(head, target).is_some() {
        return Ok(FsKind::LittleFs);
    }

    #[cfg(feature = "std")]
    if fat::probe(data).is_some() {
        return Ok(FsKind::Fat);
    }

    if head.len() >= 4 && u32::from_le_bytes(head[0..4].try_into().unwrap()) == spiffs::MAGIC {
        return Ok(FsKind::Spiffs);
    }

    Err(FsError::UnknownFilesystem)
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
