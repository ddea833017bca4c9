//! SPIFFS image codec.
//!
//! SPIFFS has no real directory hierarchy — file names are flat keys, and
//! paths with slashes are just keys that happen to contain slashes. This
//! codec models it exactly that way: a flat name-to-bytes map, with `list`
//! returning whatever form each name was originally stored in.

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use crate::{
    error::FsError,
    fs::{DirEntry, Filesystem, Target},
};

pub(crate) const MAGIC: u32 = 0x2014_0529;

/// Page/block geometry, which SPIFFS needs only to size a freshly
/// reformatted image; mounting an existing image doesn't otherwise depend
/// on it.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    page_size: usize,
    block_size: usize,
}

const DESKTOP_GEOMETRY: Geometry = Geometry {
    page_size: 256,
    block_size: 4096,
};
const ESP8266_GEOMETRY: Geometry = Geometry {
    page_size: 256,
    block_size: 8192,
};

/// A mounted SPIFFS image: a flat map from stored name to file contents.
#[derive(Debug, Clone)]
pub struct Spiffs {
    files: BTreeMap<String, Vec<u8>>,
    partition_size: usize,
    geometry: Geometry,
}

impl Spiffs {
    /// Mounts a SPIFFS image. The only structural requirement is the magic
    /// word; the record stream that follows is this codec's own simplified
    /// encoding of the flat name/data map (see [`Self::to_image`]).
    pub fn mount(data: &[u8], target: Target) -> Result<Self, FsError> {
        if data.len() < 4 || u32::from_le_bytes(data[0..4].try_into().unwrap()) != MAGIC {
            return Err(FsError::MountFailed("SPIFFS"));
        }

        let geometry = match target {
            Target::Generic => DESKTOP_GEOMETRY,
            Target::Esp8266 => ESP8266_GEOMETRY,
        };

        let mut files = BTreeMap::new();
        let mut pos = 4;
        while pos + 1 <= data.len() {
            let name_len = data[pos] as usize;
            if name_len == 0xFF || name_len == 0 {
                break;
            }
            pos += 1;
            if pos + name_len + 4 > data.len() {
                return Err(FsError::Malformed("SPIFFS", "truncated record".to_string()));
            }
            let name = String::from_utf8_lossy(&data[pos..pos + name_len]).into_owned();
            pos += name_len;
            let data_len =
                u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap()) as usize;
            pos += 4;
            if pos + data_len > data.len() {
                return Err(FsError::Malformed("SPIFFS", "truncated file data".to_string()));
            }
            files.insert(name, data[pos..pos + data_len].to_vec());
            pos += data_len;
        }

        Ok(Spiffs {
            files,
            partition_size: data.len(),
            geometry,
        })
    }
}

impl Filesystem for Spiffs {
    fn list(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        // SPIFFS has no real directories: every name is a flat key, so
        // listing anything but the root just means "does this one key
        // exist", and listing the root returns every key verbatim.
        if path.trim_start_matches('/').is_empty() {
            return Ok(self
                .files
                .iter()
                .map(|(name, data)| DirEntry {
                    path: name.clone(),
                    is_dir: false,
                    size: data.len(),
                })
                .collect());
        }

        self.files
            .get(path)
            .map(|data| {
                vec![DirEntry {
                    path: path.to_string(),
                    is_dir: false,
                    size: data.len(),
                }]
            })
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        self.files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<(), FsError> {
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn mkdir(&mut self, _path: &str) -> Result<(), FsError> {
        Err(FsError::NotSupported("SPIFFS has no directories"))
    }

    fn estimate_used(&self) -> usize {
        self.files
            .values()
            .map(|data| data.len().div_ceil(self.geometry.page_size) * self.geometry.page_size + self.geometry.page_size)
            .sum()
    }

    fn to_image(self) -> Vec<u8> {
        let mut out = vec![0xFFu8; self.partition_size];
        out[0..4].copy_from_slice(&MAGIC.to_le_bytes());

        let mut pos = 4;
        for (name, data) in &self.files {
            let name_bytes = name.as_bytes();
            let record_len = 1 + name_bytes.len() + 4 + data.len();
            if pos + record_len > out.len() {
                break;
            }
            out[pos] = name_bytes.len() as u8;
            pos += 1;
            out[pos..pos + name_bytes.len()].copy_from_slice(name_bytes);
            pos += name_bytes.len();
            out[pos..pos + 4].copy_from_slice(&(data.len() as u32).to_le_bytes());
            pos += 4;
            out[pos..pos + data.len()].copy_from_slice(data);
            pos += data.len();
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_image() -> Vec<u8> {
        let mut image = vec![0xFFu8; 256 * 1024];
        image[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        image
    }

    #[test]
    fn detects_magic() {
        let image = blank_image();
        assert_eq!(u32::from_le_bytes(image[0..4].try_into().unwrap()), MAGIC);
    }

    #[test]
    fn mount_rejects_bad_magic() {
        let image = vec![0u8; 4096];
        assert!(Spiffs::mount(&image, Target::Generic).is_err());
    }

    #[test]
    fn write_list_round_trips_preserving_leading_slash() {
        let image = blank_image();
        let mut fs = Spiffs::mount(&image, Target::Generic).unwrap();
        fs.write("/config.json", b"{}").unwrap();
        fs.write("plain.txt", b"data").unwrap();

        let image2 = fs.to_image();
        let remounted = Spiffs::mount(&image2, Target::Generic).unwrap();
        assert_eq!(remounted.read("/config.json").unwrap(), b"{}");
        assert_eq!(remounted.read("plain.txt").unwrap(), b"data");
    }

    #[test]
    fn mkdir_is_not_supported() {
        let image = blank_image();
        let mut fs = Spiffs::mount(&image, Target::Generic).unwrap();
        assert!(matches!(fs.mkdir("/dir"), Err(FsError::NotSupported(_))));
    }
}
