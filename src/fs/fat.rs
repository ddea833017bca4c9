//! FAT image codec.
//!
//! Unlike LittleFS and SPIFFS, FAT's on-disk structures (cluster chains,
//! directory entries, the FAT tables themselves) are delegated entirely to
//! the `fatfs` crate; this module is the adapter between that library's API
//! and the [`Filesystem`] trait, plus the ESP-specific auto-detection of a
//! 0x1000-byte header offset.

use alloc::{rc::Rc, string::ToString, vec::Vec};
use core::cell::RefCell;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use fatfs::{FileSystem, FsOptions};

use crate::{
    error::FsError,
    fs::{split_path, DirEntry, Filesystem},
};

/// Offset at which some ESP toolchains place a FAT image, ahead of the
/// actual boot sector.
const ESP_HEADER_OFFSET: usize = 0x1000;

fn has_boot_signature(data: &[u8]) -> bool {
    if data.len() < 512 {
        return false;
    }
    let boot_sig_ok = u16::from_le_bytes(data[510..512].try_into().unwrap()) == 0xAA55;
    let fat_tag_at = |offset: usize| &data[offset..offset + 3] == b"FAT";
    boot_sig_ok && (fat_tag_at(54) || fat_tag_at(82))
}

/// Probes for a FAT boot signature, trying both offset 0 and the ESP
/// 0x1000 offset. Returns the offset the signature was found at.
pub(crate) fn probe(data: &[u8]) -> Option<usize> {
    if has_boot_signature(data) {
        return Some(0);
    }
    if data.len() > ESP_HEADER_OFFSET && has_boot_signature(&data[ESP_HEADER_OFFSET..]) {
        return Some(ESP_HEADER_OFFSET);
    }
    None
}

/// `fatfs::FileSystem` takes ownership of its storage; this keeps a second
/// handle to the same buffer so the bytes can be recovered once the
/// filesystem is consumed by [`FatFs::to_image`].
#[derive(Clone)]
struct SharedCursor(Rc<RefCell<Cursor<Vec<u8>>>>);

impl Read for SharedCursor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.borrow_mut().read(buf)
    }
}

impl Write for SharedCursor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

impl Seek for SharedCursor {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.0.borrow_mut().seek(pos)
    }
}

/// A mounted FAT image.
pub struct FatFs {
    fs: FileSystem<SharedCursor>,
    storage: SharedCursor,
    header_offset: usize,
}

impl core::fmt::Debug for FatFs {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FatFs")
            .field("header_offset", &self.header_offset)
            .finish()
    }
}

impl FatFs {
    /// Mounts a FAT image, auto-stripping the ESP 0x1000 header offset if
    /// the boot signature is only found there.
    pub fn mount(data: &[u8]) -> Result<Self, FsError> {
        let header_offset = probe(data).ok_or(FsError::MountFailed("FAT"))?;
        let body = data[header_offset..].to_vec();
        let storage = SharedCursor(Rc::new(RefCell::new(Cursor::new(body))));
        let fs = FileSystem::new(storage.clone(), FsOptions::new())
            .map_err(|_| FsError::MountFailed("FAT"))?;

        Ok(FatFs {
            fs,
            storage,
            header_offset,
        })
    }
}

impl Filesystem for FatFs {
    fn list(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let mut dir = self.fs.root_dir();
        for part in split_path(path) {
            dir = dir
                .open_dir(part)
                .map_err(|_| FsError::NotFound(path.to_string()))?;
        }

        let mut out = Vec::new();
        for entry in dir.iter() {
            let entry =
                entry.map_err(|_| FsError::Malformed("FAT", "directory read error".to_string()))?;
            let name = entry.file_name();
            if name == "." || name == ".." {
                continue;
            }
            out.push(DirEntry {
                path: name,
                is_dir: entry.is_dir(),
                size: entry.len() as usize,
            });
        }
        Ok(out)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let parts = split_path(path);
        let (dir_parts, name) = match parts.split_last() {
            Some((name, dir_parts)) => (dir_parts, *name),
            None => return Err(FsError::IsADirectory(path.to_string())),
        };

        let mut dir = self.fs.root_dir();
        for part in dir_parts {
            dir = dir
                .open_dir(part)
                .map_err(|_| FsError::NotFound(path.to_string()))?;
        }

        let mut file = dir
            .open_file(name)
            .map_err(|_| FsError::NotFound(path.to_string()))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|_| FsError::Malformed("FAT", "short read".to_string()))?;
        Ok(buf)
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        let parts = split_path(path);
        let (dir_parts, name) = match parts.split_last() {
            Some((name, dir_parts)) => (dir_parts, *name),
            None => return Err(FsError::IsADirectory(path.to_string())),
        };

        let mut dir = self.fs.root_dir();
        for part in dir_parts {
            dir = dir
                .open_dir(part)
                .map_err(|_| FsError::NotFound(path.to_string()))?;
        }

        let mut file = dir
            .create_file(name)
            .map_err(|_| FsError::Malformed("FAT", "could not create file".to_string()))?;
        file.truncate()
            .map_err(|_| FsError::Malformed("FAT", "could not truncate file".to_string()))?;
        file.write_all(data)
            .map_err(|_| FsError::Overflow(data.len()))?;
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<(), FsError> {
        let parts = split_path(path);
        let (dir_parts, name) = match parts.split_last() {
            Some((name, dir_parts)) => (dir_parts, *name),
            None => return Err(FsError::NotSupported("removing the root directory")),
        };

        let mut dir = self.fs.root_dir();
        for part in dir_parts {
            dir = dir
                .open_dir(part)
                .map_err(|_| FsError::NotFound(path.to_string()))?;
        }

        dir.remove(name)
            .map_err(|_| FsError::NotFound(path.to_string()))
    }

    fn mkdir(&mut self, path: &str) -> Result<(), FsError> {
        let parts = split_path(path);
        let mut dir = self.fs.root_dir();
        for part in &parts {
            dir = match dir.create_dir(part) {
                Ok(d) => d,
                Err(_) => dir.open_dir(part).map_err(|_| {
                    FsError::Malformed("FAT", "could not create directory".to_string())
                })?,
            };
        }
        Ok(())
    }

    fn estimate_used(&self) -> usize {
        fn walk(dir: &fatfs::Dir<'_, SharedCursor>) -> usize {
            let mut total = 0;
            for entry in dir.iter().flatten() {
                let name = entry.file_name();
                if name == "." || name == ".." {
                    continue;
                }
                if entry.is_dir() {
                    total += walk(&entry.to_dir());
                } else {
                    total += entry.len() as usize;
                }
            }
            total
        }

        walk(&self.fs.root_dir())
    }

    fn to_image(self) -> Vec<u8> {
        let header_offset = self.header_offset;
        drop(self.fs);

        let mut body = Rc::try_unwrap(self.storage.0)
            .map(RefCell::into_inner)
            .unwrap_or_else(|shared| shared.borrow().clone())
            .into_inner();

        if header_offset > 0 {
            let mut out = alloc::vec![0xFFu8; header_offset];
            out.append(&mut body);
            out
        } else {
            body
        }
    }
}
