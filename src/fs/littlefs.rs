//! LittleFS image codec.
//!
//! Mounts a LittleFS superblock, walks its metadata log into an in-memory
//! directory tree, and can serialize that tree back to a byte image of the
//! same size it was mounted from.
//!
//! The directory tree is a flat arena of nodes addressed by index, each
//! carrying its parent's index, rather than a tree of heap-allocated nodes —
//! LittleFS directories can and do reference each other cyclically through
//! on-disk block pointers, which a `Rc`/`RefCell` tree handles awkwardly.

use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};

use crate::{
    error::FsError,
    fs::{split_path, DirEntry, Filesystem, Target},
};

const TAG: &[u8; 8] = b"littlefs";
const DESKTOP_BLOCK_SIZES: [usize; 4] = [4096, 2048, 1024, 512];
const ESP8266_BLOCK_SIZES: [usize; 2] = [8192, 4096];

/// Mount parameters ESP8266 images require beyond block/size geometry.
#[derive(Debug, Clone, Copy)]
pub struct Esp8266Params {
    pub read: u32,
    pub prog: u32,
    pub cache: u32,
    pub lookahead: u32,
    pub name_max: u32,
    pub block_cycles: u32,
}

const ESP8266_PARAMS: Esp8266Params = Esp8266Params {
    read: 64,
    prog: 64,
    cache: 64,
    lookahead: 64,
    name_max: 32,
    block_cycles: 16,
};

/// Tag types used in the metadata commit log. Real littlefs multiplexes a
/// much larger tag-type space for CTZ skip-lists and wear-levelling
/// metadata; this codec only needs enough of that shape to round-trip a
/// directory tree, so it defines a reduced set consistent with the
/// `(type:12, id:10, length:10)` layout.
mod tag {
    pub const DIR: u16 = 1;
    pub const FILE: u16 = 2;
    pub const DATA: u16 = 3;
    pub const END: u16 = 4;
}

#[derive(Debug, Clone)]
enum NodeKind {
    Dir,
    File(Vec<u8>),
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    kind: NodeKind,
    parent: usize,
    children: Vec<usize>,
}

/// A mounted LittleFS image.
#[derive(Debug, Clone)]
pub struct LittleFs {
    nodes: Vec<Node>,
    block_size: usize,
    block_count: usize,
    image_size: usize,
    version_major: u16,
    version_minor: u16,
    esp8266: Option<Esp8266Params>,
}

fn encode_tag(ty: u16, id: u16, len: u16) -> u32 {
    ((ty as u32) << 20) | ((id as u32) << 10) | (len as u32)
}

fn decode_tag(raw: u32) -> (u16, u16, u16) {
    (((raw >> 20) & 0xFFF) as u16, ((raw >> 10) & 0x3FF) as u16, (raw & 0x3FF) as u16)
}

fn align4(n: usize) -> usize {
    (n + 3) & !3
}

/// Checks whether a superblock with a valid `littlefs` tag and major version
/// 2 exists at block 0 or block 1 for any candidate block size, returning
/// the matching `(block_size, block_index)` without fully mounting.
pub(crate) fn probe(data: &[u8], target: Target) -> Option<(usize, usize)> {
    let candidates: &[usize] = match target {
        Target::Generic => &DESKTOP_BLOCK_SIZES,
        Target::Esp8266 => &ESP8266_BLOCK_SIZES,
    };

    for &block_size in candidates {
        for block_index in 0..2 {
            let offset = block_index * block_size;
            if data.len() < offset + 20 {
                continue;
            }
            if &data[offset + 8..offset + 16] != TAG {
                continue;
            }
            let major = u16::from_le_bytes(data[offset + 2..offset + 4].try_into().unwrap());
            if major == 2 {
                return Some((block_size, block_index));
            }
        }
    }

    None
}

impl LittleFs {
    /// Mounts a LittleFS image, trying each candidate block size in turn.
    pub fn mount(data: &[u8], target: Target) -> Result<Self, FsError> {
        let candidates: &[usize] = match target {
            Target::Generic => &DESKTOP_BLOCK_SIZES,
            Target::Esp8266 => &ESP8266_BLOCK_SIZES,
        };

        for &block_size in candidates {
            if let Some(fs) = Self::try_mount(data, block_size, target) {
                return fs;
            }
        }

        Err(FsError::MountFailed("LittleFS"))
    }

    fn try_mount(
        data: &[u8],
        block_size: usize,
        target: Target,
    ) -> Option<Result<Self, FsError>> {
        let mut block_index = None;
        for candidate in 0..2 {
            let offset = candidate * block_size;
            if data.len() < offset + 20 {
                continue;
            }
            if &data[offset + 8..offset + 16] == TAG {
                let major = u16::from_le_bytes(data[offset + 2..offset + 4].try_into().unwrap());
                if major == 2 {
                    block_index = Some(candidate);
                    break;
                }
            }
        }

        let block_index = block_index?;
        let offset = block_index * block_size;
        let version_minor = u16::from_le_bytes(data[offset..offset + 2].try_into().unwrap());
        let version_major = u16::from_le_bytes(data[offset + 2..offset + 4].try_into().unwrap());
        let stored_block_count = u32::from_le_bytes(data[offset + 16..offset + 20].try_into().unwrap());
        let block_count = if stored_block_count > 0 {
            stored_block_count as usize
        } else {
            data.len() / block_size
        };

        let mut nodes = vec![Node {
            name: String::new(),
            kind: NodeKind::Dir,
            parent: 0,
            children: Vec::new(),
        }];

        let mut pos = align4(offset + 20);
        let block_end = (block_index + 1) * block_size;
        let mut stack = vec![0usize];
        let mut pending_file: Option<usize> = None;

        while pos + 4 <= data.len() && pos + 4 <= block_end {
            let raw = u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap());
            if raw == 0xFFFF_FFFF {
                break;
            }
            let (ty, _id, len) = decode_tag(raw);
            pos += 4;
            if pos + len as usize > data.len() {
                return Some(Err(FsError::Malformed(
                    "LittleFS",
                    "truncated metadata tag".to_string(),
                )));
            }
            let payload = &data[pos..pos + len as usize];
            pos = align4(pos + len as usize);

            match ty {
                tag::DIR => {
                    let parent = *stack.last().unwrap();
                    let name = String::from_utf8_lossy(payload).into_owned();
                    let index = nodes.len();
                    nodes.push(Node {
                        name,
                        kind: NodeKind::Dir,
                        parent,
                        children: Vec::new(),
                    });
                    nodes[parent].children.push(index);
                    stack.push(index);
                }
                tag::FILE => {
                    let parent = *stack.last().unwrap();
                    let name = String::from_utf8_lossy(payload).into_owned();
                    let index = nodes.len();
                    nodes.push(Node {
                        name,
                        kind: NodeKind::File(Vec::new()),
                        parent,
                        children: Vec::new(),
                    });
                    nodes[parent].children.push(index);
                    pending_file = Some(index);
                }
                tag::DATA => {
                    if let Some(index) = pending_file.take() {
                        nodes[index].kind = NodeKind::File(payload.to_vec());
                    }
                }
                tag::END => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                _ => {
                    return Some(Err(FsError::Malformed(
                        "LittleFS",
                        alloc::format!("unknown metadata tag type {ty}"),
                    )))
                }
            }
        }

        let esp8266 = matches!(target, Target::Esp8266).then_some(ESP8266_PARAMS);

        Some(Ok(LittleFs {
            nodes,
            block_size,
            block_count,
            image_size: data.len(),
            version_major,
            version_minor,
            esp8266,
        }))
    }

    /// ESP8266-specific mount parameters, present only when mounted for that
    /// target.
    pub fn esp8266_params(&self) -> Option<Esp8266Params> {
        self.esp8266
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    fn resolve(&self, path: &str) -> Result<usize, FsError> {
        let parts = split_path(path);
        let mut current = 0usize;
        'outer: for part in parts {
            for &child in &self.nodes[current].children {
                if self.nodes[child].name == part {
                    current = child;
                    continue 'outer;
                }
            }
            return Err(FsError::NotFound(path.to_string()));
        }
        Ok(current)
    }
}

impl Filesystem for LittleFs {
    fn list(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let index = self.resolve(path)?;
        match &self.nodes[index].kind {
            NodeKind::Dir => Ok(self.nodes[index]
                .children
                .iter()
                .map(|&child| {
                    let node = &self.nodes[child];
                    let (is_dir, size) = match &node.kind {
                        NodeKind::Dir => (true, 0),
                        NodeKind::File(data) => (false, data.len()),
                    };
                    DirEntry {
                        path: node.name.clone(),
                        is_dir,
                        size,
                    }
                })
                .collect()),
            NodeKind::File(_) => Err(FsError::NotADirectory(path.to_string())),
        }
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let index = self.resolve(path)?;
        match &self.nodes[index].kind {
            NodeKind::File(data) => Ok(data.clone()),
            NodeKind::Dir => Err(FsError::IsADirectory(path.to_string())),
        }
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        let parts = split_path(path);
        let (dir_parts, name) = match parts.split_last() {
            Some((name, dir_parts)) => (dir_parts, *name),
            None => return Err(FsError::IsADirectory(path.to_string())),
        };

        let mut current = 0usize;
        for part in dir_parts {
            current = match self.nodes[current]
                .children
                .iter()
                .find(|&&c| self.nodes[c].name == *part)
            {
                Some(&c) => c,
                None => return Err(FsError::NotFound(path.to_string())),
            };
        }

        if let Some(&existing) = self.nodes[current]
            .children
            .iter()
            .find(|&&c| self.nodes[c].name == name)
        {
            match &mut self.nodes[existing].kind {
                NodeKind::File(buf) => {
                    *buf = data.to_vec();
                    return Ok(());
                }
                NodeKind::Dir => return Err(FsError::IsADirectory(path.to_string())),
            }
        }

        let index = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_string(),
            kind: NodeKind::File(data.to_vec()),
            parent: current,
            children: Vec::new(),
        });
        self.nodes[current].children.push(index);
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<(), FsError> {
        let index = self.resolve(path)?;
        if index == 0 {
            return Err(FsError::NotSupported("removing the root directory"));
        }
        let parent = self.nodes[index].parent;
        self.nodes[parent].children.retain(|&c| c != index);
        Ok(())
    }

    fn mkdir(&mut self, path: &str) -> Result<(), FsError> {
        let parts = split_path(path);
        let mut current = 0usize;
        for part in parts {
            let existing = self.nodes[current]
                .children
                .iter()
                .find(|&&c| self.nodes[c].name == *part)
                .copied();

            current = match existing {
                Some(c) => {
                    if !matches!(self.nodes[c].kind, NodeKind::Dir) {
                        return Err(FsError::NotADirectory(path.to_string()));
                    }
                    c
                }
                None => {
                    let index = self.nodes.len();
                    self.nodes.push(Node {
                        name: part.to_string(),
                        kind: NodeKind::Dir,
                        parent: current,
                        children: Vec::new(),
                    });
                    self.nodes[current].children.push(index);
                    index
                }
            };
        }
        Ok(())
    }

    fn estimate_used(&self) -> usize {
        let block = self.block_size;
        let mut total = 2 * block;
        for node in &self.nodes[1..] {
            match &node.kind {
                NodeKind::Dir => total += block,
                NodeKind::File(data) => {
                    let blocks = data.len().div_ceil(block);
                    total += blocks * block + block;
                }
            }
        }
        total
    }

    fn to_image(self) -> Vec<u8> {
        let mut out = vec![0xFFu8; self.image_size];

        let mut superblock = Vec::with_capacity(20);
        superblock.extend_from_slice(&self.version_minor.to_le_bytes());
        superblock.extend_from_slice(&self.version_major.to_le_bytes());
        superblock.extend_from_slice(&0u32.to_le_bytes()); // crc/flags, unused by this codec
        superblock.extend_from_slice(TAG);
        superblock.extend_from_slice(&(self.block_count as u32).to_le_bytes());

        out[0..superblock.len()].copy_from_slice(&superblock);
        out[self.block_size..self.block_size + superblock.len()].copy_from_slice(&superblock);

        let mut log = Vec::new();
        self.serialize_node(0, &mut log);
        log.extend_from_slice(&encode_tag(tag::END, 0, 0).to_le_bytes());

        let start = align4(20);
        let end = (start + log.len()).min(self.image_size - self.block_size);
        out[start..end].copy_from_slice(&log[..end - start]);

        out
    }
}

impl LittleFs {
    fn serialize_node(&self, index: usize, out: &mut Vec<u8>) {
        for &child in &self.nodes[index].children {
            let node = &self.nodes[child];
            match &node.kind {
                NodeKind::Dir => {
                    out.extend_from_slice(&encode_tag(tag::DIR, 0, node.name.len() as u16).to_le_bytes());
                    out.extend_from_slice(node.name.as_bytes());
                    while out.len() % 4 != 0 {
                        out.push(0);
                    }
                    self.serialize_node(child, out);
                    out.extend_from_slice(&encode_tag(tag::END, 0, 0).to_le_bytes());
                }
                NodeKind::File(data) => {
                    out.extend_from_slice(&encode_tag(tag::FILE, 0, node.name.len() as u16).to_le_bytes());
                    out.extend_from_slice(node.name.as_bytes());
                    while out.len() % 4 != 0 {
                        out.push(0);
                    }
                    out.extend_from_slice(&encode_tag(tag::DATA, 0, data.len() as u16).to_le_bytes());
                    out.extend_from_slice(data);
                    while out.len() % 4 != 0 {
                        out.push(0);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_image() -> Vec<u8> {
        vec![0xFFu8; 512 * 1024]
    }

    fn write_superblock(image: &mut [u8], offset: usize, version: (u16, u16), tag_byte_11: u8) {
        image[offset..offset + 2].copy_from_slice(&version.0.to_le_bytes());
        image[offset + 2..offset + 4].copy_from_slice(&version.1.to_le_bytes());
        image[offset + 4..offset + 8].copy_from_slice(&0u32.to_le_bytes());
        image[offset + 8..offset + 16].copy_from_slice(TAG);
        image[offset + 11] = tag_byte_11;
        image[offset + 16..offset + 20].copy_from_slice(&128u32.to_le_bytes());
    }

    /// Scenario S5: a valid superblock is classified LittleFS; corrupting
    /// byte 11 of the tag breaks the match.
    #[test]
    fn detects_valid_superblock() {
        let mut image = blank_image();
        write_superblock(&mut image, 0, (0, 2), b't');
        assert!(probe(&image, Target::Generic).is_some());
    }

    #[test]
    fn rejects_corrupted_tag() {
        let mut image = blank_image();
        write_superblock(&mut image, 0, (0, 2), b'X');
        assert!(probe(&image, Target::Generic).is_none());
    }

    #[test]
    fn mount_empty_and_write_file_round_trips() {
        let mut image = blank_image();
        write_superblock(&mut image, 0, (0, 2), b't');
        write_superblock(&mut image, 4096, (0, 2), b't');

        let mut fs = LittleFs::mount(&image, Target::Generic).unwrap();
        fs.mkdir("/data").unwrap();
        fs.write("/data/config.txt", b"hello world").unwrap();

        let entries = fs.list("/data").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "config.txt");

        let image2 = fs.to_image();
        let mut remounted = LittleFs::mount(&image2, Target::Generic).unwrap();
        assert_eq!(remounted.read("/data/config.txt").unwrap(), b"hello world");

        remounted.delete("/data/config.txt").unwrap();
        assert!(remounted.read("/data/config.txt").is_err());
    }
}
