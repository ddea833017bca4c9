//! Parser and in-place editor for NVS (non-volatile storage) partitions.
//!
//! NVS is ESP-IDF's append-only key/value store, laid out as a sequence of
//! 4 KiB pages, each holding up to 126 32-byte entries. This module parses an
//! NVS image read back from flash, exposes its namespaces and entries, and
//! allows editing a value in place when the new encoding fits in the entry's
//! existing span — the same constraint a running ESP-IDF firmware is under.
//!
//! See <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/storage/nvs_flash.html>
//! for the on-disk format this module implements.

use alloc::{
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use crc32fast::Hasher;

use crate::error::NvsError;

/// Size in bytes of a single NVS page, including its header.
pub const PAGE_SIZE: usize = 4096;
/// Size in bytes of the page header (state, sequence number, entry bitmap).
const HEADER_SIZE: usize = 64;
/// Size in bytes of a single entry slot.
const ENTRY_SIZE: usize = 32;
/// Number of entry slots following the header in each page.
const ENTRIES_PER_PAGE: usize = (PAGE_SIZE - HEADER_SIZE) / ENTRY_SIZE;

const PAGE_STATE_UNINITIALIZED: u32 = 0xFFFF_FFFF;
const PAGE_STATE_ACTIVE: u32 = 0xFFFF_FFFE;
const PAGE_STATE_FULL: u32 = 0xFFFF_FFFC;
const PAGE_STATE_FREEING: u32 = 0xFFFF_FFF8;
const PAGE_STATE_CORRUPT: u32 = 0xFFFF_FFF0;

/// Lifecycle state of an NVS page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Page has never been written.
    Uninitialized,
    /// Page accepts new entries.
    Active,
    /// Page has no remaining free entry slots.
    Full,
    /// Page is being garbage-collected into a fresh page.
    Freeing,
    /// Page failed a consistency check and must not be trusted.
    Corrupt,
}

impl PageState {
    fn from_raw(raw: u32) -> Self {
        match raw {
            PAGE_STATE_UNINITIALIZED => PageState::Uninitialized,
            PAGE_STATE_ACTIVE => PageState::Active,
            PAGE_STATE_FULL => PageState::Full,
            PAGE_STATE_FREEING => PageState::Freeing,
            // Anything else (including 0xFFFFFFF0 itself) is treated as
            // corrupt: the page's contents cannot be relied upon.
            _ => PageState::Corrupt,
        }
    }
}

/// Per-slot occupancy recorded in a page's 32-byte entry bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    Empty,
    Written,
    Erased,
}

impl EntryState {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b11 => EntryState::Empty,
            0b10 => EntryState::Written,
            // Both 0b00 and 0b01 map to the erased state in practice; only
            // 0b00 is ever produced by a conforming writer.
            _ => EntryState::Erased,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            EntryState::Empty => 0b11,
            EntryState::Written => 0b10,
            EntryState::Erased => 0b00,
        }
    }
}

/// The on-disk type tag of an NVS entry, matching ESP-IDF's `ItemType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[non_exhaustive]
pub enum DataType {
    U8 = 0x01,
    I8 = 0x11,
    U16 = 0x02,
    I16 = 0x12,
    U32 = 0x04,
    I32 = 0x14,
    U64 = 0x08,
    I64 = 0x18,
    String = 0x21,
    BlobData = 0x42,
    BlobIndex = 0x48,
}

impl DataType {
    fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0x01 => DataType::U8,
            0x11 => DataType::I8,
            0x02 => DataType::U16,
            0x12 => DataType::I16,
            0x04 => DataType::U32,
            0x14 => DataType::I32,
            0x08 => DataType::U64,
            0x18 => DataType::I64,
            0x21 => DataType::String,
            0x42 => DataType::BlobData,
            0x48 => DataType::BlobIndex,
            _ => return None,
        })
    }

    /// Number of payload bytes occupied by a primitive of this type, or
    /// `None` for the variable-length types.
    fn primitive_width(self) -> Option<usize> {
        match self {
            DataType::U8 | DataType::I8 => Some(1),
            DataType::U16 | DataType::I16 => Some(2),
            DataType::U32 | DataType::I32 => Some(4),
            DataType::U64 | DataType::I64 => Some(8),
            DataType::String | DataType::BlobData | DataType::BlobIndex => None,
        }
    }
}

/// A decoded entry value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NvsValue {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    String(String),
    Blob(Vec<u8>),
}

/// A fully decoded NVS entry and its location within the partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Namespace this entry belongs to, resolved through the namespace
    /// table.
    pub namespace: String,
    /// Entry key.
    pub key: String,
    /// Decoded value.
    pub value: NvsValue,
    /// Whether the stored header CRC matched the recomputed one.
    pub header_crc_valid: bool,
    page_index: usize,
    entry_index: usize,
    span: u8,
}

/// A single 4 KiB NVS page, including the entries that have been decoded
/// from it.
#[derive(Debug, Clone)]
struct Page {
    data: Vec<u8>,
    state: PageState,
}

impl Page {
    fn seq_number(&self) -> u32 {
        u32::from_le_bytes(self.data[4..8].try_into().unwrap())
    }

    fn entry_state(&self, index: usize) -> EntryState {
        let bit_offset = index * 2;
        let byte = self.data[HEADER_SIZE / 2 + bit_offset / 8];
        let shift = bit_offset % 8;
        EntryState::from_bits(byte >> shift)
    }

    fn set_entry_state(&mut self, index: usize, state: EntryState) {
        let bit_offset = index * 2;
        let byte_index = HEADER_SIZE / 2 + bit_offset / 8;
        let shift = bit_offset % 8;
        let mask = !(0b11u8 << shift);
        self.data[byte_index] = (self.data[byte_index] & mask) | (state.to_bits() << shift);
    }

    fn entry_bytes(&self, index: usize) -> &[u8] {
        let start = HEADER_SIZE + index * ENTRY_SIZE;
        &self.data[start..start + ENTRY_SIZE]
    }

    fn entry_bytes_mut(&mut self, index: usize) -> &mut [u8] {
        let start = HEADER_SIZE + index * ENTRY_SIZE;
        &mut self.data[start..start + ENTRY_SIZE]
    }
}

/// Recomputes the standard (zlib/Ethernet) CRC-32 over a set of byte slices.
fn crc32_of(chunks: &[&[u8]]) -> u32 {
    let mut hasher = Hasher::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize()
}

fn header_crc(entry: &[u8]) -> u32 {
    crc32_of(&[&entry[0..4], &entry[8..32]])
}

fn raw_key(entry: &[u8]) -> String {
    let raw = &entry[8..24];
    let len = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..len]).into_owned()
}

/// A parsed NVS partition image.
///
/// Pages are kept in their on-disk order and byte-for-byte, so that an
/// unmodified [`NvsPartition`] serializes back to exactly the bytes it was
/// parsed from.
#[derive(Debug, Clone)]
pub struct NvsPartition {
    pages: Vec<Page>,
    /// namespace index -> namespace name
    namespaces: BTreeMap<u8, String>,
}

impl NvsPartition {
    /// Parses an NVS partition image.
    ///
    /// Pages are read in order until the first [`PageState::Uninitialized`]
    /// or [`PageState::Corrupt`] page, matching the behavior of a real
    /// ESP-IDF NVS reader walking towards the write head.
    pub fn parse(data: &[u8]) -> Result<Self, NvsError> {
        if data.len() < PAGE_SIZE {
            return Err(NvsError::Empty);
        }

        let mut pages = Vec::new();
        for chunk in data.chunks(PAGE_SIZE) {
            if chunk.len() < PAGE_SIZE {
                break;
            }

            let state = PageState::from_raw(u32::from_le_bytes(chunk[0..4].try_into().unwrap()));
            if matches!(state, PageState::Uninitialized | PageState::Corrupt) {
                break;
            }

            pages.push(Page {
                data: chunk.to_vec(),
                state,
            });
        }

        let mut partition = NvsPartition {
            pages,
            namespaces: BTreeMap::new(),
        };
        partition.rebuild_namespaces();
        Ok(partition)
    }

    fn rebuild_namespaces(&mut self) {
        self.namespaces.clear();
        for page_index in 0..self.pages.len() {
            let mut index = 0;
            while index < ENTRIES_PER_PAGE {
                let page = &self.pages[page_index];
                if page.entry_state(index) != EntryState::Written {
                    index += 1;
                    continue;
                }

                let entry = page.entry_bytes(index);
                let ns_index = entry[0];
                let span = entry[2].max(1);

                if ns_index == 0 {
                    if let Some(DataType::U8) = DataType::from_raw(entry[1]) {
                        let name = raw_key(entry);
                        let value = entry[24];
                        self.namespaces.insert(value, name);
                    }
                }

                index += span as usize;
            }
        }
    }

    fn namespace_index(&self, namespace: &str) -> Option<u8> {
        self.namespaces
            .iter()
            .find(|(_, name)| name.as_str() == namespace)
            .map(|(index, _)| *index)
    }

    /// Returns the namespace table: namespace index -> namespace name.
    pub fn namespaces(&self) -> &BTreeMap<u8, String> {
        &self.namespaces
    }

    /// Decodes every written entry in the partition, skipping the
    /// namespace-table bootstrap entries themselves.
    pub fn entries(&self) -> Vec<Entry> {
        let mut out = Vec::new();

        for page_index in 0..self.pages.len() {
            let mut index = 0;
            while index < ENTRIES_PER_PAGE {
                let page = &self.pages[page_index];
                if page.entry_state(index) != EntryState::Written {
                    index += 1;
                    continue;
                }

                let entry = page.entry_bytes(index);
                let ns_index = entry[0];
                let span = entry[2].max(1);

                if ns_index != 0 {
                    if let Some(decoded) = self.decode_entry(page_index, index) {
                        out.push(decoded);
                    }
                }

                index += span as usize;
            }
        }

        out
    }

    fn decode_entry(&self, page_index: usize, entry_index: usize) -> Option<Entry> {
        let page = &self.pages[page_index];
        let entry = page.entry_bytes(entry_index);

        let ns_index = entry[0];
        let data_type = DataType::from_raw(entry[1])?;
        let span = entry[2].max(1);
        let stored_crc = u32::from_le_bytes(entry[4..8].try_into().unwrap());
        let key = raw_key(entry);
        let header_crc_valid = header_crc(entry) == stored_crc;
        let namespace = self
            .namespaces
            .get(&ns_index)
            .cloned()
            .unwrap_or_else(|| format!("ns{ns_index:#x}"));

        let value = if let Some(width) = data_type.primitive_width() {
            let bytes = &entry[24..24 + width];
            Some(decode_primitive(data_type, bytes))
        } else {
            self.decode_spanning(page_index, entry_index, span, data_type)
        }?;

        Some(Entry {
            namespace,
            key,
            value,
            header_crc_valid,
            page_index,
            entry_index,
            span,
        })
    }

    fn decode_spanning(
        &self,
        page_index: usize,
        entry_index: usize,
        span: u8,
        data_type: DataType,
    ) -> Option<NvsValue> {
        let entry = self.pages[page_index].entry_bytes(entry_index);
        let size = u16::from_le_bytes(entry[24..26].try_into().unwrap()) as usize;

        if matches!(data_type, DataType::BlobIndex) {
            // total size : u32, chunk count : u8, chunk start : u8
            let total_size = u32::from_le_bytes(entry[24..28].try_into().unwrap());
            return Some(NvsValue::Blob(total_size.to_le_bytes().to_vec()));
        }

        let mut payload = Vec::with_capacity(size);
        let mut remaining = size;
        for chunk_offset in 1..span as usize {
            let idx = entry_index + chunk_offset;
            if idx >= ENTRIES_PER_PAGE {
                return None;
            }
            let chunk = self.pages[page_index].entry_bytes(idx);
            let take = remaining.min(ENTRY_SIZE);
            payload.extend_from_slice(&chunk[..take]);
            remaining -= take;
        }

        match data_type {
            DataType::String => {
                // Drop the trailing NUL included in `size`.
                let len = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
                Some(NvsValue::String(
                    String::from_utf8_lossy(&payload[..len]).into_owned(),
                ))
            }
            DataType::BlobData => Some(NvsValue::Blob(payload)),
            _ => None,
        }
    }

    /// Looks up a single entry by namespace and key.
    pub fn get(&self, namespace: &str, key: &str) -> Option<Entry> {
        self.entries()
            .into_iter()
            .find(|e| e.namespace == namespace && e.key == key)
    }

    /// Overwrites a primitive entry's value in place.
    ///
    /// Fails with [`NvsError::TypeMismatch`] if the new value's type doesn't
    /// match the stored entry's type.
    pub fn set_u32(&mut self, namespace: &str, key: &str, value: u32) -> Result<(), NvsError> {
        self.set_primitive(namespace, key, DataType::U32, &value.to_le_bytes())
    }

    /// Overwrites a primitive entry's value in place. See [`Self::set_u32`].
    pub fn set_primitive(
        &mut self,
        namespace: &str,
        key: &str,
        data_type: DataType,
        value: &[u8],
    ) -> Result<(), NvsError> {
        let entry = self
            .get(namespace, key)
            .ok_or_else(|| NvsError::NotFound(namespace.to_string(), key.to_string()))?;

        let page = &mut self.pages[entry.page_index];
        let raw = page.entry_bytes(entry.entry_index);
        let stored_type = raw[1];
        if stored_type != data_type as u8 {
            return Err(NvsError::TypeMismatch(key.to_string(), stored_type));
        }

        let slot = page.entry_bytes_mut(entry.entry_index);
        slot[24..24 + value.len()].copy_from_slice(value);
        let crc = header_crc(slot);
        slot[4..8].copy_from_slice(&crc.to_le_bytes());
        Ok(())
    }

    /// Overwrites a string entry's value in place, if the new string (plus
    /// its terminating NUL) fits within the entry's existing span.
    pub fn set_string(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), NvsError> {
        let mut payload = value.as_bytes().to_vec();
        payload.push(0);
        self.set_spanning(namespace, key, DataType::String, &payload)
    }

    /// Overwrites a blob entry's value in place, if it fits within the
    /// entry's existing span.
    pub fn set_blob(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), NvsError> {
        self.set_spanning(namespace, key, DataType::BlobData, value)
    }

    fn set_spanning(
        &mut self,
        namespace: &str,
        key: &str,
        data_type: DataType,
        payload: &[u8],
    ) -> Result<(), NvsError> {
        let entry = self
            .get(namespace, key)
            .ok_or_else(|| NvsError::NotFound(namespace.to_string(), key.to_string()))?;

        let capacity = (entry.span as usize - 1) * ENTRY_SIZE;
        if payload.len() > capacity {
            return Err(NvsError::Overflow(key.to_string(), payload.len(), capacity));
        }

        {
            let page = &mut self.pages[entry.page_index];
            let stored_type = page.entry_bytes(entry.entry_index)[1];
            if stored_type != data_type as u8 {
                return Err(NvsError::TypeMismatch(key.to_string(), stored_type));
            }
        }

        let data_crc = crc32_of(&[payload]);
        {
            let page = &mut self.pages[entry.page_index];
            let head = page.entry_bytes_mut(entry.entry_index);
            head[24..26].copy_from_slice(&(payload.len() as u16).to_le_bytes());
            head[28..32].copy_from_slice(&data_crc.to_le_bytes());
            let crc = header_crc(head);
            head[4..8].copy_from_slice(&crc.to_le_bytes());
        }

        let mut remaining = payload;
        for chunk_offset in 1..entry.span as usize {
            let idx = entry.entry_index + chunk_offset;
            let page = &mut self.pages[entry.page_index];
            let slot = page.entry_bytes_mut(idx);
            let take = remaining.len().min(ENTRY_SIZE);
            slot[..take].copy_from_slice(&remaining[..take]);
            for byte in slot[take..].iter_mut() {
                *byte = 0xFF;
            }
            remaining = &remaining[take..];
        }

        Ok(())
    }

    /// Deletes an entry, erasing its bitmap slots and filling its bytes
    /// with `0xFF`.
    pub fn delete(&mut self, namespace: &str, key: &str) -> Result<(), NvsError> {
        let entry = self
            .get(namespace, key)
            .ok_or_else(|| NvsError::NotFound(namespace.to_string(), key.to_string()))?;

        let page = &mut self.pages[entry.page_index];
        for offset in 0..entry.span as usize {
            let idx = entry.entry_index + offset;
            page.set_entry_state(idx, EntryState::Erased);
            let slot = page.entry_bytes_mut(idx);
            slot.fill(0xFF);
        }

        Ok(())
    }

    /// Whether the given namespace/key exists.
    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.get(namespace, key).is_some()
    }

    /// Serializes the partition back to its raw byte image.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pages.len() * PAGE_SIZE);
        for page in &self.pages {
            out.extend_from_slice(&page.data);
        }
        out
    }

    /// Number of pages currently parsed from the image.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn decode_primitive(data_type: DataType, bytes: &[u8]) -> NvsValue {
    match data_type {
        DataType::U8 => NvsValue::U8(bytes[0]),
        DataType::I8 => NvsValue::I8(bytes[0] as i8),
        DataType::U16 => NvsValue::U16(u16::from_le_bytes(bytes.try_into().unwrap())),
        DataType::I16 => NvsValue::I16(i16::from_le_bytes(bytes.try_into().unwrap())),
        DataType::U32 => NvsValue::U32(u32::from_le_bytes(bytes.try_into().unwrap())),
        DataType::I32 => NvsValue::I32(i32::from_le_bytes(bytes.try_into().unwrap())),
        DataType::U64 => NvsValue::U64(u64::from_le_bytes(bytes.try_into().unwrap())),
        DataType::I64 => NvsValue::I64(i64::from_le_bytes(bytes.try_into().unwrap())),
        DataType::String | DataType::BlobData | DataType::BlobIndex => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn blank_page(state: u32, seq: u32) -> Vec<u8> {
        let mut page = vec![0xFFu8; PAGE_SIZE];
        page[0..4].copy_from_slice(&state.to_le_bytes());
        page[4..8].copy_from_slice(&seq.to_le_bytes());
        page
    }

    fn write_entry(
        page: &mut [u8],
        index: usize,
        ns_index: u8,
        data_type: DataType,
        key: &str,
        payload: &[u8; 8],
    ) {
        let start = HEADER_SIZE + index * ENTRY_SIZE;
        let entry = &mut page[start..start + ENTRY_SIZE];
        entry[0] = ns_index;
        entry[1] = data_type as u8;
        entry[2] = 1; // span
        entry[3] = 0; // chunk_index
        let mut key_bytes = [0u8; 16];
        let bytes = key.as_bytes();
        key_bytes[..bytes.len()].copy_from_slice(bytes);
        entry[8..24].copy_from_slice(&key_bytes);
        entry[24..32].copy_from_slice(payload);
        let crc = header_crc(entry);
        entry[4..8].copy_from_slice(&crc.to_le_bytes());

        let bitmap_index = HEADER_SIZE / 2 + (index * 2) / 8;
        let shift = (index * 2) % 8;
        let mask = !(0b11u8 << shift);
        page[bitmap_index] = (page[bitmap_index] & mask) | (EntryState::Written.to_bits() << shift);
    }

    fn sample_image() -> Vec<u8> {
        let mut page = blank_page(PAGE_STATE_ACTIVE, 1);

        let mut ns_payload = [0u8; 8];
        ns_payload[0] = 1;
        write_entry(&mut page, 0, 0, DataType::U8, "wifi", &ns_payload);

        let mut cnt_payload = [0u8; 8];
        cnt_payload[0..4].copy_from_slice(&5u32.to_le_bytes());
        write_entry(&mut page, 1, 1, DataType::U32, "wifi_cnt", &cnt_payload);

        page
    }

    #[test]
    fn parses_namespace_and_primitive_entry() {
        let image = sample_image();
        let partition = NvsPartition::parse(&image).unwrap();

        assert_eq!(partition.namespaces().get(&1).map(String::as_str), Some("wifi"));

        let entry = partition.get("wifi", "wifi_cnt").unwrap();
        assert_eq!(entry.value, NvsValue::U32(5));
        assert!(entry.header_crc_valid);
    }

    #[test]
    fn stops_at_uninitialized_page() {
        let mut image = sample_image();
        image.extend(vec![0xFFu8; PAGE_SIZE]);

        let partition = NvsPartition::parse(&image).unwrap();
        assert_eq!(partition.page_count(), 1);
    }

    #[test]
    fn stops_at_corrupt_page() {
        let mut image = sample_image();
        image.extend(blank_page(PAGE_STATE_CORRUPT, 2));

        let partition = NvsPartition::parse(&image).unwrap();
        assert_eq!(partition.page_count(), 1);
    }

    /// Scenario S6: editing `wifi_cnt` from 5 to 7 only touches bytes
    /// [24..28) of its entry plus the recomputed header CRC; every other
    /// byte of the page is untouched.
    #[test]
    fn set_u32_touches_only_its_own_entry() {
        let image = sample_image();
        let mut partition = NvsPartition::parse(&image).unwrap();

        partition.set_u32("wifi", "wifi_cnt", 7).unwrap();
        let edited = partition.to_bytes();

        let entry_start = HEADER_SIZE + ENTRY_SIZE; // second entry slot
        for i in 0..image.len() {
            if (entry_start..entry_start + ENTRY_SIZE).contains(&i) {
                continue;
            }
            assert_eq!(image[i], edited[i], "unexpected change at byte {i}");
        }

        let value = &edited[entry_start + 24..entry_start + 28];
        assert_eq!(value, &7u32.to_le_bytes());

        let entry = partition.get("wifi", "wifi_cnt").unwrap();
        assert!(entry.header_crc_valid);
        assert_eq!(entry.value, NvsValue::U32(7));
    }

    #[test]
    fn set_u32_rejects_type_mismatch() {
        let image = sample_image();
        let mut partition = NvsPartition::parse(&image).unwrap();

        let err = partition.set_string("wifi", "wifi_cnt", "nope").unwrap_err();
        assert!(matches!(err, NvsError::TypeMismatch(_, _)));
    }

    #[test]
    fn delete_erases_entry_bytes() {
        let image = sample_image();
        let mut partition = NvsPartition::parse(&image).unwrap();

        partition.delete("wifi", "wifi_cnt").unwrap();
        assert!(partition.get("wifi", "wifi_cnt").is_none());

        let entry_start = HEADER_SIZE + ENTRY_SIZE;
        let bytes = partition.to_bytes();
        assert!(bytes[entry_start..entry_start + ENTRY_SIZE]
            .iter()
            .all(|&b| b == 0xFF));
    }

    #[test]
    fn string_round_trips_within_span() {
        let mut page = blank_page(PAGE_STATE_ACTIVE, 1);
        // span = 2: header entry + 1 data entry (32 bytes capacity)
        let start = HEADER_SIZE;
        let entry = &mut page[start..start + ENTRY_SIZE];
        entry[0] = 1;
        entry[1] = DataType::String as u8;
        entry[2] = 2;
        let mut key_bytes = [0u8; 16];
        key_bytes[..5].copy_from_slice(b"label");
        entry[8..24].copy_from_slice(&key_bytes);
        let payload = b"hi\0";
        entry[24..26].copy_from_slice(&(payload.len() as u16).to_le_bytes());
        let crc = crc32_of(&[payload.as_slice()]);
        entry[28..32].copy_from_slice(&crc.to_le_bytes());
        let hcrc = header_crc(entry);
        entry[4..8].copy_from_slice(&hcrc.to_le_bytes());

        let data_start = start + ENTRY_SIZE;
        page[data_start..data_start + payload.len()].copy_from_slice(payload);

        for (index, state) in [(0, EntryState::Written), (1, EntryState::Written)] {
            let bitmap_index = HEADER_SIZE / 2 + (index * 2) / 8;
            let shift = (index * 2) % 8;
            let mask = !(0b11u8 << shift);
            page[bitmap_index] = (page[bitmap_index] & mask) | (state.to_bits() << shift);
        }

        let mut ns_page = blank_page(PAGE_STATE_ACTIVE, 0);
        let mut ns_payload = [0u8; 8];
        ns_payload[0] = 1;
        write_entry(&mut ns_page, 0, 0, DataType::U8, "cfg", &ns_payload);

        let mut image = ns_page;
        image.extend(page);

        let mut partition = NvsPartition::parse(&image).unwrap();
        let entry = partition.get("cfg", "label").unwrap();
        assert_eq!(entry.value, NvsValue::String("hi".to_string()));

        partition.set_string("cfg", "label", "yo").unwrap();
        let entry = partition.get("cfg", "label").unwrap();
        assert_eq!(entry.value, NvsValue::String("yo".to_string()));
    }
}
