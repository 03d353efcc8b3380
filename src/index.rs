//! Sequence index following the file header
//!
//! Each entry is a 1-byte name length, the ASCII name, and the 32-bit file offset of
//! the sequence record.

use std::collections::HashMap;
use std::io::Read;

use crate::error::{FormatError, Result};
use crate::utils::{read_u32, truncated};

/// A single index entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Sequence name
    pub name: String,
    /// Absolute file offset of the sequence record
    pub offset: u32,
}

/// Ordered mapping from sequence name to record offset
///
/// Entries keep their order in the file; lookups by name go through a hash map.
#[derive(Debug, Clone, Default)]
pub struct SequenceIndex {
    entries: Vec<IndexEntry>,
    lookup: HashMap<String, usize>,
}
impl SequenceIndex {
    /// Reads `count` index entries from a reader positioned right after the header
    ///
    /// When `file_size` is given, every offset is checked to lie inside the file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The reader ends before all entries were read
    /// * A name is not ASCII
    /// * A name appears more than once
    /// * An offset points past the end of the file
    pub fn from_reader<R: Read>(
        reader: &mut R,
        count: usize,
        byte_swapped: bool,
        file_size: Option<u64>,
    ) -> Result<Self> {
        let mut index = Self {
            entries: Vec::with_capacity(count.min(1 << 16)),
            lookup: HashMap::with_capacity(count.min(1 << 16)),
        };
        let mut name_buf = [0u8; u8::MAX as usize];
        for position in 0..count {
            let mut name_len = [0u8; 1];
            reader
                .read_exact(&mut name_len)
                .map_err(truncated("index name length"))?;
            let name_bytes = &mut name_buf[..name_len[0] as usize];
            reader
                .read_exact(name_bytes)
                .map_err(truncated("index name"))?;
            if !name_bytes.is_ascii() {
                return Err(FormatError::InvalidName(position).into());
            }
            let name = String::from_utf8_lossy(name_bytes).into_owned();
            let offset = read_u32(reader, byte_swapped).map_err(truncated("index offset"))?;

            if let Some(file_size) = file_size {
                if u64::from(offset) >= file_size {
                    return Err(FormatError::OffsetOutOfBounds {
                        name,
                        offset: offset.into(),
                        file_size,
                    }
                    .into());
                }
            }
            index.insert(IndexEntry { name, offset })?;
        }
        Ok(index)
    }

    fn insert(&mut self, entry: IndexEntry) -> Result<()> {
        if self.lookup.contains_key(&entry.name) {
            return Err(FormatError::DuplicateName(entry.name).into());
        }
        self.lookup.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Returns the record offset of a sequence
    #[must_use]
    pub fn offset(&self, name: &str) -> Option<u32> {
        self.lookup.get(name).map(|&i| self.entries[i].offset)
    }

    /// Checks whether a sequence is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Entries in file order
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Iterates over the sequence names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
