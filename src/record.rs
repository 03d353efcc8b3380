//! Sequence records
//!
//! A record holds the sequence length, the N-block and mask-block interval lists, a
//! reserved word, and then the packed bases. Only the metadata is parsed here; the
//! packed bases are decoded on demand by [`decode_range`](crate::decode::decode_range).

use std::io::{Read, Seek, SeekFrom};
use std::ops::Range;

use crate::error::{FormatError, Result};
use crate::utils::{read_u32, read_u32_words, truncated};

/// A half-open run of positions `[start, start + size)` within a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: u32,
    pub size: u32,
}
impl Block {
    #[must_use]
    pub fn new(start: u32, size: u32) -> Self {
        Self { start, size }
    }

    /// Exclusive end position
    #[must_use]
    pub fn end(&self) -> u64 {
        u64::from(self.start) + u64::from(self.size)
    }
}

/// Sorted, non-overlapping list of blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocks(Vec<Block>);
impl Blocks {
    /// Builds a block list, checking that it is sorted, non-overlapping and within `dna_size`
    ///
    /// `kind` names the list in error messages.
    pub fn new(blocks: Vec<Block>, dna_size: u32, kind: &'static str) -> Result<Self> {
        let mut previous_end = 0;
        for block in &blocks {
            if block.end() > u64::from(dna_size) {
                return Err(FormatError::BlockOutOfBounds {
                    kind,
                    start: block.start,
                    size: block.size,
                    dna_size,
                }
                .into());
            }
            if u64::from(block.start) < previous_end {
                return Err(FormatError::UnsortedBlocks {
                    kind,
                    start: block.start,
                }
                .into());
            }
            previous_end = block.end();
        }
        Ok(Self(blocks))
    }

    /// Iterates over the blocks that intersect `range`
    ///
    /// Uses a binary search to find the first candidate so that lookups on
    /// chromosome-scale block lists stay cheap.
    pub fn overlapping(&self, range: Range<u32>) -> impl Iterator<Item = &Block> {
        let first = self
            .0
            .partition_point(|block| block.end() <= u64::from(range.start));
        self.0[first..]
            .iter()
            .take_while(move |block| block.start < range.end)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Block] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of positions covered by the blocks
    #[must_use]
    pub fn covered(&self) -> u64 {
        self.0.iter().map(|b| u64::from(b.size)).sum()
    }
}

/// Metadata of one sequence record
///
/// Created once per sequence on first access and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceDescriptor {
    /// Total number of bases
    pub dna_size: u32,

    /// Runs of unknown bases, decoded as `N`
    pub n_blocks: Blocks,

    /// Runs of soft-masked bases, decoded in lowercase
    pub mask_blocks: Blocks,

    /// Absolute file offset of the first packed byte
    pub packed_offset: u64,
}
impl SequenceDescriptor {
    /// Parses the record that starts at `offset`
    ///
    /// `file_size` bounds the block counts and the packed payload so that a corrupt
    /// count is reported before any allocation is attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The record is truncated
    /// * A block array or the packed payload would extend past `file_size`
    /// * A block list is unsorted, overlapping, or exceeds the sequence length
    pub fn from_reader<R: Read + Seek>(
        reader: &mut R,
        offset: u64,
        byte_swapped: bool,
        file_size: u64,
    ) -> Result<Self> {
        reader.seek(SeekFrom::Start(offset))?;
        let dna_size = read_u32(reader, byte_swapped).map_err(truncated("sequence size"))?;

        let mut position = offset + 4;
        let n_blocks = read_blocks(
            reader,
            &mut position,
            file_size,
            dna_size,
            byte_swapped,
            "N",
        )?;
        let mask_blocks = read_blocks(
            reader,
            &mut position,
            file_size,
            dna_size,
            byte_swapped,
            "mask",
        )?;

        // reserved word, ignored
        read_u32(reader, byte_swapped).map_err(truncated("record reserved field"))?;
        let packed_offset = position + 4;

        let needed = packed_len(dna_size);
        let available = file_size.saturating_sub(packed_offset);
        if needed > available {
            return Err(FormatError::PayloadOutOfBounds {
                offset: packed_offset,
                needed,
                available,
            }
            .into());
        }

        Ok(Self {
            dna_size,
            n_blocks,
            mask_blocks,
            packed_offset,
        })
    }

    /// Reads only the sequence length of the record at `offset`
    pub fn read_dna_size<R: Read + Seek>(
        reader: &mut R,
        offset: u64,
        byte_swapped: bool,
    ) -> Result<u32> {
        reader.seek(SeekFrom::Start(offset))?;
        read_u32(reader, byte_swapped).map_err(truncated("sequence size"))
    }

    /// Number of bases in the sequence
    #[must_use]
    pub fn len(&self) -> usize {
        self.dna_size as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dna_size == 0
    }

    /// Number of bytes in the packed payload
    #[must_use]
    pub fn packed_len(&self) -> u64 {
        packed_len(self.dna_size)
    }
}

/// Number of packed bytes needed for `dna_size` bases
fn packed_len(dna_size: u32) -> u64 {
    u64::from(dna_size).div_ceil(4)
}

/// Reads a block count followed by its starts array and sizes array
fn read_blocks<R: Read>(
    reader: &mut R,
    position: &mut u64,
    file_size: u64,
    dna_size: u32,
    byte_swapped: bool,
    kind: &'static str,
) -> Result<Blocks> {
    let count = read_u32(reader, byte_swapped).map_err(truncated("block count"))?;
    *position += 4;

    let arrays_len = 8 * u64::from(count);
    if *position + arrays_len > file_size {
        return Err(FormatError::BlockCountOverflow {
            offset: *position - 4,
            kind,
            count,
        }
        .into());
    }

    let mut starts = vec![0u32; count as usize];
    let mut sizes = vec![0u32; count as usize];
    read_u32_words(reader, &mut starts, byte_swapped).map_err(truncated("block starts"))?;
    read_u32_words(reader, &mut sizes, byte_swapped).map_err(truncated("block sizes"))?;
    *position += arrays_len;

    let blocks = starts
        .into_iter()
        .zip(sizes)
        .map(|(start, size)| Block::new(start, size))
        .collect();
    Blocks::new(blocks, dna_size, kind)
}
