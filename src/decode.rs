//! Range decoding
//!
//! Decodes a half-open base range of one sequence by reading only the packed words
//! that cover it. Packed data is addressed in 4-byte words of 16 bases; the last word
//! of a sequence may be partial, in which case only its whole bytes are present.

use std::io::{Read, Seek, SeekFrom};
use std::ops::Range;

use crate::error::{DecodeError, RangeError, Result};
use crate::record::{Block, SequenceDescriptor};
use crate::table::unpack_into;
use crate::utils::{swap_packed_words, truncated, BASES_PER_WORD, BYTES_PER_WORD};
use crate::RangePolicy;

/// Resolves `start` and `end` against a sequence of length `len`
///
/// Negative values count from the end. A missing `end` means `len`. Under
/// [`RangePolicy::Lenient`] indices are clamped into `[0, len]` and a reversed range
/// resolves to an empty range; under [`RangePolicy::Strict`] both cases are errors.
#[allow(clippy::cast_sign_loss)]
pub fn normalize_range(
    start: i64,
    end: Option<i64>,
    len: u32,
    policy: RangePolicy,
) -> Result<Range<u32>> {
    let length = i64::from(len);
    let resolve = |index: i64| if index < 0 { length + index } else { index };
    let (start, end) = (resolve(start), end.map_or(length, resolve));

    match policy {
        RangePolicy::Lenient => {
            let end = end.clamp(0, length) as u32;
            let start = start.clamp(0, length) as u32;
            if start > end {
                Ok(end..end)
            } else {
                Ok(start..end)
            }
        }
        RangePolicy::Strict => {
            if start < 0 || end > length || start > end {
                return Err(RangeError::OutOfBounds { start, end, len }.into());
            }
            Ok(start as u32..end as u32)
        }
    }
}

/// Decodes `range` of a sequence
///
/// N-blocks are applied first and mask-blocks second; masked positions inside an
/// N-block stay uppercase `N`. Set `soft_mask` to false to skip the lowercase overlay.
///
/// The range is expected to be normalized (see [`normalize_range`]); a reversed range
/// or one that ends past the sequence is a [`RangeError`].
pub fn decode_range<R: Read + Seek>(
    reader: &mut R,
    descriptor: &SequenceDescriptor,
    range: Range<u32>,
    byte_swapped: bool,
    soft_mask: bool,
) -> Result<String> {
    if range.start > range.end || range.end > descriptor.dna_size {
        return Err(RangeError::OutOfBounds {
            start: range.start.into(),
            end: range.end.into(),
            len: descriptor.dna_size,
        }
        .into());
    }
    let expected = range.len();
    if expected == 0 {
        return Ok(String::new());
    }

    let mut seq = unpack_range(reader, descriptor, range.clone(), byte_swapped)?;
    apply_n_blocks(descriptor, range.clone(), &mut seq)?;
    if soft_mask {
        apply_mask_blocks(descriptor, range, &mut seq)?;
    }

    if seq.len() != expected {
        return Err(DecodeError::LengthMismatch {
            expected,
            got: seq.len(),
        }
        .into());
    }
    String::from_utf8(seq).map_err(|_| DecodeError::InvalidBase.into())
}

/// Reads the packed words covering `range` and returns exactly its bases (uppercase)
fn unpack_range<R: Read + Seek>(
    reader: &mut R,
    descriptor: &SequenceDescriptor,
    range: Range<u32>,
    byte_swapped: bool,
) -> Result<Vec<u8>> {
    let (start, end) = (range.start as usize, range.end as usize);
    let first_word = start / BASES_PER_WORD;
    let last_word = end.div_ceil(BASES_PER_WORD);

    // the final word may only be partially present
    let byte_start = (first_word * BYTES_PER_WORD) as u64;
    let byte_end = ((last_word * BYTES_PER_WORD) as u64).min(descriptor.packed_len());

    let mut packed = vec![0u8; (byte_end - byte_start) as usize];
    reader.seek(SeekFrom::Start(descriptor.packed_offset + byte_start))?;
    reader
        .read_exact(&mut packed)
        .map_err(truncated("packed sequence"))?;

    // word order must be restored before splitting bytes into bases
    if byte_swapped {
        swap_packed_words(&mut packed);
    }

    let mut bases = Vec::with_capacity(packed.len() * 4);
    unpack_into(&packed, &mut bases);

    let lead = start - first_word * BASES_PER_WORD;
    let needed = lead + (end - start);
    if bases.len() < needed {
        return Err(DecodeError::ShortPayload {
            needed,
            available: bases.len(),
        }
        .into());
    }
    bases.truncate(needed);
    bases.drain(..lead);
    Ok(bases)
}

/// Overwrites every position of `seq` covered by an N-block with `N`
///
/// `seq` must hold exactly the bases of `range`.
pub fn apply_n_blocks(
    descriptor: &SequenceDescriptor,
    range: Range<u32>,
    seq: &mut [u8],
) -> Result<()> {
    check_overlay_len(&range, seq)?;
    for (lo, hi) in local_spans(descriptor.n_blocks.overlapping(range.clone()), range) {
        seq[lo..hi].fill(b'N');
    }
    Ok(())
}

/// Lowercases every position of `seq` covered by a mask-block, except `N`
///
/// `seq` must hold exactly the bases of `range`.
pub fn apply_mask_blocks(
    descriptor: &SequenceDescriptor,
    range: Range<u32>,
    seq: &mut [u8],
) -> Result<()> {
    check_overlay_len(&range, seq)?;
    for (lo, hi) in local_spans(descriptor.mask_blocks.overlapping(range.clone()), range) {
        for base in seq[lo..hi].iter_mut().filter(|b| **b != b'N') {
            base.make_ascii_lowercase();
        }
    }
    Ok(())
}

fn check_overlay_len(range: &Range<u32>, seq: &[u8]) -> Result<()> {
    if range.start > range.end {
        return Err(RangeError::OutOfBounds {
            start: range.start.into(),
            end: range.end.into(),
            len: seq.len() as u32,
        }
        .into());
    }
    let expected = range.clone().len();
    if seq.len() != expected {
        return Err(DecodeError::LengthMismatch {
            expected,
            got: seq.len(),
        }
        .into());
    }
    Ok(())
}

/// Clips blocks to `range` and converts them to offsets relative to `range.start`
fn local_spans<'a>(
    blocks: impl Iterator<Item = &'a Block> + 'a,
    range: Range<u32>,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    let (start, end) = (u64::from(range.start), u64::from(range.end));
    blocks.map(move |block| {
        let lo = u64::from(block.start).max(start) - start;
        let hi = block.end().min(end) - start;
        (lo as usize, hi as usize)
    })
}
