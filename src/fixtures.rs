//! In-memory `.2bit` images for tests

use crate::header::{MAGIC, SIZE_HEADER};
use crate::utils::swap_packed_words;

/// Description of one synthetic sequence record
#[derive(Debug, Clone, Default)]
pub struct RecordSpec {
    pub bases: Vec<u8>,
    pub n_blocks: Vec<(u32, u32)>,
    pub mask_blocks: Vec<(u32, u32)>,
    pub reserved: u32,
}
impl RecordSpec {
    pub fn new(bases: &str) -> Self {
        Self {
            bases: bases.as_bytes().to_vec(),
            ..Self::default()
        }
    }

    pub fn n_blocks(mut self, blocks: &[(u32, u32)]) -> Self {
        self.n_blocks = blocks.to_vec();
        self
    }

    pub fn mask_blocks(mut self, blocks: &[(u32, u32)]) -> Self {
        self.mask_blocks = blocks.to_vec();
        self
    }

    pub fn reserved(mut self, reserved: u32) -> Self {
        self.reserved = reserved;
        self
    }
}

fn code(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'C' => 1,
        b'A' => 2,
        b'G' => 3,
        _ => 0,
    }
}

/// Packs bases four per byte, first base in the high bits
pub fn pack(bases: &[u8]) -> Vec<u8> {
    bases
        .chunks(4)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &b)| byte | (code(b) << (6 - 2 * i)))
        })
        .collect()
}

fn push_u32(bytes: &mut Vec<u8>, value: u32, swap: bool) {
    let value = if swap { value.swap_bytes() } else { value };
    bytes.extend_from_slice(&value.to_ne_bytes());
}

fn push_blocks(bytes: &mut Vec<u8>, blocks: &[(u32, u32)], swap: bool) {
    push_u32(bytes, blocks.len() as u32, swap);
    for &(start, _) in blocks {
        push_u32(bytes, start, swap);
    }
    for &(_, size) in blocks {
        push_u32(bytes, size, swap);
    }
}

/// Serializes a single record (metadata followed by the packed payload)
pub fn record_bytes(spec: &RecordSpec, swap: bool) -> Vec<u8> {
    let mut bytes = Vec::new();
    push_u32(&mut bytes, spec.bases.len() as u32, swap);
    push_blocks(&mut bytes, &spec.n_blocks, swap);
    push_blocks(&mut bytes, &spec.mask_blocks, swap);
    push_u32(&mut bytes, spec.reserved, swap);
    let mut packed = pack(&spec.bases);
    if swap {
        swap_packed_words(&mut packed);
    }
    bytes.extend(packed);
    bytes
}

/// Serializes a complete file: header, index, then the records in order
pub fn file_bytes(sequences: &[(&str, RecordSpec)], swap: bool) -> Vec<u8> {
    let mut bytes = Vec::new();
    push_u32(&mut bytes, MAGIC, swap);
    push_u32(&mut bytes, 0, swap);
    push_u32(&mut bytes, sequences.len() as u32, swap);
    push_u32(&mut bytes, 0, swap);

    let index_len: usize = sequences.iter().map(|(name, _)| 1 + name.len() + 4).sum();
    let records: Vec<Vec<u8>> = sequences
        .iter()
        .map(|(_, spec)| record_bytes(spec, swap))
        .collect();

    let mut offset = SIZE_HEADER + index_len;
    for ((name, _), record) in sequences.iter().zip(&records) {
        bytes.push(name.len() as u8);
        bytes.extend_from_slice(name.as_bytes());
        push_u32(&mut bytes, offset as u32, swap);
        offset += record.len();
    }
    for record in records {
        bytes.extend(record);
    }
    bytes
}

/// The single-sequence file used throughout the tests: `chr1` = `TCAGTCAG`
pub fn simple_file(n_blocks: &[(u32, u32)]) -> Vec<u8> {
    file_bytes(
        &[("chr1", RecordSpec::new("TCAGTCAG").n_blocks(n_blocks))],
        false,
    )
}
