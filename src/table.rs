//! Lookup tables translating packed bytes into bases
//!
//! Each byte stores four bases, two bits each, with the first base in the most
//! significant bits: `00` = T, `01` = C, `10` = A, `11` = G.

use std::sync::LazyLock;

/// Bases indexed by their 2-bit code
pub const BASES: [u8; 4] = [b'T', b'C', b'A', b'G'];

/// Maps every byte to the four bases it encodes
pub static BYTE_TABLE: [[u8; 4]; 256] = build_byte_table();

/// Maps every big-endian byte pair to the eight bases it encodes
///
/// Built on first use. Only used as a fast path by [`unpack_into`].
static PAIR_TABLE: LazyLock<Vec<[u8; 8]>> = LazyLock::new(|| {
    (0..=u16::MAX)
        .map(|pair| {
            let [hi, lo] = pair.to_be_bytes();
            let mut bases = [0u8; 8];
            bases[..4].copy_from_slice(&BYTE_TABLE[hi as usize]);
            bases[4..].copy_from_slice(&BYTE_TABLE[lo as usize]);
            bases
        })
        .collect()
});

const fn build_byte_table() -> [[u8; 4]; 256] {
    let mut table = [[0u8; 4]; 256];
    let mut byte = 0;
    while byte < 256 {
        table[byte] = [
            BASES[(byte >> 6) & 0b11],
            BASES[(byte >> 4) & 0b11],
            BASES[(byte >> 2) & 0b11],
            BASES[byte & 0b11],
        ];
        byte += 1;
    }
    table
}

/// Decodes a single packed byte into its four bases
#[inline]
#[must_use]
pub fn byte_to_bases(byte: u8) -> [u8; 4] {
    BYTE_TABLE[byte as usize]
}

/// Appends the bases encoded by `packed` to `out` (four bases per byte)
pub fn unpack_into(packed: &[u8], out: &mut Vec<u8>) {
    out.reserve(packed.len() * 4);
    let mut pairs = packed.chunks_exact(2);
    for pair in pairs.by_ref() {
        let index = u16::from_be_bytes([pair[0], pair[1]]);
        out.extend_from_slice(&PAIR_TABLE[index as usize]);
    }
    for &byte in pairs.remainder() {
        out.extend_from_slice(&byte_to_bases(byte));
    }
}
