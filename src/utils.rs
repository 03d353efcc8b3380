//! Byte order primitives shared by the header, index, record and range decoders
//!
//! All 32-bit fields of a `.2bit` file are stored in the byte order of the machine that
//! wrote it. Fields are read in native order and swapped when the header signature
//! indicated a foreign byte order.

use std::io::{self, Read};

use byteorder::{NativeEndian, ReadBytesExt};

use crate::error::{Error, FormatError};

/// Number of bytes in a packed word
pub const BYTES_PER_WORD: usize = 4;

/// Number of bases in a packed word (4 bases per byte)
pub const BASES_PER_WORD: usize = 16;

/// Reads a single 32-bit value, swapping it if required
pub fn read_u32<R: Read>(reader: &mut R, byte_swapped: bool) -> io::Result<u32> {
    let value = reader.read_u32::<NativeEndian>()?;
    Ok(if byte_swapped {
        value.swap_bytes()
    } else {
        value
    })
}

/// Fills `words` with consecutive 32-bit values, swapping them if required
pub fn read_u32_words<R: Read>(
    reader: &mut R,
    words: &mut [u32],
    byte_swapped: bool,
) -> io::Result<()> {
    reader.read_u32_into::<NativeEndian>(words)?;
    if byte_swapped {
        for word in words.iter_mut() {
            *word = word.swap_bytes();
        }
    }
    Ok(())
}

/// Reverses the byte order of every complete 4-byte word in a packed buffer
///
/// The buffer must start on a word boundary. Trailing bytes that do not form a
/// complete word are left untouched.
pub fn swap_packed_words(buffer: &mut [u8]) {
    for word in buffer.chunks_exact_mut(BYTES_PER_WORD) {
        word.reverse();
    }
}

/// Converts a short read into a [`FormatError::Truncated`] naming the structure being read
///
/// Any other I/O failure is passed through unchanged.
pub fn truncated(what: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            FormatError::Truncated(what).into()
        } else {
            e.into()
        }
    }
}
