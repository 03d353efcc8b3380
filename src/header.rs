//! Header module for the twobit library
//!
//! The header is the first 16 bytes of a `.2bit` file: four 32-bit fields written in
//! the byte order of the machine that created the file. The signature field is used
//! to detect that byte order.

use std::io::Read;

use byteorder::{ByteOrder, NativeEndian};

use crate::error::{FormatError, Result};
use crate::utils::truncated;

/// Signature of a `.2bit` file in the byte order of the writing machine
pub const MAGIC: u32 = 0x1A41_2743;

/// Size of the header in bytes
pub const SIZE_HEADER: usize = 16;

/// Parsed `.2bit` file header
///
/// All fields are stored already converted to native byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoBitHeader {
    /// Signature, always equal to [`MAGIC`] once parsed
    pub signature: u32,

    /// Format version, always 0
    pub version: u32,

    /// Number of sequences in the index
    pub sequence_count: u32,

    /// Reserved field, always 0
    pub reserved: u32,

    /// Whether every multi-byte field in the file must be byte-swapped
    pub byte_swapped: bool,
}
impl TwoBitHeader {
    /// Parses a header from a fixed-size byte array
    ///
    /// The signature is read in native order. If it does not match [`MAGIC`], all four
    /// fields are byte-swapped and the signature is checked again.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The signature matches neither byte order
    /// * The version is not 0
    /// * The reserved field is not 0
    pub fn from_bytes(buffer: &[u8; SIZE_HEADER]) -> Result<Self> {
        let mut fields = [0u32; 4];
        NativeEndian::read_u32_into(buffer, &mut fields);

        let byte_swapped = if fields[0] == MAGIC {
            false
        } else if fields[0].swap_bytes() == MAGIC {
            for field in &mut fields {
                *field = field.swap_bytes();
            }
            true
        } else {
            return Err(FormatError::InvalidSignature(fields[0]).into());
        };

        let [signature, version, sequence_count, reserved] = fields;
        if version != 0 {
            return Err(FormatError::InvalidVersion(version).into());
        }
        if reserved != 0 {
            return Err(FormatError::InvalidReserved(reserved).into());
        }
        Ok(Self {
            signature,
            version,
            sequence_count,
            reserved,
            byte_swapped,
        })
    }

    /// Parses a header from the start of an arbitrarily sized buffer
    pub fn from_buffer(buffer: &[u8]) -> Result<Self> {
        let Some(bytes) = buffer.first_chunk::<SIZE_HEADER>() else {
            return Err(FormatError::Truncated("header").into());
        };
        Self::from_bytes(bytes)
    }

    /// Reads exactly [`SIZE_HEADER`] bytes from a reader and parses them
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; SIZE_HEADER];
        reader
            .read_exact(&mut buffer)
            .map_err(truncated("header"))?;
        Self::from_bytes(&buffer)
    }

    /// Number of sequences declared by the header
    #[must_use]
    pub fn num_sequences(&self) -> usize {
        self.sequence_count as usize
    }
}
