/// Custom Result type for twobit operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the twobit library, encompassing all possible error cases
/// that can occur while opening and decoding a `.2bit` file.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Structural violations of the on-disk format (header, index, sequence records)
    FormatError(#[from] FormatError),
    /// Internal invariant violations while decoding a range
    DecodeError(#[from] DecodeError),
    /// Requests for a sequence name that is not present in the index
    LookupError(#[from] LookupError),
    /// Out-of-range slice requests (only raised under [`RangePolicy::Strict`](crate::RangePolicy::Strict))
    RangeError(#[from] RangeError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
}
impl Error {
    /// Returns true if this error is a format violation
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::FormatError(_))
    }

    /// Returns true if this error is a failed sequence lookup
    #[must_use]
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::LookupError(_))
    }
}

/// Errors raised while validating the file header, the index, or a sequence record
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    /// The signature matches neither the magic number nor its byte-swap
    ///
    /// # Arguments
    /// * `u32` - The signature that was found
    #[error("Invalid 2bit signature: 0x{0:08X} (expected 0x1A412743)")]
    InvalidSignature(u32),

    /// The header version is not 0
    #[error("Unsupported 2bit version: {0} (expected 0)")]
    InvalidVersion(u32),

    /// The header reserved field is not 0
    #[error("Invalid reserved header field: {0} (expected 0)")]
    InvalidReserved(u32),

    /// The source ended before a structure was fully read
    ///
    /// # Arguments
    /// * `&str` - The structure that was being read
    #[error("Unexpected end of file while reading {0}")]
    Truncated(&'static str),

    /// The same sequence name appears twice in the index
    #[error("Duplicate sequence name in index: {0}")]
    DuplicateName(String),

    /// A sequence name is not valid ASCII
    #[error("Sequence name at index entry {0} is not ASCII")]
    InvalidName(usize),

    /// An index entry points outside of the file
    #[error("Sequence {name} has offset {offset} beyond the end of the file ({file_size} bytes)")]
    OffsetOutOfBounds {
        name: String,
        offset: u64,
        file_size: u64,
    },

    /// The block arrays of a record would extend past the end of the file
    #[error("Record at offset {offset} declares {count} {kind} blocks which exceed the file size")]
    BlockCountOverflow {
        offset: u64,
        kind: &'static str,
        count: u32,
    },

    /// A block lies (partially) outside of the sequence
    #[error("{kind} block {start}+{size} exceeds sequence length {dna_size}")]
    BlockOutOfBounds {
        kind: &'static str,
        start: u32,
        size: u32,
        dna_size: u32,
    },

    /// A block list is not sorted or contains overlapping blocks
    #[error("{kind} blocks are not sorted and non-overlapping (block starting at {start})")]
    UnsortedBlocks { kind: &'static str, start: u32 },

    /// The packed payload would extend past the end of the file
    #[error("Packed payload at offset {offset} needs {needed} bytes but only {available} remain")]
    PayloadOutOfBounds {
        offset: u64,
        needed: u64,
        available: u64,
    },
}

/// Errors that signal a bug in range decoding rather than a malformed file
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    /// The decoded buffer does not have the requested length
    #[error("Decoded {got} bases but {expected} were requested")]
    LengthMismatch { expected: usize, got: usize },

    /// Fewer bytes were unpacked than the requested range requires
    #[error("Unpacked {available} bases but the range needs {needed}")]
    ShortPayload { needed: usize, available: usize },

    /// A decoded byte is not a valid ASCII base
    #[error("Decoded sequence contains a non-ASCII base")]
    InvalidBase,
}

/// Errors for lookups of sequences by name
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    /// The requested sequence is not in the index
    #[error("Sequence not found: {0}")]
    UnknownSequence(String),
}

/// Errors for slice requests that fall outside of a sequence
#[derive(thiserror::Error, Debug)]
pub enum RangeError {
    /// The normalized range is not contained in `[0, len]` or is reversed
    #[error("Range {start}..{end} is out of bounds for sequence of length {len}")]
    OutOfBounds { start: i64, end: i64, len: u32 },
}
