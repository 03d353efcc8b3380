//! Random-access reader for UCSC `.2bit` genome files
//!
//! A `.2bit` file stores many DNA sequences packed two bits per base, together with
//! run-length lists of `N` positions and soft-masked (lowercase) regions. This crate
//! opens such a file, parses its header and sequence index, and decodes arbitrary
//! half-open ranges of any sequence without reading the rest of the file.
//!
//! ```no_run
//! use twobit::TwoBitFile;
//!
//! let mut genome = TwoBitFile::open_mmap("hg38.2bit")?;
//! for name in genome.sequence_names() {
//!     println!("{name}\t{}", genome.sequence_length(&name)?);
//! }
//! let motif = genome.slice_of("chr1", 10_000, Some(10_050))?;
//! # Ok::<(), twobit::Error>(())
//! ```

mod decode;
mod error;
mod extract;
mod header;
mod index;
mod policy;
mod reader;
mod record;
mod table;
mod utils;

#[cfg(test)]
mod fixtures;

pub use decode::{apply_mask_blocks, apply_n_blocks, decode_range, normalize_range};
pub use error::{DecodeError, Error, FormatError, LookupError, RangeError, Result};
pub use extract::{write_fasta_record, ExtractSummary, RegionExtractor, DEFAULT_WIDTH};
pub use header::{TwoBitHeader, MAGIC, SIZE_HEADER};
pub use index::{IndexEntry, SequenceIndex};
pub use policy::RangePolicy;
pub use reader::{SequenceHandle, SharedTwoBitFile, TwoBitFile, TwoBitReaderBuilder};
pub use record::{Block, Blocks, SequenceDescriptor};
pub use table::{byte_to_bases, unpack_into, BYTE_TABLE};
pub use utils::{BASES_PER_WORD, BYTES_PER_WORD};
