//! The `.2bit` container
//!
//! [`TwoBitFile`] owns the byte source, the parsed header and index, and a cache of
//! sequence descriptors that are parsed lazily on first access.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, trace};

use super::SequenceHandle;
use crate::decode::{decode_range, normalize_range};
use crate::error::{LookupError, Result};
use crate::header::TwoBitHeader;
use crate::index::SequenceIndex;
use crate::record::SequenceDescriptor;
use crate::RangePolicy;

/// A random-access reader over a `.2bit` file
///
/// The header and index are parsed when the container is created. Sequence records
/// are parsed on first access and cached for the lifetime of the container.
///
/// Every decode seeks explicitly before reading, so no call depends on the cursor
/// position left by a previous one. Decoding requires `&mut self`; to share a
/// container between threads use [`SharedTwoBitFile`](super::SharedTwoBitFile).
///
/// # Examples
///
/// ```no_run
/// use twobit::TwoBitFile;
///
/// let mut genome = TwoBitFile::open("hg38.2bit")?;
/// println!("{} sequences", genome.num_sequences());
/// let slice = genome.slice_of("chr20", 100_100, Some(100_120))?;
/// assert_eq!(slice.len(), 20);
/// # Ok::<(), twobit::Error>(())
/// ```
#[derive(Debug)]
pub struct TwoBitFile<R> {
    /// Byte source positioned anywhere; every read seeks first
    reader: R,

    /// Parsed file header
    header: TwoBitHeader,

    /// Name to record offset mapping
    index: SequenceIndex,

    /// Descriptors parsed so far, by sequence name
    descriptors: HashMap<String, SequenceDescriptor>,

    /// Total size of the source in bytes
    file_size: u64,

    /// How out-of-range slices are resolved
    policy: RangePolicy,
}

impl TwoBitFile<BufReader<File>> {
    /// Opens a `.2bit` file through a buffered file handle
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the path is missing or unreadable, and a format error
    /// if the header or index is invalid.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_policy(path, RangePolicy::default())
    }

    pub(crate) fn open_with_policy<P: AsRef<Path>>(path: P, policy: RangePolicy) -> Result<Self> {
        let file = open_regular_file(path.as_ref())?;
        Self::with_policy(BufReader::new(file), policy)
    }
}

impl TwoBitFile<Cursor<Mmap>> {
    /// Opens a `.2bit` file by memory-mapping it
    ///
    /// Reads are served from the mapping; the file must not be modified while open.
    pub fn open_mmap<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_mmap_with_policy(path, RangePolicy::default())
    }

    pub(crate) fn open_mmap_with_policy<P: AsRef<Path>>(
        path: P,
        policy: RangePolicy,
    ) -> Result<Self> {
        // Verify input file is a file before attempting to map
        let file = open_regular_file(path.as_ref())?;

        // Safety: the file is open and won't be modified while mapped
        let mmap = unsafe { Mmap::map(&file)? };
        Self::with_policy(Cursor::new(mmap), policy)
    }
}

/// Opens `path`, rejecting directories and special files
fn open_regular_file(path: &Path) -> io::Result<File> {
    let file = File::open(path)?;
    if !file.metadata()?.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", path.display()),
        ));
    }
    Ok(file)
}

impl<R: Read + Seek> TwoBitFile<R> {
    /// Parses the header and index from any seekable byte source
    pub fn new(reader: R) -> Result<Self> {
        Self::with_policy(reader, RangePolicy::default())
    }

    /// Parses the header and index, resolving slices with the given policy
    pub fn with_policy(mut reader: R, policy: RangePolicy) -> Result<Self> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        reader.rewind()?;

        let header = TwoBitHeader::from_reader(&mut reader)?;
        let index = SequenceIndex::from_reader(
            &mut reader,
            header.num_sequences(),
            header.byte_swapped,
            Some(file_size),
        )?;
        debug!(
            sequences = index.len(),
            byte_swapped = header.byte_swapped,
            file_size,
            "opened 2bit container"
        );

        Ok(Self {
            reader,
            header,
            index,
            descriptors: HashMap::new(),
            file_size,
            policy,
        })
    }

    /// Returns the descriptor of a sequence, parsing and caching it on first access
    fn descriptor(&mut self, name: &str) -> Result<&SequenceDescriptor> {
        if !self.descriptors.contains_key(name) {
            let offset = self
                .index
                .offset(name)
                .ok_or_else(|| LookupError::UnknownSequence(name.to_string()))?;
            let descriptor = SequenceDescriptor::from_reader(
                &mut self.reader,
                offset.into(),
                self.header.byte_swapped,
                self.file_size,
            )?;
            trace!(
                name,
                dna_size = descriptor.dna_size,
                n_blocks = descriptor.n_blocks.len(),
                mask_blocks = descriptor.mask_blocks.len(),
                "parsed sequence record"
            );
            self.descriptors.insert(name.to_string(), descriptor);
        }
        Ok(&self.descriptors[name])
    }

    /// Returns a handle to a named sequence
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] if the name is absent, or a format error if its
    /// record is malformed.
    pub fn sequence(&mut self, name: &str) -> Result<SequenceHandle<'_, R>> {
        self.descriptor(name)?;
        let Some((name, descriptor)) = self.descriptors.get_key_value(name) else {
            return Err(LookupError::UnknownSequence(name.to_string()).into());
        };
        Ok(SequenceHandle::new(
            name,
            &mut self.reader,
            descriptor,
            self.header.byte_swapped,
            self.policy,
        ))
    }

    /// Number of bases in a named sequence; no bases are decoded
    pub fn sequence_length(&mut self, name: &str) -> Result<u32> {
        Ok(self.descriptor(name)?.dna_size)
    }

    /// Decodes `[start, end)` of a named sequence
    ///
    /// Negative indices count from the end and `None` as `end` means the sequence
    /// length. Out-of-range requests are resolved by the container's [`RangePolicy`].
    pub fn slice_of(&mut self, name: &str, start: i64, end: Option<i64>) -> Result<String> {
        self.decode(name, start, end, true)
    }

    /// Like [`slice_of`](Self::slice_of) but without lowercasing soft-masked bases
    pub fn slice_of_unmasked(
        &mut self,
        name: &str,
        start: i64,
        end: Option<i64>,
    ) -> Result<String> {
        self.decode(name, start, end, false)
    }

    fn decode(
        &mut self,
        name: &str,
        start: i64,
        end: Option<i64>,
        soft_mask: bool,
    ) -> Result<String> {
        let policy = self.policy;
        let byte_swapped = self.header.byte_swapped;
        self.descriptor(name)?;
        let descriptor = &self.descriptors[name];
        let range = normalize_range(start, end, descriptor.dna_size, policy)?;
        decode_range(&mut self.reader, descriptor, range, byte_swapped, soft_mask)
    }

    /// Lengths of every sequence in index order
    ///
    /// Sequences whose descriptor is not cached only have their length word read.
    pub fn sequence_sizes(&mut self) -> Result<Vec<(String, u32)>> {
        let byte_swapped = self.header.byte_swapped;
        let mut sizes = Vec::with_capacity(self.index.len());
        for entry in self.index.entries() {
            let size = match self.descriptors.get(&entry.name) {
                Some(descriptor) => descriptor.dna_size,
                None => SequenceDescriptor::read_dna_size(
                    &mut self.reader,
                    entry.offset.into(),
                    byte_swapped,
                )?,
            };
            sizes.push((entry.name.clone(), size));
        }
        Ok(sizes)
    }

    /// Sum of all sequence lengths
    pub fn total_length(&mut self) -> Result<u64> {
        Ok(self
            .sequence_sizes()?
            .iter()
            .map(|(_, size)| u64::from(*size))
            .sum())
    }
}

impl<R> TwoBitFile<R> {
    /// Sequence names in index order
    #[must_use]
    pub fn sequence_names(&self) -> Vec<String> {
        self.index.names().map(str::to_string).collect()
    }

    /// Checks whether a sequence is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Number of sequences in the index
    #[must_use]
    pub fn num_sequences(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn header(&self) -> TwoBitHeader {
        self.header
    }

    #[must_use]
    pub fn index(&self) -> &SequenceIndex {
        &self.index
    }

    #[must_use]
    pub fn is_byte_swapped(&self) -> bool {
        self.header.byte_swapped
    }

    #[must_use]
    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Size of the underlying source in bytes
    #[must_use]
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of descriptors parsed so far
    #[must_use]
    pub fn num_cached(&self) -> usize {
        self.descriptors.len()
    }

    /// Consumes the container and returns the byte source
    pub fn into_inner(self) -> R {
        self.reader
    }
}
