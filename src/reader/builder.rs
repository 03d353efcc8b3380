use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use memmap2::Mmap;

use super::TwoBitFile;
use crate::{RangePolicy, Result};

/// Builder for [`TwoBitFile`] containers
///
/// # Examples
///
/// ```no_run
/// use twobit::{RangePolicy, TwoBitReaderBuilder};
///
/// let mut genome = TwoBitReaderBuilder::default()
///     .range_policy(RangePolicy::Strict)
///     .open_mmap("hg38.2bit")?;
/// let len = genome.sequence_length("chrM")?;
/// # Ok::<(), twobit::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoBitReaderBuilder {
    policy: Option<RangePolicy>,
}
impl TwoBitReaderBuilder {
    /// Sets how out-of-range slice requests are resolved
    #[must_use]
    pub fn range_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Opens a file through a buffered file handle
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<TwoBitFile<BufReader<File>>> {
        TwoBitFile::open_with_policy(path, self.policy.unwrap_or_default())
    }

    /// Opens a file by memory-mapping it
    pub fn open_mmap<P: AsRef<Path>>(self, path: P) -> Result<TwoBitFile<Cursor<Mmap>>> {
        TwoBitFile::open_mmap_with_policy(path, self.policy.unwrap_or_default())
    }

    /// Wraps any seekable byte source
    pub fn build<R: Read + Seek>(self, reader: R) -> Result<TwoBitFile<R>> {
        TwoBitFile::with_policy(reader, self.policy.unwrap_or_default())
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::fixtures::simple_file;

    #[test]
    fn test_default_policy() -> Result<()> {
        let tb = TwoBitReaderBuilder::default().build(Cursor::new(simple_file(&[])))?;
        assert_eq!(tb.policy(), RangePolicy::Lenient);
        Ok(())
    }

    #[test]
    fn test_strict_policy() -> Result<()> {
        let mut tb = TwoBitReaderBuilder::default()
            .range_policy(RangePolicy::Strict)
            .build(Cursor::new(simple_file(&[])))?;
        assert_eq!(tb.policy(), RangePolicy::Strict);
        assert!(tb.slice_of("chr1", 0, Some(9)).is_err());
        Ok(())
    }
}
