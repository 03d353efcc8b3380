use std::io::{Read, Seek};

use crate::decode::{decode_range, normalize_range};
use crate::error::Result;
use crate::record::{Blocks, SequenceDescriptor};
use crate::RangePolicy;

/// A borrowed view of one sequence in a [`TwoBitFile`](super::TwoBitFile)
///
/// The handle holds the cached descriptor and the container's byte source; bases are
/// only decoded when a slice is requested.
pub struct SequenceHandle<'a, R> {
    name: &'a str,
    reader: &'a mut R,
    descriptor: &'a SequenceDescriptor,
    byte_swapped: bool,
    policy: RangePolicy,
}
impl<'a, R: Read + Seek> SequenceHandle<'a, R> {
    pub(crate) fn new(
        name: &'a str,
        reader: &'a mut R,
        descriptor: &'a SequenceDescriptor,
        byte_swapped: bool,
        policy: RangePolicy,
    ) -> Self {
        Self {
            name,
            reader,
            descriptor,
            byte_swapped,
            policy,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Number of bases in the sequence
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptor.is_empty()
    }

    #[must_use]
    pub fn descriptor(&self) -> &SequenceDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn n_blocks(&self) -> &Blocks {
        &self.descriptor.n_blocks
    }

    #[must_use]
    pub fn mask_blocks(&self) -> &Blocks {
        &self.descriptor.mask_blocks
    }

    /// Decodes `[start, end)`; see [`TwoBitFile::slice_of`](super::TwoBitFile::slice_of)
    pub fn slice(&mut self, start: i64, end: Option<i64>) -> Result<String> {
        let range = normalize_range(start, end, self.descriptor.dna_size, self.policy)?;
        decode_range(
            &mut *self.reader,
            self.descriptor,
            range,
            self.byte_swapped,
            true,
        )
    }

    /// Decodes the base at `index` (negative counts from the end)
    ///
    /// Returns `None` if the index falls outside of the sequence.
    #[allow(clippy::cast_sign_loss)]
    pub fn base_at(&mut self, index: i64) -> Result<Option<u8>> {
        let len = i64::from(self.descriptor.dna_size);
        let index = if index < 0 { len + index } else { index };
        if !(0..len).contains(&index) {
            return Ok(None);
        }
        let range = index as u32..index as u32 + 1;
        let base = decode_range(
            &mut *self.reader,
            self.descriptor,
            range,
            self.byte_swapped,
            true,
        )?;
        Ok(base.bytes().next())
    }

    /// Decodes the whole sequence
    ///
    /// Chromosome-scale sequences need hundreds of megabytes for this.
    pub fn to_sequence(&mut self) -> Result<String> {
        self.slice(0, None)
    }
}

#[cfg(test)]
mod testing {
    use std::io::Cursor;

    use crate::fixtures::{file_bytes, RecordSpec};
    use crate::record::Block;
    use crate::{Result, TwoBitFile};

    #[test]
    fn test_handle_accessors() -> Result<()> {
        let bytes = file_bytes(
            &[(
                "chrX",
                RecordSpec::new("GATTACAGATTACA")
                    .n_blocks(&[(7, 1)])
                    .mask_blocks(&[(0, 3)]),
            )],
            false,
        );
        let mut tb = TwoBitFile::new(Cursor::new(bytes))?;
        let mut handle = tb.sequence("chrX")?;
        assert_eq!(handle.name(), "chrX");
        assert_eq!(handle.len(), 14);
        assert!(!handle.is_empty());
        assert_eq!(handle.n_blocks().as_slice(), &[Block::new(7, 1)]);
        assert_eq!(handle.mask_blocks().covered(), 3);

        assert_eq!(handle.to_sequence()?, "gatTACANATTACA");
        assert_eq!(handle.slice(-4, None)?, "TACA");
        assert_eq!(handle.base_at(0)?, Some(b'g'));
        assert_eq!(handle.base_at(7)?, Some(b'N'));
        assert_eq!(handle.base_at(-1)?, Some(b'A'));
        assert_eq!(handle.base_at(14)?, None);
        assert_eq!(handle.base_at(-15)?, None);
        Ok(())
    }
}
