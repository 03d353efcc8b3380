//! Region extraction: BED regions in, FASTA records out
//!
//! Regions are read as whitespace-separated `chrom start end` lines (0-based,
//! half-open). Each valid region is written as a FASTA record with a
//! `>chrom:start-end` header and the sequence wrapped at a fixed width. Invalid lines
//! are logged and skipped; they never abort the run.

use std::io::{BufRead, Read, Seek, Write};

use tracing::warn;

use crate::error::Result;
use crate::{RangePolicy, TwoBitFile};

/// Default FASTA line width
pub const DEFAULT_WIDTH: usize = 60;

/// Counts of the records written and the lines skipped during an extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Extracts BED regions from a [`TwoBitFile`] as FASTA
///
/// Out-of-range regions are skipped under [`RangePolicy::Strict`] (the default) and
/// clamped to the sequence bounds under [`RangePolicy::Lenient`].
#[derive(Debug, Clone, Copy)]
pub struct RegionExtractor {
    width: usize,
    policy: RangePolicy,
    soft_mask: bool,
}
impl Default for RegionExtractor {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            policy: RangePolicy::Strict,
            soft_mask: true,
        }
    }
}
impl RegionExtractor {
    /// Sets the FASTA line width (0 disables wrapping)
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Sets how out-of-range regions are handled
    #[must_use]
    pub fn policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enables or disables lowercase output for soft-masked bases
    #[must_use]
    pub fn soft_mask(mut self, soft_mask: bool) -> Self {
        self.soft_mask = soft_mask;
        self
    }

    /// Reads regions from `input` and writes FASTA records to `output`
    ///
    /// # Errors
    ///
    /// Input problems are logged and skipped. Errors are only returned for I/O
    /// failures and for malformed sequence records in the `.2bit` file.
    pub fn extract<R, I, W>(
        &self,
        file: &mut TwoBitFile<R>,
        input: I,
        output: &mut W,
    ) -> Result<ExtractSummary>
    where
        R: Read + Seek,
        I: BufRead,
        W: Write,
    {
        let mut summary = ExtractSummary::default();
        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let line_number = idx + 1;
            match self.resolve(file, &line, line_number)? {
                Some((chrom, start, end)) => {
                    let seq = if self.soft_mask {
                        file.slice_of(chrom, start, Some(end))?
                    } else {
                        file.slice_of_unmasked(chrom, start, Some(end))?
                    };
                    write_fasta_record(output, chrom, start, end, seq.as_bytes(), self.width)?;
                    summary.written += 1;
                }
                None if is_ignorable(&line) => {}
                None => summary.skipped += 1,
            }
        }
        output.flush()?;
        Ok(summary)
    }

    /// Validates one input line, returning the region to extract
    fn resolve<'l, R: Read + Seek>(
        &self,
        file: &mut TwoBitFile<R>,
        line: &'l str,
        line_number: usize,
    ) -> Result<Option<(&'l str, i64, i64)>> {
        if is_ignorable(line) {
            return Ok(None);
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            warn!(line = line_number, raw = line, "skipping region: expected chrom, start and end");
            return Ok(None);
        }
        let chrom = fields[0];
        if !file.contains(chrom) {
            warn!(line = line_number, raw = line, "skipping region: unknown chrom {chrom}");
            return Ok(None);
        }
        let Ok(mut start) = fields[1].parse::<i64>() else {
            warn!(line = line_number, raw = line, "skipping region: invalid start");
            return Ok(None);
        };
        let Ok(mut end) = fields[2].parse::<i64>() else {
            warn!(line = line_number, raw = line, "skipping region: invalid end");
            return Ok(None);
        };

        let len = i64::from(file.sequence_length(chrom)?);
        if start < 0 || end > len || start > end {
            if !self.policy.is_lenient() {
                warn!(
                    line = line_number,
                    raw = line,
                    "skipping region: outside of {chrom} (length {len})"
                );
                return Ok(None);
            }
            if start < 0 {
                warn!(line = line_number, "start {start} is negative, using 0");
                start = 0;
            }
            if end > len {
                warn!(
                    line = line_number,
                    "end {end} exceeds {chrom} length {len}, truncating"
                );
                end = len;
            }
            if start > end {
                warn!(line = line_number, raw = line, "skipping region: start after end");
                return Ok(None);
            }
        }
        Ok(Some((chrom, start, end)))
    }
}

/// Blank lines, comments and `track`/`browser` header lines
fn is_ignorable(line: &str) -> bool {
    match line.split_whitespace().next() {
        None => true,
        Some(first) => first.starts_with('#') || first == "track" || first == "browser",
    }
}

/// Writes `>name:start-end` followed by `seq` wrapped at `width` (0 = no wrapping)
pub fn write_fasta_record<W: Write>(
    writer: &mut W,
    name: &str,
    start: i64,
    end: i64,
    seq: &[u8],
    width: usize,
) -> Result<()> {
    let mut buffer = itoa::Buffer::new();
    writer.write_all(b">")?;
    writer.write_all(name.as_bytes())?;
    writer.write_all(b":")?;
    writer.write_all(buffer.format(start).as_bytes())?;
    writer.write_all(b"-")?;
    writer.write_all(buffer.format(end).as_bytes())?;
    writer.write_all(b"\n")?;

    let width = if width == 0 { seq.len().max(1) } else { width };
    for line in seq.chunks(width) {
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod testing {
    use std::io::Cursor;

    use super::*;
    use crate::fixtures::{file_bytes, RecordSpec};

    fn genome() -> Result<TwoBitFile<Cursor<Vec<u8>>>> {
        TwoBitFile::new(Cursor::new(file_bytes(
            &[
                ("chr1", RecordSpec::new("TCAGTCAG").n_blocks(&[(3, 2)])),
                (
                    "chr2",
                    RecordSpec::new(&"ACGT".repeat(40)).mask_blocks(&[(0, 4)]),
                ),
            ],
            false,
        )))
    }

    fn run(extractor: RegionExtractor, input: &str) -> Result<(String, ExtractSummary)> {
        let mut tb = genome()?;
        let mut out = Vec::new();
        let summary = extractor.extract(&mut tb, input.as_bytes(), &mut out)?;
        Ok((String::from_utf8(out).expect("ascii output"), summary))
    }

    #[test]
    fn test_extract_regions() -> Result<()> {
        let (out, summary) = run(RegionExtractor::default(), "chr1\t0\t8\nchr1\t2\t6\tname\t0\t+\n")?;
        assert_eq!(out, ">chr1:0-8\nTCANNCAG\n>chr1:2-6\nANNC\n");
        assert_eq!(
            summary,
            ExtractSummary {
                written: 2,
                skipped: 0
            }
        );
        Ok(())
    }

    #[test]
    fn test_wrapping() -> Result<()> {
        let (out, _) = run(RegionExtractor::default(), "chr2\t0\t130\n")?;
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], ">chr2:0-130");
        assert_eq!(lines[1].len(), 60);
        assert!(lines[1].starts_with("acgtACGT"));
        assert_eq!(lines[2].len(), 60);
        assert_eq!(lines[3].len(), 10);
        assert_eq!(lines.len(), 4);

        let (out, _) = run(RegionExtractor::default().width(0).soft_mask(false), "chr2\t0\t130\n")?;
        assert_eq!(out.lines().nth(1).map(str::len), Some(130));
        assert!(out.contains("\nACGTACGT"));
        Ok(())
    }

    #[test]
    fn test_malformed_lines_are_skipped() -> Result<()> {
        let input = "\
track name=regions
# comment

chr1\t1
chr9\t0\t4
chr1\tx\t4
chr1\t0\ty
chr1\t0\t3
";
        let (out, summary) = run(RegionExtractor::default(), input)?;
        assert_eq!(out, ">chr1:0-3\nTCA\n");
        assert_eq!(
            summary,
            ExtractSummary {
                written: 1,
                skipped: 4
            }
        );
        Ok(())
    }

    #[test]
    fn test_header_keywords_only_match_whole_field() -> Result<()> {
        let mut tb = TwoBitFile::new(Cursor::new(file_bytes(
            &[
                ("track_7", RecordSpec::new("GATTACA")),
                ("browserX", RecordSpec::new("CCGG")),
            ],
            false,
        )))?;
        let input = "\
track\tname=x
browser position chr1:1-10
track_7\t0\t4
browserX\t1\t3
tracks\t0\t1
";
        let mut out = Vec::new();
        let summary = RegionExtractor::default().extract(&mut tb, input.as_bytes(), &mut out)?;
        assert_eq!(out, b">track_7:0-4\nGATT\n>browserX:1-3\nCG\n");
        assert_eq!(
            summary,
            ExtractSummary {
                written: 2,
                skipped: 1
            }
        );
        Ok(())
    }

    #[test]
    fn test_out_of_range_policies() -> Result<()> {
        let input = "chr1\t-2\t4\nchr1\t6\t20\nchr1\t5\t3\n";

        let (out, summary) = run(RegionExtractor::default(), input)?;
        assert!(out.is_empty());
        assert_eq!(summary.skipped, 3);

        let (out, summary) = run(RegionExtractor::default().policy(RangePolicy::Lenient), input)?;
        assert_eq!(out, ">chr1:0-4\nTCAN\n>chr1:6-8\nAG\n");
        assert_eq!(
            summary,
            ExtractSummary {
                written: 2,
                skipped: 1
            }
        );
        Ok(())
    }
}
