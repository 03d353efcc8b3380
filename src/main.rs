use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use twobit::{RangePolicy, RegionExtractor, TwoBitReaderBuilder, DEFAULT_WIDTH};

#[derive(Parser, Debug)]
#[command(
    name = "twobit",
    about = "Extract BED regions from a .2bit file as FASTA",
    long_about = "Reads `chrom start end` regions (0-based, half-open) from standard input \
                  and writes one FASTA record per region to standard output."
)]
struct Cli {
    /// Input .2bit file
    path: PathBuf,

    /// FASTA line width (0 writes each sequence on one line)
    #[arg(short, long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Clamp out-of-range regions to the sequence bounds instead of skipping them
    #[arg(long)]
    clamp: bool,

    /// Print `name<TAB>length` for every sequence and exit
    #[arg(long)]
    sizes: bool,

    /// Write soft-masked bases in uppercase
    #[arg(long)]
    no_mask: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let policy = if cli.clamp {
        RangePolicy::Lenient
    } else {
        RangePolicy::Strict
    };
    let mut genome = TwoBitReaderBuilder::default()
        .range_policy(policy)
        .open_mmap(&cli.path)
        .with_context(|| format!("failed to open {}", cli.path.display()))?;

    let mut out = BufWriter::new(io::stdout().lock());
    if cli.sizes {
        for (name, size) in genome.sequence_sizes()? {
            writeln!(out, "{name}\t{size}")?;
        }
        out.flush()?;
        return Ok(());
    }

    let summary = RegionExtractor::default()
        .width(cli.width)
        .policy(policy)
        .soft_mask(!cli.no_mask)
        .extract(&mut genome, io::stdin().lock(), &mut out)?;
    info!(
        written = summary.written,
        skipped = summary.skipped,
        "finished extracting regions"
    );

    Ok(())
}
