use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use hivevo_ref::align::ReferenceTranslator;
use hivevo_ref::reference::{HivReference, HivReferenceAminoacid, SiteQueries};
use hivevo_ref::stats::{compute_frequencies, FrequencyTable, TableMeta};
use hivevo_ref::store::{AlignmentKey, FsStore};
use hivevo_ref::util::Alphabet;
use hivevo_ref::StoreConfig;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "hivevo-ref", author, version, about = "HIV reference frequencies, entropy and coordinate translation", arg_required_else_help = true)]
struct Cli {
    /// Root data folder (contains reference/)
    #[arg(long = "data-root", env = "HIVEVO_ROOT_DATA_FOLDER", global = true, default_value = ".")]
    data_root: PathBuf,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Precompute the genome-wide nucleotide frequency table
    Freqs {
        #[arg(long, default_value = "HXB2")]
        refname: String,
        #[arg(long, default_value = "B")]
        subtype: String,
        /// Output path (store location if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Per-position consensus, entropy and gap flag as TSV
    Entropy {
        #[arg(long, default_value = "HXB2")]
        refname: String,
        #[arg(long, default_value = "B")]
        subtype: String,
        /// Amino-acid profile of this annotated region
        #[arg(long)]
        region: Option<String>,
        /// Use the precomputed frequency table instead of the alignment
        #[arg(long, conflicts_with = "region")]
        precomputed: bool,
        #[arg(long = "gap-threshold", default_value_t = 0.05)]
        gap_threshold: f64,
    },
    /// Entropy quantile buckets
    Quantiles {
        #[arg(long, default_value = "HXB2")]
        refname: String,
        #[arg(long, default_value = "B")]
        subtype: String,
        #[arg(short = 'q', long, default_value_t = 4)]
        quantiles: usize,
        #[arg(long)]
        precomputed: bool,
    },
    /// Translate positions between two references
    Translate {
        #[arg(long, default_value = "HXB2")]
        from: String,
        #[arg(long, default_value = "NL4-3")]
        to: String,
        /// 0-based positions in the `--from` reference
        positions: Vec<i64>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let store = FsStore::new(StoreConfig::from_data_root(&cli.data_root));

    match cli.command {
        Commands::Freqs { refname, subtype, out } => run_freqs(&store, &refname, &subtype, out),
        Commands::Entropy { refname, subtype, region, precomputed, gap_threshold } => match region {
            Some(region) => {
                let r = HivReferenceAminoacid::load(&store, &region, &refname, &subtype)
                    .with_context(|| format!("cannot load amino-acid reference {} {}", refname, region))?;
                write_profile(&r, gap_threshold)
            }
            None => {
                let r = HivReference::load(&store, &refname, &subtype, !precomputed)
                    .with_context(|| format!("cannot load reference {} (subtype {})", refname, subtype))?;
                write_profile(&r, gap_threshold)
            }
        },
        Commands::Quantiles { refname, subtype, quantiles, precomputed } => {
            let r = HivReference::load(&store, &refname, &subtype, !precomputed)
                .with_context(|| format!("cannot load reference {} (subtype {})", refname, subtype))?;
            let mut out = std::io::BufWriter::new(std::io::stdout());
            writeln!(out, "bucket\tlow\thigh\tpositions")?;
            for (i, b) in r.get_entropy_quantiles(quantiles)?.iter().enumerate() {
                writeln!(out, "{}\t{:.6}\t{:.6}\t{}", i, b.range.0, b.range.1, b.positions.len())?;
            }
            out.flush()?;
            Ok(())
        }
        Commands::Translate { from, to, positions } => {
            let t = ReferenceTranslator::new(&store, &from, &to)
                .with_context(|| format!("cannot build translator {} -> {}", from, to))?;
            let mut out = std::io::BufWriter::new(std::io::stdout());
            for pos in positions {
                let (other, mapped) = t.translate(pos, &from)?;
                writeln!(out, "{}\t{}\t{}\t{}", from, pos, other, mapped)?;
            }
            out.flush()?;
            Ok(())
        }
    }
}

fn run_freqs(store: &FsStore, refname: &str, subtype: &str, out: Option<PathBuf>) -> Result<()> {
    let key = AlignmentKey::genomewide(subtype, refname);
    let aln_path = store.alignment_path(&key);
    let aln = hivevo_ref::io::fasta::read_alignment(&aln_path)?;
    let af = compute_frequencies(&aln, &Alphabet::nucleotides());

    let table = FrequencyTable::new(
        af,
        TableMeta {
            refname: refname.to_string(),
            subtype: subtype.to_string(),
            source_alignment: Some(aln_path.display().to_string()),
            build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
        },
    );
    let out_path = out.unwrap_or_else(|| store.frequencies_path(subtype, refname));
    table
        .save_to_file(&out_path)
        .with_context(|| format!("cannot write frequency table to '{}'", out_path.display()))?;
    println!("sequences: {}", aln.num_rows());
    println!("positions: {}", aln.width());
    println!("frequency table saved: {}", out_path.display());
    Ok(())
}

fn write_profile<R: SiteQueries>(r: &R, gap_threshold: f64) -> Result<()> {
    let mut out = std::io::BufWriter::new(std::io::stdout());
    let ungapped = r.get_ungapped(gap_threshold);
    writeln!(out, "position\tconsensus\tentropy\tungapped")?;
    for (pos, ((&c, &h), &u)) in r.consensus().iter().zip(r.entropy()).zip(&ungapped).enumerate() {
        writeln!(out, "{}\t{}\t{:.6}\t{}", pos, c as char, h, u)?;
    }
    out.flush()?;
    Ok(())
}
