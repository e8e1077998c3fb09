//! Sweepnorm: normalizes instrument sweep files into one canonical dataset.
//!
//! Measurement rigs log parameter sweeps as tab-separated text or as HDF5
//! containers. Sweepnorm reads either encoding into the same
//! [`sweep::Dataset`], infers the swept axis ranges, fixes orientation and
//! alternating scans, and derives polar/Cartesian channels on demand.
//!
//! # Modules
//!
//! - [`sweep`]: The canonical dataset, range inference and the format adapters
//! - [`identity`]: Content hashing and file metadata
//! - [`record`]: Loading and reloading sweep files
//! - [`cache`]: Content-addressed store for rendered plots
//! - [`inspect`]: Summary reports
//! - [`export`]: Channel export to CSV
//! - [`error`]: Error types for sweepnorm operations

pub mod cache;
pub mod error;
pub mod export;
pub mod identity;
pub mod inspect;
pub mod record;
pub mod sweep;

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

pub use error::SweepError;
pub use record::{load_dataset, SweepRecord};

use cache::{PlotCache, SqlitePlotCache};

/// The sweepnorm CLI application.
#[derive(Parser)]
#[command(name = "sweepnorm")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Summarize a sweep file.
    Inspect(InspectArgs),
    /// Export one output channel as CSV.
    Export(ExportArgs),
    /// Compute derived polar or Cartesian channels and export them as CSV.
    Transform(TransformArgs),
    /// Store and fetch rendered plots keyed by file content.
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Sweep file to inspect.
    input: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Sweep file to read.
    input: PathBuf,

    /// Title of the output channel to export.
    #[arg(long)]
    channel: String,

    /// Undo an alternating (boustrophedon) scan.
    #[arg(long)]
    alternate: bool,

    /// Swap the axes of a 2D channel.
    #[arg(long)]
    transpose: bool,

    /// Output CSV path (stdout if omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Arguments for the transform subcommand.
#[derive(clap::Args)]
struct TransformArgs {
    /// Sweep file to read.
    input: PathBuf,

    /// Target coordinates ('cartesian' or 'polar').
    #[arg(long)]
    to: String,

    /// First input channel (radius for 'cartesian', X for 'polar').
    first: String,

    /// Second input channel (angle in degrees for 'cartesian', Y for 'polar').
    second: String,

    /// Undo an alternating scan before transforming.
    #[arg(long)]
    alternate: bool,

    /// Output CSV path (stdout if omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Cache subcommands.
#[derive(Subcommand)]
enum CacheCommands {
    /// Store an artifact for the current content of a sweep file.
    Put(CachePutArgs),
    /// Fetch the latest artifact stored for a sweep file.
    Get(CacheGetArgs),
    /// Report whether the stored artifact matches the file's current content.
    Status(CacheStatusArgs),
}

/// Location of the cache database.
#[derive(clap::Args)]
struct CacheDb {
    /// SQLite database holding the cached plots.
    #[arg(long, env = "SWEEPNORM_CACHE", default_value = "plots.db")]
    db: PathBuf,
}

#[derive(clap::Args)]
struct CachePutArgs {
    /// Sweep file the artifact was rendered from.
    input: PathBuf,

    /// Rendered artifact to store.
    artifact: PathBuf,

    #[command(flatten)]
    db: CacheDb,
}

#[derive(clap::Args)]
struct CacheGetArgs {
    /// Sweep file to look up.
    input: PathBuf,

    /// Where to write the artifact.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    db: CacheDb,
}

#[derive(clap::Args)]
struct CacheStatusArgs {
    /// Sweep file to look up.
    input: PathBuf,

    #[command(flatten)]
    db: CacheDb,
}

/// Run the sweepnorm CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SweepError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::Export(args)) => run_export(args),
        Some(Commands::Transform(args)) => run_transform(args),
        Some(Commands::Cache(cmd)) => run_cache(cmd),
        None => {
            println!("sweepnorm {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Normalizes instrument sweep files into one canonical dataset.");
            println!();
            println!("Run 'sweepnorm --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), SweepError> {
    let record = SweepRecord::from_path(&args.input)?;
    let report = inspect::inspect_record(&record);

    match args.output.as_str() {
        "text" => print!("{report}"),
        "json" => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|source| SweepError::JsonWrite { source })?;
            println!("{json}");
        }
        other => {
            return Err(SweepError::UnsupportedFormat(format!(
                "'{other}' (supported: text, json)"
            )))
        }
    }
    Ok(())
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs) -> Result<(), SweepError> {
    let (_, dataset) = load_dataset(&args.input)?;
    let data = dataset.get_channel(&args.channel, args.alternate, args.transpose)?;
    write_csv(&[(args.channel.as_str(), &data)], args.out.as_deref())
}

/// Execute the transform subcommand.
fn run_transform(args: TransformArgs) -> Result<(), SweepError> {
    let mut record = SweepRecord::from_path(&args.input)?;
    let dataset = record.dataset_mut();

    match args.to.as_str() {
        "cartesian" => dataset.to_cartesian(&args.first, &args.second, args.alternate)?,
        "polar" => dataset.to_polar(&args.first, &args.second, args.alternate)?,
        other => {
            return Err(SweepError::UnsupportedFormat(format!(
                "'{other}' (supported: cartesian, polar)"
            )))
        }
    }

    let columns: Vec<_> = dataset
        .computed_channels
        .iter()
        .map(|c| (c.title.as_str(), &c.data))
        .collect();
    write_csv(&columns, args.out.as_deref())
}

fn write_csv(
    columns: &[export::NamedChannel<'_>],
    out: Option<&std::path::Path>,
) -> Result<(), SweepError> {
    match out {
        Some(path) => {
            export::write_channels_csv(path, columns)?;
            info!("wrote {}", path.display());
            Ok(())
        }
        None => export::write_channels_csv_to(io::stdout().lock(), columns),
    }
}

/// Execute a cache subcommand.
fn run_cache(cmd: CacheCommands) -> Result<(), SweepError> {
    match cmd {
        CacheCommands::Put(args) => {
            let identity = identity::compute_identity(&args.input)?;
            let bytes = fs::read(&args.artifact).map_err(SweepError::Io)?;
            let mut cache = SqlitePlotCache::open(&args.db.db)?;
            cache.put_for(&identity, &bytes)?;
            println!(
                "Cached {} bytes for {} ({})",
                bytes.len(),
                identity.file_name(),
                short_hash(&identity.content_hash)
            );
            Ok(())
        }
        CacheCommands::Get(args) => {
            let cache = SqlitePlotCache::open(&args.db.db)?;
            match cache.get(&args.input)? {
                Some(bytes) => {
                    fs::write(&args.out, &bytes).map_err(SweepError::Io)?;
                    println!("Wrote {} bytes to {}", bytes.len(), args.out.display());
                    Ok(())
                }
                None => Err(SweepError::NotFound {
                    path: args.input.clone(),
                }),
            }
        }
        CacheCommands::Status(args) => {
            let identity = identity::compute_identity(&args.input)?;
            let cache = SqlitePlotCache::open(&args.db.db)?;
            let status = if cache.contains_current(&args.input, &identity.content_hash)? {
                "current"
            } else if cache.get(&args.input)?.is_some() {
                "stale"
            } else {
                "missing"
            };
            println!("{}: {status}", identity.file_name());
            Ok(())
        }
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
