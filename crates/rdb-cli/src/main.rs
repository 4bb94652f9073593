/// RDB command-line tool: inspect, validate, analyse and dump Redis
/// snapshot files without loading them into memory.
///
/// # Command overview
///
/// ```text
/// rdb <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print one line per entity
///   validate   Check a snapshot for structural correctness
///   stats      Print per-kind counts and databases seen
///   dump       Write every entity as a JSON line
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder activity to stderr (debug level)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                 |
/// |------|-----------------------------------------|
/// | 0    | Success                                 |
/// | 1    | Error (I/O failure, invalid file, etc.) |
///
/// Logs and error details go to stderr so stdout can be piped cleanly.
/// Without `-v` the log filter comes from `RUST_LOG`, defaulting to `warn`.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use rdb_decoder::config::DEFAULT_CHUNK_SIZE;
use tracing_subscriber::EnvFilter;

mod cmd_dump;
mod cmd_inspect;
mod cmd_stats;
mod cmd_validate;
mod render;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Redis snapshot (RDB) command-line tool.
#[derive(Parser)]
#[command(name = "rdb", version, about = "Redis snapshot decoder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder activity to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print one line per entity in a snapshot.
    Inspect(InspectArgs),
    /// Check a snapshot for structural correctness.
    Validate(ValidateArgs),
    /// Print entity counts per kind and the databases selected.
    Stats(StatsArgs),
    /// Write every entity as one JSON object per line.
    Dump(DumpArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `rdb inspect`.
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────────┐
/// │ Flag          │ Effect                                           │
/// ├───────────────┼──────────────────────────────────────────────────┤
/// │ --show-values │ Append a preview of the value (first 80 chars)   │
/// │ --limit N     │ Stop printing after N entities                   │
/// └───────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the snapshot file.
    pub file: PathBuf,

    /// Show a preview of each value.
    #[arg(long)]
    pub show_values: bool,

    /// Print at most this many entities.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for `rdb validate`.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the snapshot file.
    pub file: PathBuf,
}

/// Arguments for `rdb stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Path to the snapshot file.
    pub file: PathBuf,
}

/// Arguments for `rdb dump`.
#[derive(clap::Args)]
pub struct DumpArgs {
    /// Path to the snapshot file.
    pub file: PathBuf,

    /// Bytes read from the file per chunk.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
        Commands::Dump(args) => cmd_dump::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
