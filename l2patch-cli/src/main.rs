//! l2patch CLI - synchronize a local client tree against a patch version.
//!
//! Exit code policy follows the service conventions: an unavailable version
//! exits 0 after reporting availability, a manifest fetch failure exits 1,
//! and per-file failures are printed but never fail the process.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use l2patch::{
    PatchResolver, PatchSource, PathFilter, ReqwestClient, SyncOptions, Synchronizer,
};

/// Synchronize a Lineage 2 client tree against a remote patch version.
#[derive(Debug, Parser)]
#[command(name = "l2patch", version, about)]
struct Cli {
    /// Patch service host, e.g. updater.example.com
    host: String,

    /// Game identifier on the service
    game: String,

    /// Patch tree version number
    version: u32,

    /// Optional glob filter over manifest paths, e.g. "system/*"
    filter: Option<String>,

    /// Local client tree root (defaults to the working directory)
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Worker pool width for parallel file updates
    #[arg(long, default_value_t = 16)]
    workers: usize,

    /// Per-request timeout in seconds (default: none)
    #[arg(long)]
    timeout: Option<u64>,

    /// Skip post-write size/digest verification
    #[arg(long)]
    no_verify: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> ExitCode {
    let client = Arc::new(match cli.timeout {
        Some(secs) => ReqwestClient::with_timeout(Duration::from_secs(secs)),
        None => ReqwestClient::new(),
    });

    let filter = match cli.filter.as_deref() {
        Some(pattern) => match PathFilter::new(pattern) {
            Ok(filter) => filter,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => PathFilter::match_all(),
    };

    let source = PatchSource::new(cli.host, cli.game, cli.version);
    let resolver = PatchResolver::new(source, client);
    tracing::debug!("patch tree at {}", resolver.source().base_url());

    let available = match resolver.is_available() {
        Ok(available) => available,
        Err(e) => {
            eprintln!("{}", e);
            false
        }
    };
    println!("Version {} available: {}", cli.version, available);
    if !available {
        return ExitCode::SUCCESS;
    }

    let records = match resolver.fetch_manifest() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Couldn't get file info map: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = SyncOptions {
        workers: cli.workers,
        verify_after_write: !cli.no_verify,
        ..SyncOptions::default()
    };
    let synchronizer = Synchronizer::with_options(resolver, cli.root, options);
    let report = synchronizer.run(&records, &filter);

    println!(
        "{} selected, {} up to date, {} updated, {} failed",
        report.selected,
        report.up_to_date,
        report.updated,
        report.failures.len()
    );
    for failure in &report.failures {
        eprintln!("{}: FAIL: {}", failure.path, failure.error);
    }

    // Individual file failures do not fail the run.
    ExitCode::SUCCESS
}
