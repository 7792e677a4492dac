//! geocoin - A grid-based coin collecting game
//!
//! geocoin provides:
//! - Deterministic cache placement on a geographic grid
//! - LIFO coin transfers between caches and the player
//! - Session persistence under .geocoin/
//! - Unified output format (jsonl/json/md)

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cache;
mod cli;
mod core;
mod flows;
mod session;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    cli::run(cli)
}

/// Diagnostics go to stderr; stdout carries results only
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
