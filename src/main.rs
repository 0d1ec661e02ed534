//! idlink - rename-safe file identity
//!
//! idlink provides:
//! - Timestamp identifiers embedded in file and directory names
//! - Path resolution that follows renames and moves through those identifiers
//! - Filing commands that tag entries or move them into store directories
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod backends;
mod cli;
mod core;
mod filing;
mod ident;
mod links;
mod resolve;

fn main() -> Result<()> {
    // Check for unsupported platforms
    #[cfg(windows)]
    {
        eprintln!("Error: Windows is not supported. Please use WSL (not guaranteed to work).");
        std::process::exit(1);
    }

    let cli = cli::Cli::parse();

    // RUST_LOG wins over -v/-q
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli::run(cli)
}
