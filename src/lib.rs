//! Labelcut - split labeled bird recordings into per-species segments.
//!
//! Reads a directory of WAV files with paired Audacity label files,
//! resolves each label to a species identifier through a lookup table,
//! and extracts the labeled time spans as renamed audio segments.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod constants;
pub mod error;
pub mod milon;
pub mod splitter;

use clap::Parser;
use cli::Cli;

pub use error::{Error, Result};

/// Main entry point for the labelcut CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    splitter::command::execute(&cli)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}
