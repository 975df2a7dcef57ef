//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Split labeled bird recordings into per-species audio segments.
#[derive(Debug, Parser)]
#[command(name = "labelcut")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing WAV recordings and their annotation files.
    pub directory: PathBuf,

    /// Path to the species lookup table (default: milon.txt in DIRECTORY).
    #[arg(short, long, env = "LABELCUT_MILON")]
    pub milon: Option<PathBuf>,

    /// Write extracted segments and metadata.csv into the results directory.
    #[arg(short, long)]
    pub save: bool,

    /// Results directory (default: DIRECTORY/results).
    #[arg(short, long, env = "LABELCUT_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Stop on the first file that fails to process.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable the progress bar without changing log verbosity.
    #[arg(long)]
    pub no_progress: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["labelcut", "recordings"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.directory, PathBuf::from("recordings"));
        assert!(!cli.save);
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "labelcut",
            "recordings",
            "--milon",
            "tables/milon.txt",
            "--save",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.milon, Some(PathBuf::from("tables/milon.txt")));
        assert!(cli.save);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_requires_directory() {
        let cli = Cli::try_parse_from(["labelcut"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_output_override() {
        let cli = Cli::try_parse_from(["labelcut", "recordings", "-o", "/tmp/out"]).unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/out")));
    }
}
