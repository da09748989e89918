//! commitlink: report git commit metadata to the commitlink service.
//!
//! # Usage
//!
//! ```text
//! commitlink git-metadata upload [--dry-run] [--verbose] [--no-gitsync]
//!                                [--directory <dir>] [--repository-url <url>]
//! ```
//!
//! The API key is read from `COMMITLINK_API_KEY`; the target site from
//! `COMMITLINK_SITE`.

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::GitMetadataCommand;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "commitlink",
    version,
    about = "Link source code to the commitlink service",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report git metadata for the current commit.
    GitMetadata {
        #[command(subcommand)]
        command: GitMetadataCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::GitMetadata { command } => commands::run(command),
    }
}

/// Human-readable logs on stdout. `RUST_LOG` wins over `--verbose`.
pub(crate) fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(verbose)
        .without_time()
        .with_writer(std::io::stdout)
        .try_init();
}
