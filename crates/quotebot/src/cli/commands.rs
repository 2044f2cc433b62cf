//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// quotebot - posts persona quotes to Bluesky and X on a schedule
#[derive(Parser, Debug)]
#[command(name = "quotebot")]
#[command(about = "Posts persona quotes to Bluesky and X on a schedule", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the TOML config file (defaults to ./quotebot.toml when present)
    #[arg(short, long, global = true, env = "QUOTEBOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit console logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Post immediately, then at every interval until Ctrl-C
    Run {
        /// Generate and log quotes without posting
        #[arg(long)]
        dry_run: bool,

        /// Override the configured interval
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_minutes: Option<u64>,
    },

    /// Run a single publish cycle and print its report
    Once {
        /// Generate and log the quote without posting
        #[arg(long)]
        dry_run: bool,
    },

    /// Check environment and configuration without posting
    Check {
        /// Also request one live quote from the configured backends
        #[arg(long)]
        generate: bool,
    },
}
