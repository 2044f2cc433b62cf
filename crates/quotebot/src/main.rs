//! quotebot CLI binary.
//!
//! This binary provides command-line access to the quote bot:
//! - Run the scheduled posting loop
//! - Post a single quote
//! - Check configuration and backends without posting

use clap::Parser;
use quotebot::cli::{Cli, Commands, run_bot, run_check, run_once};
use quotebot::logging::{LogSettings, init_logging};
use quotebot_bot::{BotConfig, Credentials};
use std::process::ExitCode;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match BotConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let settings = LogSettings {
        verbose: cli.verbose,
        json: cli.json_logs,
        file: config.log_path().map(|p| p.to_path_buf()),
    };
    if let Err(e) = init_logging(&settings) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let credentials = Credentials::from_env();

    match cli.command {
        Commands::Run {
            dry_run,
            interval_minutes,
        } => match run_bot(config, credentials, dry_run, interval_minutes).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "Bot error");
                ExitCode::FAILURE
            }
        },

        Commands::Once { dry_run } => match run_once(&config, credentials, dry_run).await {
            Ok(report) => {
                println!("{report}");
                if report.failed() == 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(e) => {
                error!(error = %e, "Bot error");
                ExitCode::FAILURE
            }
        },

        Commands::Check { generate } => {
            let report = run_check(&config, credentials, generate).await;
            println!("{report}");
            if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
