//! Tracing subscriber setup: console plus optional log file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging options gathered from the CLI and config file.
#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// Force `debug` level regardless of `RUST_LOG`.
    pub verbose: bool,
    /// JSON console output.
    pub json: bool,
    /// Append plain-text logs here as well.
    pub file: Option<PathBuf>,
}

impl LogSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    fn filter(&self) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        if self.verbose {
            return EnvFilter::try_new(self.default_directive());
        }
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(self.default_directive()))
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns error if the filter is invalid, the log file cannot be opened or
/// a subscriber is already installed.
pub fn init_logging(settings: &LogSettings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = settings.filter()?;

    let console_layer = if settings.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_level(true)
            .boxed()
    };

    let file_layer = match &settings.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
