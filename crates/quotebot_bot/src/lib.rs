//! Deduplicating quote bot core.
//!
//! A cycle asks the [`QuoteGenerator`] for a quote until one is not in the
//! [`QuoteHistory`] (at most `max_attempts` times, then a fallback quote),
//! hands it to every [`Publisher`](quotebot_social::Publisher) in turn,
//! records it and saves the history. The [`Scheduler`] runs a cycle at
//! start and then at a fixed interval.
//!
//! # Example
//!
//! ```no_run
//! use quotebot_bot::{BotConfig, Credentials, PublishCycle, QuoteBot};
//!
//! # async fn example() -> quotebot_error::QuotebotResult<()> {
//! let config = BotConfig::load(None)?;
//! let mut bot = QuoteBot::connect(&config, Credentials::from_env(), true).await?;
//! let report = bot.run_cycle().await;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bot;
mod config;
mod generator;
mod history;
mod persona;
mod report;
mod scheduler;
mod selection;

pub use bot::{PublishCycle, QuoteBot, build_generator};
pub use config::{
    BackendConfig, BotConfig, Credentials, DEFAULT_CONFIG_FILE, PlatformConfig, Provider,
    REQUIRED_VARS, TWITTER_VARS,
};
pub use generator::{QuoteGenerator, QuoteSource, clean_quote};
pub use history::{DEFAULT_HISTORY_CAP, HistoryStore, QuoteHistory};
pub use persona::Persona;
pub use report::CycleReport;
pub use scheduler::Scheduler;
pub use selection::{DEFAULT_MAX_ATTEMPTS, Selection, select_quote};
