//! `run` and `once` command handlers.

use quotebot_bot::{BotConfig, Credentials, CycleReport, PublishCycle, QuoteBot, Scheduler};
use quotebot_error::QuotebotResult;
use tracing::{info, instrument, warn};

/// Connect and run the scheduler until Ctrl-C.
///
/// # Errors
///
/// Returns error on fatal startup problems: missing credentials, invalid
/// override or a rejected Bluesky login.
#[instrument(skip(config, credentials))]
pub async fn run_bot(
    config: BotConfig,
    credentials: Credentials,
    dry_run: bool,
    interval_minutes: Option<u64>,
) -> QuotebotResult<()> {
    let config = match interval_minutes {
        Some(minutes) => config.with_interval_minutes(minutes)?,
        None => config,
    };

    let mut bot = QuoteBot::connect(&config, credentials, dry_run).await?;
    info!(
        platforms = ?bot.platforms(),
        history = bot.history().len(),
        interval_minutes = config.interval_minutes(),
        "Bot ready"
    );

    let cycles = Scheduler::from_config(&config)
        .run(&mut bot, shutdown_signal())
        .await;
    info!(cycles, "Bot stopped by user");
    Ok(())
}

/// Connect and run exactly one cycle.
///
/// # Errors
///
/// Returns error on the same fatal startup problems as [`run_bot`].
#[instrument(skip(config, credentials))]
pub async fn run_once(
    config: &BotConfig,
    credentials: Credentials,
    dry_run: bool,
) -> QuotebotResult<CycleReport> {
    let mut bot = QuoteBot::connect(config, credentials, dry_run).await?;
    Ok(bot.run_cycle().await)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
