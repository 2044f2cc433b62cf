//! Fixed-interval cycle scheduler.

use crate::{BotConfig, PublishCycle};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

/// Runs one cycle at start, then one whenever the interval has elapsed.
///
/// Due-ness is checked every `check_interval`. Cycles never overlap and
/// missed checks are not replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    interval: Duration,
    check_interval: Duration,
}

impl Scheduler {
    /// Create a scheduler.
    pub fn new(interval: Duration, check_interval: Duration) -> Self {
        Self {
            interval,
            check_interval: check_interval.max(Duration::from_millis(1)),
        }
    }

    /// Scheduler using the configured interval and check period.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.interval(), config.check_interval())
    }

    /// Time between cycles.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run until `shutdown` resolves, returning the number of cycles run.
    ///
    /// Shutdown is observed between checks, never in the middle of a cycle.
    #[instrument(skip(self, cycle, shutdown), fields(interval_secs = self.interval.as_secs()))]
    pub async fn run<C, F>(&self, cycle: &mut C, shutdown: F) -> usize
    where
        C: PublishCycle + ?Sized,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("Starting scheduler, posting initial quote");
        cycle.run_cycle().await;
        let mut cycles = 1;
        let mut next_due = Instant::now() + self.interval;

        let mut checks =
            tokio::time::interval_at(Instant::now() + self.check_interval, self.check_interval);
        checks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(cycles, "Shutdown requested, stopping scheduler");
                    break;
                }
                _ = checks.tick() => {
                    if Instant::now() < next_due {
                        continue;
                    }
                    debug!(cycle = cycles + 1, "Cycle due");
                    cycle.run_cycle().await;
                    cycles += 1;
                    next_due = Instant::now() + self.interval;
                }
            }
        }

        cycles
    }
}
