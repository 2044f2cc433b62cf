//! Bounded retry-on-duplicate selection.

use crate::{QuoteHistory, QuoteSource};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Default generation attempts before falling back.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Quote chosen for a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Selection {
    /// A generated quote not present in the history.
    Accepted {
        /// Quote text.
        text: String,
        /// Generation calls made, including the accepted one.
        attempts: u32,
    },
    /// Every attempt collided; a pool quote, not checked against history.
    Fallback {
        /// Quote text.
        text: String,
    },
}

impl Selection {
    /// The chosen text.
    pub fn text(&self) -> &str {
        match self {
            Self::Accepted { text, .. } | Self::Fallback { text } => text,
        }
    }

    /// Whether the attempt budget was exhausted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Generate until a quote is not in `history`, at most `max_attempts` times.
///
/// Never fails. A `max_attempts` of zero is treated as one.
#[instrument(skip(source, history), fields(history_len = history.len()))]
pub async fn select_quote<S>(source: &S, history: &QuoteHistory, max_attempts: u32) -> Selection
where
    S: QuoteSource + ?Sized,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let text = source.generate().await;
        if !history.contains(&text) {
            return Selection::Accepted {
                text,
                attempts: attempt,
            };
        }
        info!(attempt, max_attempts, "Generated duplicate quote, trying again");
    }

    warn!(max_attempts, "Could not generate unique quote, using fallback");
    Selection::Fallback {
        text: source.fallback(),
    }
}
