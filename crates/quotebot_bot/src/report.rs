//! Outcome of one publish cycle.

use crate::Selection;
use derive_getters::Getters;
use quotebot_social::PublishResult;
use std::fmt;
use tracing::{info, warn};

/// What a cycle chose, where it landed and whether history was saved.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CycleReport {
    /// Quote chosen for the cycle.
    selection: Selection,
    /// One result per publisher, in publish order.
    results: Vec<PublishResult>,
    /// Whether the history file was written.
    persisted: bool,
}

impl CycleReport {
    /// Assemble a report.
    pub fn new(selection: Selection, results: Vec<PublishResult>, persisted: bool) -> Self {
        Self {
            selection,
            results,
            persisted,
        }
    }

    /// Publishers that accepted the quote.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    /// Publishers that rejected the quote.
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Emit the summary log line.
    pub fn log(&self) {
        let text = self.selection.text();
        if self.failed() == 0 {
            info!(
                succeeded = self.succeeded(),
                fallback = self.selection.is_fallback(),
                persisted = self.persisted,
                "Posted quote: {}",
                text
            );
        } else {
            warn!(
                succeeded = self.succeeded(),
                failed = self.failed(),
                fallback = self.selection.is_fallback(),
                persisted = self.persisted,
                "Cycle finished with failures: {}",
                text
            );
        }
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selection {
            Selection::Accepted { text, attempts } => {
                writeln!(f, "Quote ({} attempt(s)): {}", attempts, text)?
            }
            Selection::Fallback { text } => writeln!(f, "Quote (fallback): {}", text)?,
        }
        for result in &self.results {
            match (result.post_id(), result.error()) {
                (_, Some(error)) => writeln!(f, "  {}: failed ({})", result.platform(), error)?,
                (Some(id), None) => writeln!(f, "  {}: posted {}", result.platform(), id)?,
                (None, None) => writeln!(f, "  {}: posted", result.platform())?,
            }
        }
        write!(
            f,
            "History {}",
            if self.persisted { "saved" } else { "NOT saved" }
        )
    }
}
