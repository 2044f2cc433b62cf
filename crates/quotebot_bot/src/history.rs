//! Bounded post history and its JSON file store.

use quotebot_error::{HistoryError, HistoryErrorKind, HistoryResult};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// Default number of remembered posts.
pub const DEFAULT_HISTORY_CAP: usize = 100;

/// Recently posted quotes, oldest first, never longer than the cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteHistory {
    entries: VecDeque<String>,
    cap: usize,
}

impl QuoteHistory {
    /// Empty history holding at most `cap` entries (minimum 1).
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// History seeded from persisted entries, keeping only the newest `cap`.
    pub fn from_entries(entries: impl IntoIterator<Item = String>, cap: usize) -> Self {
        let mut history = Self::new(cap);
        for entry in entries {
            history.record(entry);
        }
        history
    }

    /// Append a posted quote, dropping the oldest entries past the cap.
    ///
    /// # Examples
    ///
    /// ```
    /// use quotebot_bot::QuoteHistory;
    ///
    /// let mut history = QuoteHistory::new(2);
    /// history.record("a");
    /// history.record("b");
    /// history.record("c");
    /// assert_eq!(history.to_vec(), vec!["b", "c"]);
    /// ```
    pub fn record(&mut self, text: impl Into<String>) {
        self.entries.push_back(text.into());
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    /// Exact membership; no case or whitespace normalization.
    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|entry| entry == text)
    }

    /// Number of remembered quotes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been posted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of remembered quotes.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Most recently recorded quote.
    pub fn newest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Copy of the entries, oldest first.
    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

/// JSON-array file holding the history between runs.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    cap: usize,
}

impl HistoryStore {
    /// Store backed by `path`, loading at most `cap` entries.
    pub fn new(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap,
        }
    }

    /// History file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history; a missing or unreadable file yields an empty history.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> QuoteHistory {
        match self.try_load().await {
            Ok(history) => {
                info!(entries = history.len(), "Loaded post history");
                history
            }
            Err(e) => {
                warn!(error = %e, "Could not load post history, starting empty");
                QuoteHistory::new(self.cap)
            }
        }
    }

    /// Load the history, reporting read and parse failures.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or is not a JSON
    /// array of strings.
    pub async fn try_load(&self) -> HistoryResult<QuoteHistory> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            debug!("No history file yet");
            return Ok(QuoteHistory::new(self.cap));
        }

        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            HistoryError::new(HistoryErrorKind::Read {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        let entries: Vec<String> = serde_json::from_str(&json).map_err(|e| {
            HistoryError::new(HistoryErrorKind::Malformed {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        if entries.len() > self.cap {
            debug!(stored = entries.len(), cap = self.cap, "Trimming stored history to cap");
        }
        Ok(QuoteHistory::from_entries(entries, self.cap))
    }

    /// Overwrite the file with the full history.
    ///
    /// Failures are logged here; the in-memory history is never touched.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    #[instrument(skip(self, history), fields(path = %self.path.display(), entries = history.len()))]
    pub async fn persist(&self, history: &QuoteHistory) -> HistoryResult<()> {
        let result = self.write(history).await;
        match &result {
            Ok(()) => debug!("Post history saved"),
            Err(e) => error!(error = %e, "Could not save post history"),
        }
        result
    }

    async fn write(&self, history: &QuoteHistory) -> HistoryResult<()> {
        let json = serde_json::to_string(&history.entries)
            .map_err(|e| HistoryError::new(HistoryErrorKind::Serialize(e.to_string())))?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            HistoryError::new(HistoryErrorKind::Write {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })
    }
}
