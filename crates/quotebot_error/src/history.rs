//! Post history persistence errors.

/// Kinds of history persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HistoryErrorKind {
    /// Failed to read the history file
    #[display("Failed to read history file {}: {}", path, message)]
    Read {
        /// Path of the history file
        path: String,
        /// Underlying I/O message
        message: String,
    },
    /// Failed to write the history file
    #[display("Failed to write history file {}: {}", path, message)]
    Write {
        /// Path of the history file
        path: String,
        /// Underlying I/O message
        message: String,
    },
    /// History file contents are not a JSON array of strings
    #[display("Malformed history file {}: {}", path, message)]
    Malformed {
        /// Path of the history file
        path: String,
        /// Parser message
        message: String,
    },
    /// History could not be serialized
    #[display("Failed to serialize history: {}", _0)]
    Serialize(String),
}

/// History error with location tracking.
///
/// # Examples
///
/// ```
/// use quotebot_error::{HistoryError, HistoryErrorKind};
///
/// let err = HistoryError::new(HistoryErrorKind::Serialize("oops".to_string()));
/// assert!(format!("{}", err).contains("serialize"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("History Error: {} at line {} in {}", kind, line, file)]
pub struct HistoryError {
    /// The kind of error that occurred
    pub kind: HistoryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl HistoryError {
    /// Create a new history error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HistoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
