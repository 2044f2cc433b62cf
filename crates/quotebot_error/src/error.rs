//! Top-level error wrapper types.

use crate::{ConfigError, HistoryError, ModelsError, SocialError};

/// Every error the quotebot crates can surface to the binary.
///
/// # Examples
///
/// ```
/// use quotebot_error::{ConfigError, QuotebotError};
///
/// let err: QuotebotError = ConfigError::new("missing handle").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum QuotebotErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// History persistence error
    #[from(HistoryError)]
    History(HistoryError),
    /// Generative backend error
    #[from(ModelsError)]
    Models(ModelsError),
    /// Social platform error
    #[from(SocialError)]
    Social(SocialError),
}

/// Quotebot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Quotebot Error: {}", _0)]
pub struct QuotebotError(Box<QuotebotErrorKind>);

impl QuotebotError {
    /// Create a new error from a kind.
    pub fn new(kind: QuotebotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuotebotErrorKind {
        &self.0
    }
}

impl<T> From<T> for QuotebotError
where
    T: Into<QuotebotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for quotebot operations.
pub type QuotebotResult<T> = std::result::Result<T, QuotebotError>;
