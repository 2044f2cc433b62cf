//! Social platform publishing errors.

/// Social platform error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SocialErrorKind {
    // Recoverable errors (the next cycle may succeed)
    /// Platform throttled the request.
    #[display("Rate limited (retry after: {:?}s)", retry_after)]
    RateLimited {
        /// Seconds until the platform accepts requests again, when reported.
        retry_after: Option<u64>,
    },

    /// Transport failure before a response arrived.
    #[display("Network error: {}", _0)]
    Network(String),

    /// Platform answered with an unclassified non-success status.
    #[display("HTTP {} error: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or platform message
        message: String,
    },

    /// Response body did not match the expected shape.
    #[display("Failed to parse response: {}", _0)]
    Parse(String),

    /// Session token expired and must be re-established.
    #[display("Session expired: {}", _0)]
    SessionExpired(String),

    // Unrecoverable errors (retrying with the same configuration will fail)
    /// Platform rejected the credentials (HTTP 401).
    #[display("Invalid credentials: {}", _0)]
    InvalidCredentials(String),

    /// Credentials are valid but lack permission (HTTP 403).
    #[display("Permission denied: {}", _0)]
    PermissionDenied(String),

    /// Required credentials are absent or incomplete.
    #[display("Missing credentials: {}", _0)]
    MissingCredentials(String),

    /// Client could not be constructed.
    #[display("Client construction failed: {}", _0)]
    Client(String),
}

impl SocialErrorKind {
    /// Classify a non-success HTTP status.
    ///
    /// # Examples
    ///
    /// ```
    /// use quotebot_error::SocialErrorKind;
    ///
    /// let kind = SocialErrorKind::from_status(429, "slow down", Some(60));
    /// assert_eq!(kind, SocialErrorKind::RateLimited { retry_after: Some(60) });
    /// ```
    pub fn from_status(status: u16, message: impl Into<String>, retry_after: Option<u64>) -> Self {
        let message = message.into();
        match status {
            401 => Self::InvalidCredentials(message),
            403 => Self::PermissionDenied(message),
            429 => Self::RateLimited { retry_after },
            _ => Self::Api { status, message },
        }
    }

    /// Check if error is recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Network(_)
                | Self::Api { .. }
                | Self::Parse(_)
                | Self::SessionExpired(_)
        )
    }

    /// Short machine-friendly label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::Network(_) => "network",
            Self::Api { .. } => "api",
            Self::Parse(_) => "parse",
            Self::SessionExpired(_) => "session_expired",
            Self::InvalidCredentials(_) => "invalid_credentials",
            Self::PermissionDenied(_) => "permission_denied",
            Self::MissingCredentials(_) => "missing_credentials",
            Self::Client(_) => "client",
        }
    }
}

/// Social platform error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Social Error: {} at {}:{}", kind, file, line)]
pub struct SocialError {
    /// Error kind.
    pub kind: SocialErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// File where error occurred.
    pub file: &'static str,
}

impl SocialError {
    /// Create a new social error.
    #[track_caller]
    pub fn new(kind: SocialErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Check if error is recoverable.
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

/// Result type for social platform operations.
pub type SocialResult<T> = Result<T, SocialError>;
