//! Generative backend errors.

/// Generative backend error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelsErrorKind {
    /// Request could not be sent or the connection failed
    #[display("Request failed: {}", _0)]
    Http(String),

    /// Provider answered with a non-success status
    #[display("HTTP {} error: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or provider message
        message: String,
    },

    /// Response body did not match the expected shape
    #[display("Failed to parse response: {}", _0)]
    Parse(String),

    /// Response parsed but carried no usable text
    #[display("Provider returned an empty completion")]
    EmptyCompletion,

    /// Client could not be constructed
    #[display("Client construction failed: {}", _0)]
    Client(String),
}

impl ModelsErrorKind {
    /// Whether the provider rejected the credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

/// Generative backend error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Models Error: {} at {}:{}", kind, file, line)]
pub struct ModelsError {
    /// The specific error kind
    pub kind: ModelsErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ModelsError {
    /// Create a new models error.
    #[track_caller]
    pub fn new(kind: ModelsErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for model operations.
pub type ModelsResult<T> = Result<T, ModelsError>;
