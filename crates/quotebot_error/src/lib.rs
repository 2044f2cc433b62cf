//! Error types for the quotebot workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use quotebot_error::{ConfigError, QuotebotResult};
//!
//! fn load() -> QuotebotResult<String> {
//!     Err(ConfigError::missing_var("BLUESKY_HANDLE"))?
//! }
//!
//! assert!(load().unwrap_err().to_string().contains("BLUESKY_HANDLE"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod history;
mod models;
mod social;

pub use config::ConfigError;
pub use error::{QuotebotError, QuotebotErrorKind, QuotebotResult};
pub use history::{HistoryError, HistoryErrorKind, HistoryResult};
pub use models::{ModelsError, ModelsErrorKind, ModelsResult};
pub use social::{SocialError, SocialErrorKind, SocialResult};
