//! Publisher capability trait and outcome types.

use async_trait::async_trait;
use derive_getters::Getters;
use quotebot_error::{SocialErrorKind, SocialResult};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{error, info, warn};

/// Platform-assigned identifier of a published post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct PostId(pub String);

/// Outcome of one publisher's attempt to post the accepted text.
///
/// Never persisted, only logged and reported.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PublishResult {
    /// Platform name.
    platform: String,
    /// Identifier assigned by the platform on success.
    post_id: Option<PostId>,
    /// Classified failure reason.
    error: Option<SocialErrorKind>,
}

impl PublishResult {
    /// A successful post.
    pub fn posted(platform: impl Into<String>, post_id: Option<PostId>) -> Self {
        Self {
            platform: platform.into(),
            post_id,
            error: None,
        }
    }

    /// A failed post.
    pub fn failed(platform: impl Into<String>, error: SocialErrorKind) -> Self {
        Self {
            platform: platform.into(),
            post_id: None,
            error: Some(error),
        }
    }

    /// Whether the platform accepted the post.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Capability shared by every posting backend.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Platform name used in logs and reports.
    fn platform_name(&self) -> &str;

    /// Maximum post length in characters, if the platform enforces one.
    fn max_text_length(&self) -> Option<usize> {
        None
    }

    /// Send already-truncated text to the platform.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Authentication fails
    /// - Rate limit exceeded
    /// - Platform API error or transport failure
    async fn try_post(&self, text: &str) -> SocialResult<PostId>;

    /// Post text, truncating to the platform limit and absorbing every error.
    ///
    /// Failures are classified and logged here so one platform can never
    /// abort the cycle for the others.
    async fn post(&self, text: &str) -> PublishResult {
        let platform = self.platform_name().to_string();
        let text = match self.max_text_length() {
            Some(max) => truncate_chars(text, max),
            None => Cow::Borrowed(text),
        };

        match self.try_post(&text).await {
            Ok(post_id) => {
                info!(platform = %platform, post_id = %post_id, "Posted quote");
                PublishResult::posted(platform, Some(post_id))
            }
            Err(e) => {
                match &e.kind {
                    SocialErrorKind::InvalidCredentials(msg) => {
                        error!(platform = %platform, reason = e.kind.label(), "Invalid credentials: {}", msg)
                    }
                    SocialErrorKind::PermissionDenied(msg) => {
                        error!(platform = %platform, reason = e.kind.label(), "Permission error: {}", msg)
                    }
                    SocialErrorKind::RateLimited { retry_after } => {
                        warn!(platform = %platform, reason = e.kind.label(), ?retry_after, "Rate limited")
                    }
                    other if e.is_recoverable() => {
                        warn!(platform = %platform, reason = other.label(), error = %e, "Post failed, next cycle may succeed")
                    }
                    other => {
                        error!(platform = %platform, reason = other.label(), error = %e, "Post failed")
                    }
                }
                PublishResult::failed(platform, e.kind)
            }
        }
    }
}

/// Truncate to at most `max` characters on a character boundary.
///
/// # Examples
///
/// ```
/// use quotebot_social::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("short", 280), "short");
/// ```
pub fn truncate_chars(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => Cow::Owned(text[..byte_idx].to_string()),
        None => Cow::Borrowed(text),
    }
}

/// Seconds until a throttled request may be retried, from standard headers.
///
/// Understands `retry-after` (seconds) and the epoch-based
/// `x-rate-limit-reset` / `ratelimit-reset` headers.
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
    };

    if let Some(secs) = header("retry-after") {
        return u64::try_from(secs).ok();
    }

    let reset = header("x-rate-limit-reset").or_else(|| header("ratelimit-reset"))?;
    let now = chrono::Utc::now().timestamp();
    Some(u64::try_from(reset - now).unwrap_or(0))
}
