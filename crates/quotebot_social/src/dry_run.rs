//! Publisher that logs instead of posting.

use crate::{PostId, Publisher};
use async_trait::async_trait;
use quotebot_error::SocialResult;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::info;

/// Texts a dry-run publisher remembers; older ones are dropped.
pub const DRY_RUN_KEEP: usize = 16;

/// Stands in for a real platform during `--dry-run`.
///
/// Keeps the platform name and length limit of the publisher it replaces so
/// logs and truncation match a live run.
#[derive(Debug)]
pub struct DryRunPublisher {
    platform: String,
    max_chars: Option<usize>,
    posted: Mutex<VecDeque<String>>,
}

impl DryRunPublisher {
    /// Create a dry-run publisher for the named platform.
    pub fn new(platform: impl Into<String>, max_chars: Option<usize>) -> Self {
        Self {
            platform: platform.into(),
            max_chars,
            posted: Mutex::new(VecDeque::with_capacity(DRY_RUN_KEEP)),
        }
    }

    /// The last [`DRY_RUN_KEEP`] texts that would have been posted, oldest first.
    pub fn posted(&self) -> Vec<String> {
        self.posted
            .lock()
            .map(|posted| posted.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    fn platform_name(&self) -> &str {
        &self.platform
    }

    fn max_text_length(&self) -> Option<usize> {
        self.max_chars
    }

    async fn try_post(&self, text: &str) -> SocialResult<PostId> {
        info!(platform = %self.platform, chars = text.chars().count(), text, "Dry run: not posting");
        if let Ok(mut posted) = self.posted.lock() {
            if posted.len() == DRY_RUN_KEEP {
                posted.pop_front();
            }
            posted.push_back(text.to_string());
        }
        Ok(PostId(format!("dry-run:{}", self.platform)))
    }
}
