//! Tests for the publisher trait with mock implementations.

use async_trait::async_trait;
use quotebot_error::{SocialError, SocialErrorKind, SocialResult};
use quotebot_social::{PostId, Publisher, truncate_chars};
use std::sync::Mutex;

/// Mock platform for testing.
struct MockPublisher {
    limit: Option<usize>,
    failure: Option<SocialErrorKind>,
    seen: Mutex<Vec<String>>,
}

impl MockPublisher {
    fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            failure: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing(kind: SocialErrorKind) -> Self {
        Self {
            failure: Some(kind),
            ..Self::new(None)
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("Lock not poisoned").clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    fn platform_name(&self) -> &str {
        "mock"
    }

    fn max_text_length(&self) -> Option<usize> {
        self.limit
    }

    async fn try_post(&self, text: &str) -> SocialResult<PostId> {
        self.seen.lock().expect("Lock not poisoned").push(text.to_string());
        match &self.failure {
            Some(kind) => Err(SocialError::new(kind.clone())),
            None => Ok(PostId("mock_post_123".to_string())),
        }
    }
}

#[tokio::test]
async fn test_post_success_reports_id() {
    let publisher = MockPublisher::new(None);
    let result = publisher.post("Giddy up!").await;

    assert!(result.succeeded());
    assert_eq!(result.platform(), "mock");
    assert_eq!(result.post_id(), &Some(PostId("mock_post_123".to_string())));
    assert!(result.error().is_none());
}

#[tokio::test]
async fn test_post_truncates_before_sending() {
    let publisher = MockPublisher::new(Some(4));
    publisher.post("Newman!").await;

    assert_eq!(publisher.seen(), vec!["Newm".to_string()]);
}

#[tokio::test]
async fn test_post_without_limit_sends_full_text() {
    let publisher = MockPublisher::new(None);
    let text = "x".repeat(1000);
    publisher.post(&text).await;

    assert_eq!(publisher.seen(), vec![text]);
}

#[tokio::test]
async fn test_post_absorbs_each_error_class() {
    for kind in [
        SocialErrorKind::InvalidCredentials("bad".to_string()),
        SocialErrorKind::PermissionDenied("nope".to_string()),
        SocialErrorKind::RateLimited { retry_after: None },
        SocialErrorKind::Network("reset".to_string()),
    ] {
        let publisher = MockPublisher::failing(kind.clone());
        let result = publisher.post("Hello").await;

        assert!(!result.succeeded());
        assert!(result.post_id().is_none());
        assert_eq!(result.error(), &Some(kind));
    }
}

#[test]
fn test_truncate_counts_characters_not_bytes() {
    let text = "🥨🥨🥨";
    assert_eq!(truncate_chars(text, 2), "🥨🥨");
    assert_eq!(truncate_chars(text, 3), text);
    assert_eq!(truncate_chars("", 0), "");
}
