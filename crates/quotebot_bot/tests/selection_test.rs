//! Tests for the retry-on-duplicate selection loop.

use async_trait::async_trait;
use quotebot_bot::{QuoteHistory, QuoteSource, Selection, select_quote};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Source replaying a script, repeating its last entry.
struct ScriptedSource {
    script: Vec<&'static str>,
    calls: AtomicU32,
    fallback: &'static str,
}

impl ScriptedSource {
    fn new(script: Vec<&'static str>) -> Self {
        Self {
            script,
            calls: AtomicU32::new(0),
            fallback: "POOL",
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn generate(&self) -> String {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        let idx = n.min(self.script.len() - 1);
        self.script[idx].to_string()
    }

    fn fallback(&self) -> String {
        self.fallback.to_string()
    }
}

fn history_with(entries: &[&str]) -> QuoteHistory {
    QuoteHistory::from_entries(entries.iter().map(|s| s.to_string()), 100)
}

#[tokio::test]
async fn test_fresh_quote_accepted_first_try() {
    let source = ScriptedSource::new(vec!["A"]);
    let selection = select_quote(&source, &history_with(&[]), 10).await;

    assert_eq!(
        selection,
        Selection::Accepted {
            text: "A".to_string(),
            attempts: 1
        }
    );
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_duplicates_retried_until_fresh() {
    let source = ScriptedSource::new(vec!["DUP", "DUP", "NEW"]);
    let selection = select_quote(&source, &history_with(&["DUP"]), 10).await;

    assert_eq!(selection.text(), "NEW");
    assert!(matches!(selection, Selection::Accepted { attempts: 3, .. }));
}

#[tokio::test]
async fn test_always_duplicate_makes_exactly_max_attempts() {
    let source = ScriptedSource::new(vec!["DUP"]);
    let selection = select_quote(&source, &history_with(&["DUP"]), 10).await;

    assert_eq!(source.calls(), 10);
    assert_eq!(
        selection,
        Selection::Fallback {
            text: "POOL".to_string()
        }
    );
    assert!(selection.is_fallback());
}

#[tokio::test]
async fn test_fallback_not_checked_against_history() {
    let mut source = ScriptedSource::new(vec!["DUP"]);
    source.fallback = "DUP";
    let selection = select_quote(&source, &history_with(&["DUP"]), 3).await;

    assert_eq!(source.calls(), 3);
    assert_eq!(
        selection,
        Selection::Fallback {
            text: "DUP".to_string()
        }
    );
}

#[tokio::test]
async fn test_zero_budget_still_generates_once() {
    let source = ScriptedSource::new(vec!["A"]);
    let selection = select_quote(&source, &history_with(&[]), 0).await;

    assert_eq!(source.calls(), 1);
    assert_eq!(selection.text(), "A");
}

/// Source usable through a trait object, as the bot holds it.
struct Recorder(Mutex<Vec<String>>);

#[async_trait]
impl QuoteSource for Recorder {
    async fn generate(&self) -> String {
        let mut seen = self.0.lock().expect("Lock not poisoned");
        seen.push("x".to_string());
        format!("quote {}", seen.len())
    }

    fn fallback(&self) -> String {
        "pool".to_string()
    }
}

#[tokio::test]
async fn test_works_through_trait_object() {
    let source: Box<dyn QuoteSource> = Box::new(Recorder(Mutex::new(Vec::new())));
    let selection = select_quote(source.as_ref(), &history_with(&["quote 1"]), 10).await;

    assert_eq!(selection.text(), "quote 2");
}
