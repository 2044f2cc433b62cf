//! Tests for the bounded history and its file store.

use quotebot_bot::{HistoryStore, QuoteHistory};

#[test]
fn test_record_keeps_cap_and_order() {
    let mut history = QuoteHistory::new(3);
    for quote in ["a", "b", "c", "d", "e"] {
        history.record(quote);
        assert!(history.len() <= 3);
        assert!(history.contains(quote));
    }
    assert_eq!(history.to_vec(), vec!["c", "d", "e"]);
    assert_eq!(history.newest(), Some("e"));
}

#[test]
fn test_full_history_drops_oldest() {
    let mut history = QuoteHistory::from_entries((0..100).map(|i| format!("quote {i}")), 100);
    assert_eq!(history.len(), 100);

    history.record("Z");

    assert_eq!(history.len(), 100);
    assert!(!history.contains("quote 0"));
    assert_eq!(history.iter().next(), Some("quote 1"));
    assert_eq!(history.newest(), Some("Z"));
}

#[test]
fn test_case_and_whitespace_variants_are_not_duplicates() {
    let history = QuoteHistory::from_entries(["Serenity now!".to_string()], 10);
    assert!(history.contains("Serenity now!"));
    assert!(!history.contains("serenity now!"));
    assert!(!history.contains("Serenity now! "));
}

#[tokio::test]
async fn test_missing_file_loads_empty() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let store = HistoryStore::new(dir.path().join("recent_posts.json"), 100);

    let history = store.load().await;

    assert!(history.is_empty());
    assert_eq!(history.cap(), 100);
}

#[tokio::test]
async fn test_malformed_file_loads_empty() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let path = dir.path().join("recent_posts.json");
    std::fs::write(&path, "{\"not\": \"a list\"}").expect("Write fixture");
    let store = HistoryStore::new(&path, 100);

    assert!(store.try_load().await.is_err());
    assert!(store.load().await.is_empty());
}

#[tokio::test]
async fn test_persist_then_reload_preserves_order() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let path = dir.path().join("recent_posts.json");
    let store = HistoryStore::new(&path, 100);

    let mut history = QuoteHistory::new(100);
    history.record("first");
    history.record("second");
    history.record("third");
    store.persist(&history).await.expect("Persist succeeds");

    let raw: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("Read back")).expect("JSON array");
    assert_eq!(raw, vec!["first", "second", "third"]);
    assert_eq!(store.load().await, history);
}

#[tokio::test]
async fn test_reload_past_cap_keeps_newest() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let path = dir.path().join("recent_posts.json");
    let stored: Vec<String> = (0..150).map(|i| i.to_string()).collect();
    std::fs::write(&path, serde_json::to_string(&stored).expect("Serialize")).expect("Write fixture");

    let history = HistoryStore::new(&path, 100).load().await;

    assert_eq!(history.len(), 100);
    assert_eq!(history.iter().next(), Some("50"));
    assert_eq!(history.newest(), Some("149"));
}

#[tokio::test]
async fn test_persist_failure_leaves_memory_untouched() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let store = HistoryStore::new(dir.path().join("missing_dir").join("recent_posts.json"), 10);
    let mut history = QuoteHistory::new(10);
    history.record("kept");

    assert!(store.persist(&history).await.is_err());
    assert_eq!(history.to_vec(), vec!["kept"]);
}
