//! Engine tests.
//!
//! These live as integration tests rather than unit tests because they use
//! `grepd-test-utils`, which itself depends on `grepd-core`; a unit-test
//! build would see two distinct copies of the crate's types.

use grepd_core::engine::{EngineError, MatchGroup, Pattern, SearchEngine, SearchQuery, flatten, truncate};
use grepd_test_utils::library::TestLibrary;
use pretty_assertions::assert_eq;

fn query(pattern: Pattern) -> SearchQuery {
    SearchQuery {
        pattern,
        source: None,
        limit: None,
        before: 0,
        after: 0,
    }
}

fn group(start_line: usize, lines: &[&str]) -> MatchGroup {
    MatchGroup {
        start_line,
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_literal_match_with_context() {
    let lib = TestLibrary::new().with_source("quote_file.txt", &["a", "MATCH", "b", "c"]);
    let engine = SearchEngine::new(lib.library());

    let mut q = query(Pattern::Literal("MATCH".into()));
    q.before = 1;
    q.after = 1;

    let groups = engine.search(&q).await.unwrap();
    assert_eq!(groups, vec![group(1, &["a", "MATCH", "b"])]);
}

#[tokio::test]
async fn test_zero_matches_is_ok() {
    let lib = TestLibrary::new().with_source("quote_file.txt", &["a", "b"]);
    let engine = SearchEngine::new(lib.library());

    let groups = engine
        .search(&query(Pattern::Literal("nothing".into())))
        .await
        .unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn test_match_all_returns_one_group_per_line() {
    let lib = TestLibrary::new().with_source("quote_file.txt", &["1", "2", "3", "4", "5"]);
    let engine = SearchEngine::new(lib.library());

    let groups = engine.search(&query(Pattern::MatchAll)).await.unwrap();
    assert_eq!(groups.len(), 5);
    for (i, g) in groups.iter().enumerate() {
        assert_eq!(g.start_line, i + 1);
        assert_eq!(g.lines, vec![(i + 1).to_string()]);
    }
}

#[tokio::test]
async fn test_window_clipped_at_file_edges() {
    let lib = TestLibrary::new().with_source("quote_file.txt", &["first", "x", "last"]);
    let engine = SearchEngine::new(lib.library());

    let mut q = query(Pattern::Literal("first".into()));
    q.before = 5;
    q.after = 0;
    let groups = engine.search(&q).await.unwrap();
    assert_eq!(groups, vec![group(1, &["first"])]);

    let mut q = query(Pattern::Literal("last".into()));
    q.before = 0;
    q.after = 5;
    let groups = engine.search(&q).await.unwrap();
    assert_eq!(groups, vec![group(3, &["last"])]);
}

#[tokio::test]
async fn test_adjacent_matches_keep_independent_windows() {
    let lib = TestLibrary::new().with_source("quote_file.txt", &["x", "hit", "hit", "y"]);
    let engine = SearchEngine::new(lib.library());

    let mut q = query(Pattern::Literal("hit".into()));
    q.before = 1;
    q.after = 1;

    let groups = engine.search(&q).await.unwrap();
    assert_eq!(
        groups,
        vec![group(1, &["x", "hit", "hit"]), group(2, &["hit", "hit", "y"])]
    );
}

#[tokio::test]
async fn test_literal_treats_metacharacters_literally() {
    let lib = TestLibrary::new().with_source("quote_file.txt", &["a.b", "axb"]);
    let engine = SearchEngine::new(lib.library());

    let groups = engine
        .search(&query(Pattern::Literal("a.b".into())))
        .await
        .unwrap();
    assert_eq!(groups, vec![group(1, &["a.b"])]);
}

#[tokio::test]
async fn test_regex_mode_matches() {
    let lib = TestLibrary::new().with_source("quote_file.txt", &["a.b", "axb", "ab"]);
    let engine = SearchEngine::new(lib.library());

    let groups = engine
        .search(&query(Pattern::Regex("^a.b$".into())))
        .await
        .unwrap();
    assert_eq!(groups, vec![group(1, &["a.b"]), group(2, &["axb"])]);
}

#[tokio::test]
async fn test_invalid_regex_is_pattern_error() {
    let lib = TestLibrary::new().with_source("quote_file.txt", &["a"]);
    let engine = SearchEngine::new(lib.library());

    let err = engine
        .search(&query(Pattern::Regex("[unclosed".into())))
        .await
        .unwrap_err();
    match err {
        EngineError::Pattern(msg) => {
            assert!(!msg.contains("regex parse error"), "prefix not stripped: {msg}");
            assert!(!msg.is_empty());
        }
        other => panic!("expected Pattern error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_source_is_library_error() {
    let lib = TestLibrary::new();
    let engine = SearchEngine::new(lib.library());

    let mut q = query(Pattern::MatchAll);
    q.source = Some("nonexistent.txt".into());
    let err = engine.search(&q).await.unwrap_err();
    assert!(matches!(err, EngineError::Library(_)));
}

#[tokio::test]
async fn test_query_limit_applied() {
    let lib = TestLibrary::new().with_source("quote_file.txt", &["a", "b", "c", "d"]);
    let engine = SearchEngine::new(lib.library());

    let mut q = query(Pattern::MatchAll);
    q.limit = Some(2);
    let groups = engine.search(&q).await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].lines, vec!["a"]);
    assert_eq!(groups[1].lines, vec!["b"]);
}

#[test]
fn test_truncate_none_returns_all() {
    let groups = vec![group(1, &["a"]), group(2, &["b"])];
    assert_eq!(truncate(groups.clone(), None), groups);
}

#[test]
fn test_truncate_limit_above_length_returns_all() {
    let groups = vec![group(1, &["a"]), group(2, &["b"])];
    assert_eq!(truncate(groups.clone(), Some(10)), groups);
}

#[test]
fn test_truncate_keeps_first_in_order() {
    let groups = vec![group(1, &["a"]), group(2, &["b"]), group(3, &["c"])];
    let truncated = truncate(groups, Some(2));
    assert_eq!(truncated, vec![group(1, &["a"]), group(2, &["b"])]);
}

#[test]
fn test_truncate_non_positive_limit_is_empty() {
    let groups = vec![group(1, &["a"])];
    assert!(truncate(groups.clone(), Some(0)).is_empty());
    assert!(truncate(groups, Some(-3)).is_empty());
}

#[test]
fn test_flatten_joins_with_separator() {
    let groups = vec![group(1, &["a", "b"]), group(4, &["c"])];
    assert_eq!(flatten(&groups), "a\nb\n___\nc");
}

#[test]
fn test_group_as_text() {
    let g = group(1, &["a", "b", "c"]);
    assert_eq!(g.as_text(), "a\nb\nc");
}
