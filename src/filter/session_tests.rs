//! Tests for FilterSession recomputation and debouncing.

use super::*;
use crate::test_harness::{generated_records, malformed_record, text_record, tool_record};

fn session_with(records: Vec<Record>) -> FilterSession {
    let mut session = FilterSession::default();
    session.load(records);
    session
}

#[test]
fn load_shows_every_record_and_everything_visible() {
    let session = session_with(generated_records(50));

    assert_eq!(session.filtered_len(), 50);
    assert!(session.store().is_everything_visible());
    assert!(!session.is_stale());
}

#[test]
fn toggle_recomputes_immediately() {
    let mut session = session_with(vec![
        text_record("a", "user", "question"),
        text_record("b", "assistant", "answer"),
    ]);

    assert!(session.toggle_role("user"));

    assert_eq!(session.filtered_len(), 1);
    assert_eq!(session.original_index(0), Some(1));
    assert_eq!(session.filtered_index(0), None);
    assert!(!session.is_stale());
}

#[test]
fn toggle_user_off_then_on_restores_full_view() {
    let mut session = session_with(generated_records(1000));

    session.toggle_role("user");
    assert!(session.filtered_len() < 1000);

    session.toggle_role("user");
    assert_eq!(session.filtered_len(), 1000);
    assert!(session.store().is_everything_visible());
}

#[test]
fn refresh_is_a_no_op_when_nothing_changed() {
    let mut session = session_with(generated_records(10));
    assert!(!session.refresh());

    assert!(!session.toggle_role("narrator"));
    assert!(!session.refresh());
}

#[test]
fn typed_search_waits_for_debounce() {
    let mut session = session_with(vec![
        text_record("a", "user", "compile error"),
        text_record("b", "assistant", "fixed"),
    ]);
    let t0 = Instant::now();

    session.type_search("error", t0);
    assert!(session.search_pending());
    assert_eq!(session.filtered_len(), 2, "not applied before the delay");
    assert!(!session.tick(t0 + Duration::from_millis(100)));

    assert!(session.tick(t0 + Duration::from_millis(250)));
    assert_eq!(session.filtered_len(), 1);
    assert_eq!(session.store().search_text(), "error");
}

#[test]
fn newer_keystroke_supersedes_pending_search() {
    let mut session = session_with(vec![
        text_record("a", "user", "alpha"),
        text_record("b", "user", "beta"),
    ]);
    let t0 = Instant::now();

    session.type_search("alp", t0);
    session.type_search("bet", t0 + Duration::from_millis(200));

    assert!(!session.tick(t0 + Duration::from_millis(300)));
    assert!(session.tick(t0 + Duration::from_millis(450)));
    assert_eq!(session.original_index(0), Some(1));
    assert_eq!(session.filtered_len(), 1);
}

#[test]
fn toggle_folds_pending_search_into_new_state() {
    let mut session = session_with(vec![
        text_record("a", "user", "alpha"),
        text_record("b", "assistant", "alpha too"),
        text_record("c", "assistant", "gamma"),
    ]);
    let t0 = Instant::now();

    session.type_search("alpha", t0);
    session.toggle_role("user");

    assert!(!session.search_pending(), "pending task dropped");
    assert_eq!(session.store().search_text(), "alpha");
    assert_eq!(session.mapping().filtered_to_original(), &[1]);
    assert!(!session.tick(t0 + Duration::from_secs(1)));
}

#[test]
fn set_search_text_cancels_pending_input() {
    let mut session = session_with(vec![text_record("a", "user", "alpha")]);
    let t0 = Instant::now();

    session.type_search("zzz", t0);
    session.set_search_text("alp");

    assert!(!session.search_pending());
    assert!(!session.tick(t0 + Duration::from_secs(1)));
    assert_eq!(session.filtered_len(), 1);
}

#[test]
fn clear_all_filters_discards_pending_search() {
    let mut session = session_with(generated_records(20));
    let t0 = Instant::now();
    session.toggle_tool("Bash");
    session.type_search("nothing matches this", t0);

    session.clear_all_filters();

    assert!(!session.search_pending());
    assert_eq!(session.filtered_len(), 20);
    assert!(session.store().is_everything_visible());
}

#[test]
fn append_with_new_role_keeps_everything_visible() {
    let mut session = session_with(generated_records(10));
    assert!(session.store().is_everything_visible());

    session.append(vec![text_record("sys", "system", "init")]);

    assert!(session.store().available_roles().contains("system"));
    assert!(session.store().selected_roles().contains("system"));
    assert!(session.store().is_everything_visible());
    assert_eq!(session.filtered_len(), 11);
}

#[test]
fn append_keeps_cache_but_load_clears_it() {
    let mut session = session_with(vec![text_record("a", "user", "alpha")]);
    session.set_search_text("a");
    assert_eq!(session.cache_stats().size, 1);

    session.append(vec![text_record("b", "user", "beta")]);
    assert_eq!(session.cache_stats().size, 2);
    assert_eq!(session.cache_stats().hits, 1);

    session.load(vec![text_record("c", "user", "gamma")]);
    assert_eq!(session.cache_stats().size, 1);
}

#[test]
fn filtered_records_follow_mapping() {
    let mut session = session_with(vec![
        text_record("a", "user", "one"),
        tool_record("b", "assistant", &["Read"]),
        text_record("c", "user", "three"),
    ]);
    session.toggle_role("assistant");

    let uuids: Vec<&str> = session
        .filtered_records()
        .filter_map(|r| r.as_valid())
        .filter_map(|r| r.uuid())
        .map(|u| u.as_str())
        .collect();
    assert_eq!(uuids, vec!["a", "c"]);
}

#[test]
fn malformed_records_surface_in_errors() {
    let session = session_with(vec![text_record("a", "user", "fine"), malformed_record(2)]);

    assert_eq!(session.filtered_len(), 1);
    assert_eq!(session.stats().malformed, 1);
    assert_eq!(session.errors().count(), 1);
}

#[test]
fn searchable_text_is_available_for_highlighting() {
    let mut session = session_with(vec![text_record("a", "user", "Hello There")]);

    assert_eq!(session.searchable_text(0), Some("hello there"));
    assert_eq!(session.searchable_text(5), None);
}
