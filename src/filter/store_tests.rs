//! Tests for FilterStateStore.

use super::*;
use crate::test_harness::{malformed_record, text_record, tool_record};

fn sample() -> Vec<Record> {
    vec![
        text_record("u0", "user", "hello"),
        tool_record("u1", "assistant", &["Bash", "Read"]),
        tool_record("u2", "assistant", &["Bash"]),
        text_record("u3", "tool_result", "ok"),
    ]
}

fn ids(set: &BTreeSet<String>) -> Vec<&str> {
    set.iter().map(String::as_str).collect()
}

// ===== Initialization =====

#[test]
fn from_records_selects_everything_available() {
    let store = FilterStateStore::from_records(&sample());

    assert_eq!(ids(store.available_roles()), vec!["assistant", "tool_result", "user"]);
    assert_eq!(ids(store.available_tools()), vec!["Bash", "Read"]);
    assert_eq!(store.selected_roles(), store.available_roles());
    assert_eq!(store.selected_tools(), store.available_tools());
    assert!(store.is_everything_visible());
    assert_eq!(store.role_dimension(), DimensionState::AllSelected);
}

#[test]
fn counts_cover_the_unfiltered_array() {
    let mut store = FilterStateStore::from_records(&sample());
    store.toggle_role("assistant");

    assert_eq!(store.role_counts().get("assistant"), Some(&2));
    assert_eq!(store.role_counts().get("user"), Some(&1));
    assert_eq!(store.tool_counts().get("Bash"), Some(&2));
    assert_eq!(store.tool_counts().get("Read"), Some(&1));
}

#[test]
fn malformed_records_contribute_no_categories() {
    let store = FilterStateStore::from_records(&[malformed_record(1)]);

    assert!(store.available_roles().is_empty());
    assert!(store.is_everything_visible());
}

#[test]
fn snapshot_mirrors_selection() {
    let store = FilterStateStore::from_records(&sample());
    let snapshot = store.snapshot();

    assert!(snapshot.roles().allows("user"));
    assert!(snapshot.tools().allows("Read"));
    assert!(!snapshot.roles().allows("summary"));
    assert_eq!(snapshot.search_text(), "");
}

// ===== Toggle state machine =====

#[test]
fn toggle_role_moves_to_partial_and_back() {
    let mut store = FilterStateStore::from_records(&sample());

    assert!(store.toggle_role("user"));
    assert_eq!(
        store.role_dimension(),
        DimensionState::PartialSelection { selected: 2 }
    );
    assert!(!store.is_everything_visible());

    assert!(store.toggle_role("user"));
    assert_eq!(store.role_dimension(), DimensionState::AllSelected);
    assert!(store.is_everything_visible());
}

#[test]
fn toggling_off_last_role_reaches_explicit_show_nothing() {
    let mut store = FilterStateStore::from_records(&sample());
    for role in ["user", "assistant", "tool_result"] {
        store.toggle_role(role);
    }

    assert_eq!(
        store.role_dimension(),
        DimensionState::PartialSelection { selected: 0 }
    );
    assert!(store.snapshot().roles().is_nothing());
    assert!(!store.snapshot().roles().is_unconstrained());
}

#[test]
fn toggle_unknown_id_is_ignored() {
    let mut store = FilterStateStore::from_records(&sample());
    let version = store.version();

    assert!(!store.toggle_role("narrator"));
    assert!(!store.toggle_tool("Teleport"));
    assert_eq!(store.version(), version);
    assert!(store.is_everything_visible());
}

#[test]
fn select_all_restores_from_any_state() {
    let mut store = FilterStateStore::from_records(&sample());
    store.toggle_tool("Bash");
    store.toggle_tool("Read");

    assert!(store.select_all_tools());
    assert_eq!(store.tool_dimension(), DimensionState::AllSelected);
    assert!(!store.select_all_tools(), "already all selected");
}

#[test]
fn select_all_roles_is_per_dimension() {
    let mut store = FilterStateStore::from_records(&sample());
    store.toggle_role("user");
    store.toggle_tool("Bash");

    store.select_all_roles();

    assert_eq!(store.role_dimension(), DimensionState::AllSelected);
    assert_eq!(
        store.tool_dimension(),
        DimensionState::PartialSelection { selected: 1 }
    );
}

// ===== Search and clear-all =====

#[test]
fn search_text_breaks_everything_visible() {
    let mut store = FilterStateStore::from_records(&sample());

    assert!(store.set_search_text("bash"));
    assert!(!store.is_everything_visible());
    assert_eq!(store.snapshot().search_text(), "bash");
    assert!(!store.set_search_text("bash"), "same text is not a change");
}

#[test]
fn clear_all_filters_resets_everything() {
    let mut store = FilterStateStore::from_records(&sample());
    store.toggle_role("user");
    store.toggle_tool("Read");
    store.set_search_text("x");

    assert!(store.clear_all_filters());

    assert!(store.is_everything_visible());
    assert_eq!(store.search_text(), "");
}

#[test]
fn clear_all_filters_is_idempotent() {
    let mut store = FilterStateStore::from_records(&sample());
    store.toggle_role("assistant");
    store.set_search_text("hello");

    store.clear_all_filters();
    let once = store.snapshot().clone();
    let version = store.version();

    assert!(!store.clear_all_filters());
    assert_eq!(store.snapshot(), &once);
    assert_eq!(store.version(), version);
}

#[test]
fn version_bumps_only_on_effective_change() {
    let mut store = FilterStateStore::from_records(&sample());
    let v0 = store.version();

    store.toggle_role("user");
    assert_eq!(store.version(), v0 + 1);
    store.set_search_text("");
    assert_eq!(store.version(), v0 + 1);
}

// ===== Record-array changes =====

#[test]
fn appended_unseen_role_is_selected_automatically() {
    let mut records = sample();
    let mut store = FilterStateStore::from_records(&records);
    assert!(store.is_everything_visible());

    let appended = vec![text_record("u4", "system", "init")];
    assert!(store.observe_appended(&appended));
    records.extend(appended);

    assert!(store.available_roles().contains("system"));
    assert!(store.selected_roles().contains("system"));
    assert!(store.is_everything_visible());
    assert_eq!(store.role_counts().get("system"), Some(&1));
}

#[test]
fn appended_known_role_only_updates_counts() {
    let mut store = FilterStateStore::from_records(&sample());
    let version = store.version();

    assert!(!store.observe_appended(&[text_record("u9", "user", "again")]));
    assert_eq!(store.version(), version);
    assert_eq!(store.role_counts().get("user"), Some(&2));
}

#[test]
fn appended_category_is_added_to_partial_selection() {
    let mut store = FilterStateStore::from_records(&sample());
    store.toggle_tool("Bash");

    store.observe_appended(&[tool_record("u5", "assistant", &["Grep"])]);

    assert!(store.selected_tools().contains("Grep"));
    assert!(!store.selected_tools().contains("Bash"));
}

#[test]
fn replacement_prunes_vanished_categories() {
    let mut store = FilterStateStore::from_records(&sample());
    store.toggle_role("user");

    store.sync_available(&[text_record("n0", "assistant", "only me")]);

    assert_eq!(ids(store.available_roles()), vec!["assistant"]);
    assert_eq!(ids(store.selected_roles()), vec!["assistant"]);
    assert!(store.available_tools().is_empty());
    assert!(store.is_everything_visible());
}

#[test]
fn empty_store_is_everything_visible() {
    let store = FilterStateStore::new();
    assert!(store.is_everything_visible());
    assert_eq!(store.version(), 0);
}
