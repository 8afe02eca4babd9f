//! Mutable owner of role/tool selections and search text.
//!
//! The store derives its available roles and tools from the live record
//! array. Identifiers that appear for the first time are selected
//! automatically, so "everything visible" survives record-array growth.
//! Each effective mutation bumps [`FilterStateStore::version`] and rebuilds
//! the [`FilterState`] snapshot.

use crate::filter::state::{FilterState, Selection};
use crate::model::{Record, ToolName};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

// ===== DimensionState =====

/// Selection state machine of one dimension.
///
/// `PartialSelection { selected: 0 }` is the explicit "show nothing" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionState {
    /// Every available id is selected.
    AllSelected,
    /// Some or none of the available ids are selected.
    PartialSelection {
        /// Number of selected ids.
        selected: usize,
    },
}

#[derive(Debug, Clone, Default)]
struct Dimension {
    available: BTreeSet<String>,
    selected: BTreeSet<String>,
    counts: BTreeMap<String, usize>,
}

impl Dimension {
    /// Replace counts wholesale. Returns whether the selection changed.
    fn reset(&mut self, counts: BTreeMap<String, usize>) -> bool {
        let before = self.selected.clone();
        self.counts = counts;
        let available: BTreeSet<String> = self.counts.keys().cloned().collect();
        for id in available.difference(&self.available) {
            self.selected.insert(id.clone());
        }
        self.selected.retain(|id| available.contains(id));
        self.available = available;
        self.selected != before
    }

    /// Add counts for appended records. Returns whether the selection changed.
    fn absorb(&mut self, counts: BTreeMap<String, usize>) -> bool {
        let mut changed = false;
        for (id, n) in counts {
            if self.available.insert(id.clone()) {
                changed |= self.selected.insert(id.clone());
            }
            *self.counts.entry(id).or_insert(0) += n;
        }
        changed
    }

    fn toggle(&mut self, id: &str) -> bool {
        if !self.available.contains(id) {
            return false;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
        true
    }

    fn select_all(&mut self) -> bool {
        if self.selected == self.available {
            return false;
        }
        self.selected = self.available.clone();
        true
    }

    fn is_all(&self) -> bool {
        self.selected == self.available
    }

    fn state(&self) -> DimensionState {
        if self.is_all() {
            DimensionState::AllSelected
        } else {
            DimensionState::PartialSelection {
                selected: self.selected.len(),
            }
        }
    }
}

/// Per-category record counts over an unfiltered slice.
fn count_categories(records: &[Record]) -> (BTreeMap<String, usize>, BTreeMap<String, usize>) {
    let mut roles = BTreeMap::new();
    let mut tools = BTreeMap::new();
    for record in records {
        if let Ok(role) = record.role() {
            *roles.entry(role.as_str().to_string()).or_insert(0) += 1;
        }
        if let Ok(names) = record.tool_names() {
            for name in names.iter().map(ToolName::as_str) {
                *tools.entry(name.to_string()).or_insert(0) += 1;
            }
        }
    }
    (roles, tools)
}

// ===== FilterStateStore =====

/// Owns the mutable filter selections and produces [`FilterState`] snapshots.
#[derive(Debug, Clone)]
pub struct FilterStateStore {
    roles: Dimension,
    tools: Dimension,
    search_text: String,
    version: u64,
    snapshot: FilterState,
}

impl FilterStateStore {
    /// Store over an empty record array.
    pub fn new() -> Self {
        let mut store = Self {
            roles: Dimension::default(),
            tools: Dimension::default(),
            search_text: String::new(),
            version: 0,
            snapshot: FilterState::default(),
        };
        store.snapshot = store.build_snapshot();
        store
    }

    /// Store with every role and tool present in `records` selected.
    pub fn from_records(records: &[Record]) -> Self {
        let mut store = Self::new();
        store.sync_available(records);
        store
    }

    /// Recompute available categories from a replaced record array.
    ///
    /// New identifiers are selected; identifiers no longer present are
    /// dropped from the selection. Returns whether the snapshot changed.
    pub fn sync_available(&mut self, records: &[Record]) -> bool {
        let (roles, tools) = count_categories(records);
        let changed = self.roles.reset(roles) | self.tools.reset(tools);
        self.commit_if(changed)
    }

    /// Account for records appended to the current array.
    pub fn observe_appended(&mut self, appended: &[Record]) -> bool {
        let (roles, tools) = count_categories(appended);
        let changed = self.roles.absorb(roles) | self.tools.absorb(tools);
        if changed {
            debug!("New categories discovered in appended records");
        }
        self.commit_if(changed)
    }

    /// Flip one role. Unknown roles are ignored.
    pub fn toggle_role(&mut self, id: &str) -> bool {
        let changed = self.roles.toggle(id);
        self.commit_if(changed)
    }

    /// Flip one tool. Unknown tools are ignored.
    pub fn toggle_tool(&mut self, id: &str) -> bool {
        let changed = self.tools.toggle(id);
        self.commit_if(changed)
    }

    /// Select every available role.
    pub fn select_all_roles(&mut self) -> bool {
        let changed = self.roles.select_all();
        self.commit_if(changed)
    }

    /// Select every available tool.
    pub fn select_all_tools(&mut self) -> bool {
        let changed = self.tools.select_all();
        self.commit_if(changed)
    }

    /// Restore the "everything visible" state: all categories, no search.
    pub fn clear_all_filters(&mut self) -> bool {
        let mut changed = self.roles.select_all() | self.tools.select_all();
        if !self.search_text.is_empty() {
            self.search_text.clear();
            changed = true;
        }
        self.commit_if(changed)
    }

    /// Replace the search text.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.search_text {
            return false;
        }
        self.search_text = text;
        self.commit_if(true)
    }

    // ===== Read views =====

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> &FilterState {
        &self.snapshot
    }

    /// Incremented on every effective mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Currently selected roles.
    pub fn selected_roles(&self) -> &BTreeSet<String> {
        &self.roles.selected
    }

    /// Currently selected tools.
    pub fn selected_tools(&self) -> &BTreeSet<String> {
        &self.tools.selected
    }

    /// Active search text.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Roles present in the records.
    pub fn available_roles(&self) -> &BTreeSet<String> {
        &self.roles.available
    }

    /// Tools present in the records.
    pub fn available_tools(&self) -> &BTreeSet<String> {
        &self.tools.available
    }

    /// Records per role over the entire unfiltered array.
    pub fn role_counts(&self) -> &BTreeMap<String, usize> {
        &self.roles.counts
    }

    /// Records carrying each tool over the entire unfiltered array.
    pub fn tool_counts(&self) -> &BTreeMap<String, usize> {
        &self.tools.counts
    }

    /// Selection state of the role dimension.
    pub fn role_dimension(&self) -> DimensionState {
        self.roles.state()
    }

    /// Selection state of the tool dimension.
    pub fn tool_dimension(&self) -> DimensionState {
        self.tools.state()
    }

    /// True iff no search text and every available role and tool is selected.
    pub fn is_everything_visible(&self) -> bool {
        self.search_text.is_empty() && self.roles.is_all() && self.tools.is_all()
    }

    fn build_snapshot(&self) -> FilterState {
        FilterState::new(
            Selection::Only(self.roles.selected.clone()),
            Selection::Only(self.tools.selected.clone()),
            self.search_text.clone(),
        )
    }

    fn commit_if(&mut self, changed: bool) -> bool {
        if changed {
            self.version += 1;
            self.snapshot = self.build_snapshot();
            debug!(
                version = self.version,
                roles = self.roles.selected.len(),
                tools = self.tools.selected.len(),
                everything_visible = self.is_everything_visible(),
                "Filter state updated"
            );
        }
        changed
    }
}

impl Default for FilterStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
