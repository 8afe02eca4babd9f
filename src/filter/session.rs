//! Explicit recompute-on-mutation controller.
//!
//! [`FilterSession`] owns the record array, the [`FilterStateStore`], the
//! [`FilteringEngine`] and the search debouncer. It remembers which records
//! version and state version produced the current mapping; every mutation
//! calls [`FilterSession::refresh`], which recomputes only when stale.

use crate::filter::cache::{CacheStats, ContentCache, DEFAULT_CACHE_CAPACITY};
use crate::filter::debounce::{SearchDebouncer, DEFAULT_SEARCH_DEBOUNCE_MS};
use crate::filter::engine::{
    FilterStats, FilteringEngine, IndexMapping, DEFAULT_ERROR_LOG_CAPACITY,
};
use crate::filter::store::FilterStateStore;
use crate::model::{Record, RecordError};
use std::time::{Duration, Instant};
use tracing::info;

/// Tunables for a [`FilterSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Searchable-text cache capacity; 0 selects the default.
    pub cache_capacity: usize,
    /// Quiet period before typed search applies.
    pub search_debounce: Duration,
    /// Retained extraction errors.
    pub error_log_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            error_log_capacity: DEFAULT_ERROR_LOG_CAPACITY,
        }
    }
}

/// Records, filter state and the last filtering result, kept in sync.
#[derive(Debug)]
pub struct FilterSession {
    records: Vec<Record>,
    records_version: u64,
    store: FilterStateStore,
    engine: FilteringEngine,
    debouncer: SearchDebouncer,
    mapping: IndexMapping,
    stats: FilterStats,
    /// (records_version, state_version) of the current mapping.
    computed_at: Option<(u64, u64)>,
}

impl FilterSession {
    /// Empty session with the given tunables.
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            records: Vec::new(),
            records_version: 0,
            store: FilterStateStore::new(),
            engine: FilteringEngine::new(
                ContentCache::new(config.cache_capacity),
                config.error_log_capacity,
            ),
            debouncer: SearchDebouncer::new(config.search_debounce),
            mapping: IndexMapping::default(),
            stats: FilterStats::default(),
            computed_at: None,
        };
        session.refresh();
        session
    }

    /// Replace the record array wholesale (one load event).
    ///
    /// Clears the content cache and the error log; keeps filter selections
    /// for categories still present.
    pub fn load(&mut self, records: Vec<Record>) {
        self.records = records;
        self.records_version += 1;
        self.engine.cache_mut().clear();
        self.engine.clear_errors();
        self.store.sync_available(&self.records);
        info!(records = self.records.len(), "Loaded record array");
        self.refresh();
    }

    /// Grow the record array without touching existing records.
    pub fn append(&mut self, records: Vec<Record>) {
        if records.is_empty() {
            return;
        }
        self.store.observe_appended(&records);
        self.records.extend(records);
        self.records_version += 1;
        self.refresh();
    }

    /// Recompute the mapping if records or filter state changed since the
    /// last pass. Returns whether a pass ran.
    pub fn refresh(&mut self) -> bool {
        if !self.is_stale() {
            return false;
        }
        let result = self
            .engine
            .process_messages(&self.records, self.store.snapshot());
        let (mapping, stats) = result.into_parts();
        self.mapping = mapping;
        self.stats = stats;
        self.computed_at = Some((self.records_version, self.store.version()));
        true
    }

    /// Whether the mapping predates the latest records or state.
    pub fn is_stale(&self) -> bool {
        self.computed_at != Some((self.records_version, self.store.version()))
    }

    // ===== Immediate mutations =====

    /// Flip one role, flushing pending search input first.
    pub fn toggle_role(&mut self, id: &str) -> bool {
        self.flush_pending_search();
        let changed = self.store.toggle_role(id);
        self.refresh();
        changed
    }

    /// Flip one tool, flushing pending search input first.
    pub fn toggle_tool(&mut self, id: &str) -> bool {
        self.flush_pending_search();
        let changed = self.store.toggle_tool(id);
        self.refresh();
        changed
    }

    /// Select every role.
    pub fn select_all_roles(&mut self) -> bool {
        self.flush_pending_search();
        let changed = self.store.select_all_roles();
        self.refresh();
        changed
    }

    /// Select every tool.
    pub fn select_all_tools(&mut self) -> bool {
        self.flush_pending_search();
        let changed = self.store.select_all_tools();
        self.refresh();
        changed
    }

    /// Reset to "everything visible". A pending search is discarded.
    pub fn clear_all_filters(&mut self) -> bool {
        self.debouncer.cancel();
        let changed = self.store.clear_all_filters();
        self.refresh();
        changed
    }

    /// Apply search text now, cancelling any pending debounced input.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        self.debouncer.cancel();
        let changed = self.store.set_search_text(text);
        self.refresh();
        changed
    }

    // ===== Debounced search =====

    /// Record a keystroke's search text; applied by [`tick`](Self::tick).
    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        self.debouncer.schedule(text, now);
    }

    /// Apply the pending search if due. Returns whether a pass ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(text) => {
                self.store.set_search_text(text);
                self.refresh()
            }
            None => false,
        }
    }

    /// Whether typed search text awaits its debounce.
    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When the pending search will apply.
    pub fn search_due_at(&self) -> Option<Instant> {
        self.debouncer.due_at()
    }

    /// Fold pending input into the state about to be produced, so the
    /// pending task never fires on its own.
    fn flush_pending_search(&mut self) {
        if let Some(text) = self.debouncer.take_pending() {
            self.store.set_search_text(text);
        }
    }

    // ===== Queries =====

    /// All records, visible or not.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Filter state store.
    pub fn store(&self) -> &FilterStateStore {
        &self.store
    }

    /// Current index mapping.
    pub fn mapping(&self) -> &IndexMapping {
        &self.mapping
    }

    /// Visible records in original order.
    pub fn filtered_records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.mapping
            .filtered_to_original()
            .iter()
            .filter_map(|&o| self.records.get(o))
    }

    /// Number of visible records.
    pub fn filtered_len(&self) -> usize {
        self.mapping.len()
    }

    /// Original index of visible position `filtered`.
    pub fn original_index<I: TryInto<usize>>(&self, filtered: I) -> Option<usize> {
        self.mapping.original_index(filtered)
    }

    /// Visible position of original index `original`, if shown.
    pub fn filtered_index<I: TryInto<usize>>(&self, original: I) -> Option<usize> {
        self.mapping.filtered_index(original)
    }

    /// Counters from the latest pass.
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.engine.cache_stats()
    }

    /// Retained extraction errors, oldest first.
    pub fn errors(&self) -> impl Iterator<Item = &RecordError> {
        self.engine.errors()
    }

    /// Cached searchable text of the record at `original`.
    pub fn searchable_text(&mut self, original: usize) -> Option<&str> {
        let record = self.records.get(original)?;
        Some(self.engine.searchable_text(record))
    }
}

impl Default for FilterSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
