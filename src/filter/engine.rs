//! Single-pass filtering with bidirectional index mapping.
//!
//! [`FilteringEngine::process_messages`] is the only place that decides record
//! visibility. The visible list and both index mappings are produced by the
//! same loop, so navigation can never disagree with display.

use crate::filter::cache::{CacheStats, ContentCache};
use crate::filter::state::FilterState;
use crate::model::{Record, RecordError, ToolName};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, warn};

/// Default number of extraction errors retained by the engine.
pub const DEFAULT_ERROR_LOG_CAPACITY: usize = 1000;

// ===== Verdict =====

/// Outcome of evaluating one record against a [`FilterState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Record passes every dimension.
    Included,
    /// Role not selected.
    HiddenByRole,
    /// Carries tools, none selected.
    HiddenByTool,
    /// Searchable text lacks the needle.
    HiddenBySearch,
}

/// Evaluate one record: role, then tools, then search text.
///
/// `needle` is the search text already lowercased; empty means no search.
/// The cache is consulted only when the role and tool checks pass and a
/// search is active.
///
/// A tool selection only constrains records that carry tool tags; plain
/// text records are governed by their role alone.
///
/// # Errors
///
/// Returns the extraction error for malformed records.
pub fn evaluate(
    record: &Record,
    state: &FilterState,
    needle: &str,
    cache: &mut ContentCache,
) -> Result<Verdict, RecordError> {
    let role = record.role()?;
    if !state.roles().allows(role.as_str()) {
        return Ok(Verdict::HiddenByRole);
    }

    let tools = record.tool_names()?;
    if !tools.is_empty() && !state.tools().allows_any(tools.iter().map(ToolName::as_str)) {
        return Ok(Verdict::HiddenByTool);
    }

    if !needle.is_empty() && !cache.searchable_text(record).contains(needle) {
        return Ok(Verdict::HiddenBySearch);
    }

    Ok(Verdict::Included)
}

/// Yes/no visibility of a single record, without a full pass.
///
/// Malformed records are never included.
pub fn should_include_message(
    record: &Record,
    state: &FilterState,
    cache: &mut ContentCache,
) -> bool {
    let needle = state.search_text().to_lowercase();
    matches!(
        evaluate(record, state, &needle, cache),
        Ok(Verdict::Included)
    )
}

// ===== IndexMapping =====

/// Bidirectional translation between original and filtered positions.
///
/// `filtered_to_original` is strictly increasing. `original_to_filtered` has
/// one slot per original record, `None` for excluded ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMapping {
    filtered_to_original: Vec<usize>,
    original_to_filtered: Vec<Option<usize>>,
}

impl IndexMapping {
    fn with_capacity(n: usize) -> Self {
        Self {
            filtered_to_original: Vec::with_capacity(n),
            original_to_filtered: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, included: bool) {
        let original = self.original_to_filtered.len();
        if included {
            self.original_to_filtered
                .push(Some(self.filtered_to_original.len()));
            self.filtered_to_original.push(original);
        } else {
            self.original_to_filtered.push(None);
        }
    }

    /// Original position of the record shown at `filtered`.
    ///
    /// Accepts any integer type; negative or out-of-range input yields `None`.
    pub fn original_index<I: TryInto<usize>>(&self, filtered: I) -> Option<usize> {
        let filtered = filtered.try_into().ok()?;
        self.filtered_to_original.get(filtered).copied()
    }

    /// Filtered position of the record at `original`.
    ///
    /// `None` for negative or out-of-range input and for excluded records.
    pub fn filtered_index<I: TryInto<usize>>(&self, original: I) -> Option<usize> {
        let original = original.try_into().ok()?;
        self.original_to_filtered.get(original).copied().flatten()
    }

    /// Number of visible records.
    pub fn len(&self) -> usize {
        self.filtered_to_original.len()
    }

    /// Whether no record is visible.
    pub fn is_empty(&self) -> bool {
        self.filtered_to_original.is_empty()
    }

    /// Number of records in the unfiltered array.
    pub fn original_len(&self) -> usize {
        self.original_to_filtered.len()
    }

    /// Original index of each visible record, strictly increasing.
    pub fn filtered_to_original(&self) -> &[usize] {
        &self.filtered_to_original
    }

    /// Filtered index per original record, `None` when hidden.
    pub fn original_to_filtered(&self) -> &[Option<usize>] {
        &self.original_to_filtered
    }
}

// ===== FilterStats =====

/// Per-pass counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Records examined.
    pub total: usize,
    /// Records included.
    pub visible: usize,
    /// Records rejected by the role selection.
    pub hidden_by_role: usize,
    /// Records rejected by the tool selection.
    pub hidden_by_tool: usize,
    /// Records rejected by the search text.
    pub hidden_by_search: usize,
    /// Malformed records, always excluded.
    pub malformed: usize,
}

impl FilterStats {
    fn record(&mut self, verdict: Result<Verdict, ()>) {
        self.total += 1;
        match verdict {
            Ok(Verdict::Included) => self.visible += 1,
            Ok(Verdict::HiddenByRole) => self.hidden_by_role += 1,
            Ok(Verdict::HiddenByTool) => self.hidden_by_tool += 1,
            Ok(Verdict::HiddenBySearch) => self.hidden_by_search += 1,
            Err(()) => self.malformed += 1,
        }
    }
}

// ===== FilteredResult =====

/// Output of one filtering pass.
///
/// `filtered_records()[f]` is the same reference as
/// `records[mapping().original_index(f)]`.
#[derive(Debug, Clone)]
pub struct FilteredResult<'a> {
    filtered_records: Vec<&'a Record>,
    mapping: IndexMapping,
    stats: FilterStats,
}

impl<'a> FilteredResult<'a> {
    /// Visible records in original order.
    pub fn filtered_records(&self) -> &[&'a Record] {
        &self.filtered_records
    }

    /// Index translation for this pass.
    pub fn mapping(&self) -> &IndexMapping {
        &self.mapping
    }

    /// Counters for this pass.
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Number of visible records.
    pub fn len(&self) -> usize {
        self.filtered_records.len()
    }

    /// Whether no record is visible.
    pub fn is_empty(&self) -> bool {
        self.filtered_records.is_empty()
    }

    /// Original index of visible position `filtered`.
    pub fn original_index<I: TryInto<usize>>(&self, filtered: I) -> Option<usize> {
        self.mapping.original_index(filtered)
    }

    /// Visible position of original index `original`, if shown.
    pub fn filtered_index<I: TryInto<usize>>(&self, original: I) -> Option<usize> {
        self.mapping.filtered_index(original)
    }

    /// Drop the record borrows, keeping the mapping and stats.
    pub fn into_parts(self) -> (IndexMapping, FilterStats) {
        (self.mapping, self.stats)
    }
}

// ===== FilteringEngine =====

/// Owns the content cache and the extraction error log.
#[derive(Debug)]
pub struct FilteringEngine {
    cache: ContentCache,
    errors: VecDeque<RecordError>,
    error_log_capacity: usize,
}

impl FilteringEngine {
    /// Engine over `cache`, retaining at most `error_log_capacity` errors (minimum 1).
    pub fn new(cache: ContentCache, error_log_capacity: usize) -> Self {
        Self {
            cache,
            errors: VecDeque::new(),
            error_log_capacity: error_log_capacity.max(1),
        }
    }

    /// Run one filtering pass over `records`.
    ///
    /// O(n). Never fails: malformed records are excluded and logged.
    pub fn process_messages<'a>(
        &mut self,
        records: &'a [Record],
        state: &FilterState,
    ) -> FilteredResult<'a> {
        let start = Instant::now();
        let needle = state.search_text().to_lowercase();
        let mut filtered_records = Vec::with_capacity(records.len());
        let mut mapping = IndexMapping::with_capacity(records.len());
        let mut stats = FilterStats::default();

        for record in records {
            let verdict = match evaluate(record, state, &needle, &mut self.cache) {
                Ok(verdict) => Ok(verdict),
                Err(err) => {
                    self.log_error(err);
                    Err(())
                }
            };
            let included = verdict == Ok(Verdict::Included);
            if included {
                filtered_records.push(record);
            }
            mapping.push(included);
            stats.record(verdict);
        }

        if stats.malformed > 0 {
            warn!(
                malformed = stats.malformed,
                "Excluded records whose role or tools could not be read"
            );
        }
        debug!(
            total = stats.total,
            visible = stats.visible,
            search = !needle.is_empty(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Filter pass complete"
        );

        FilteredResult {
            filtered_records,
            mapping,
            stats,
        }
    }

    /// Single-record visibility using this engine's cache.
    pub fn should_include(&mut self, record: &Record, state: &FilterState) -> bool {
        should_include_message(record, state, &mut self.cache)
    }

    /// Cached searchable text, for highlighting and other ad-hoc consumers.
    pub fn searchable_text(&mut self, record: &Record) -> &str {
        self.cache.searchable_text(record)
    }

    /// The searchable-text cache.
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Mutable access to the cache, e.g. to invalidate an entry.
    pub fn cache_mut(&mut self) -> &mut ContentCache {
        &mut self.cache
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Extraction errors, oldest first.
    pub fn errors(&self) -> impl Iterator<Item = &RecordError> {
        self.errors.iter()
    }

    /// Number of retained extraction errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Forget all retained extraction errors.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    fn log_error(&mut self, err: RecordError) {
        if self.errors.len() == self.error_log_capacity {
            self.errors.pop_front();
        }
        self.errors.push_back(err);
    }
}

impl Default for FilteringEngine {
    fn default() -> Self {
        Self::new(ContentCache::default(), DEFAULT_ERROR_LOG_CAPACITY)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
