//! Record filtering and searchable-text caching (pure core).
//!
//! - [`cache`]: bounded searchable-text cache with batch LRU eviction
//! - [`state`]: immutable filter snapshots
//! - [`engine`]: single-pass filtering and index translation
//! - [`store`]: mutable selections and the "everything visible" flag
//! - [`debounce`]: cancellable scheduled search input
//! - [`session`]: ties the above together with explicit recomputation

pub mod cache;
pub mod debounce;
pub mod engine;
pub mod session;
pub mod state;
pub mod store;

pub use cache::{CacheKey, CacheStats, ContentCache, ContentCacheConfig};
pub use debounce::SearchDebouncer;
pub use engine::{
    should_include_message, FilterStats, FilteredResult, FilteringEngine, IndexMapping, Verdict,
};
pub use session::{FilterSession, SessionConfig};
pub use state::{FilterState, Selection};
pub use store::{DimensionState, FilterStateStore};
