//! Graph data structures.
//!
//! - [`UniqueGraph`]: one level, label-unique vertices over an interning arena
//! - [`EdgeLocatorCache`]: per-head snapshots of outgoing edges
//! - [`NGramGraph`]: one `UniqueGraph` per n-gram size plus degradation counters
//! - [`SharedGraph`]: lock-guarded `UniqueGraph` for cross-thread mutation

pub mod unique;
pub mod cache;
pub mod multi;
pub mod shared;

pub use unique::UniqueGraph;
pub use cache::{CacheConfig, CacheStats, EdgeLocatorCache, DEFAULT_CACHE_ENTRIES};
pub use multi::{DegradedEdge, NGramGraph};
pub use shared::SharedGraph;
