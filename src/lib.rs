//! # ngram-graph
//!
//! Character n-gram graphs and the algebra over them.
//!
//! A text becomes one directed, weighted graph per n-gram size: vertices
//! are the n-grams, edges record that two n-grams occurred within a
//! correlation window of each other. Graphs can then be merged,
//! intersected, diffed, pruned, encoded canonically and compared.
//!
//! ## Architecture
//!
//! ```text
//! text → GraphBuilder(WindowPolicy) → NGramGraph { UniqueGraph per n }
//!                                          ↓
//!                 algebra / canonical / dfs_code / similarity / export
//!                                          ↓
//!                          GraphRepository → ObjectStore
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same text + same config → structurally equal graphs
//! - Canonical codes and fingerprints depend only on labels and weights,
//!   never on insertion order
//! - Projection matrices are drawn from a seeded RNG
//!
//! ## Example
//!
//! ```rust
//! use ngram_graph::{NGramGraph, similarity};
//!
//! let a = NGramGraph::with_params("ACTAGT", 3, 3, 3).unwrap();
//! let b = NGramGraph::with_params("ACTACTA", 3, 3, 3).unwrap();
//!
//! assert_eq!(a.level(3).unwrap().edge_weight("CTA", "ACT"), Some(1.0));
//! assert!(similarity(&a, &b).overall() < 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod graph;
pub mod builder;
pub mod algebra;
pub mod canonical;
pub mod dfs_code;
pub mod similarity;
pub mod export;
pub mod store;
pub mod logging;

// Re-exports
pub use types::{Edge, EdgeKey, EdgeRef, VertexId};
pub use policy::{ConfigError, GraphConfig, WindowPolicy};
pub use graph::{
    CacheConfig, CacheStats, DegradedEdge, EdgeLocatorCache, NGramGraph, SharedGraph,
    UniqueGraph,
};
pub use builder::{extract_ngrams, GraphBuilder};
pub use algebra::{
    all_not_in, coexistence_importance, degrade, intersect, intersect_and_delta,
    inverse_intersect, merge, prune, prune_in_place, representative,
};
pub use canonical::{
    canonical_code, canonical_hash, canonical_hash_hex, canonical_lines,
    compare_canonical_codes, graph_fingerprint, to_canonical_bytes, CanonicalCodeLines,
};
pub use dfs_code::{dfs_code, dfs_code_from, DfsCode};
pub use similarity::{
    level_importance, similarity, CorpusAnalyzer, CorpusReport, GraphSimilarity,
    NearDuplicatePair, ProjectionConfig, SimilarityComparator, SimilarityMatrix,
    SparseProjectionComparator,
};
pub use export::{level_to_dot, to_dot, DotStyle};
pub use store::{
    build_corpus, GraphBlob, GraphRepository, InMemoryObjectStore, LineLoader, ObjectStore,
    StoreError,
};
pub use logging::{init_tracing, LogFormat};

/// Schema version of persisted graph blobs.
/// Increment on breaking changes to any serialized type.
pub const GRAPH_SCHEMA_VERSION: u32 = 1;
