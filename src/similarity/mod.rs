//! Graph similarity.
//!
//! - [`SimilarityComparator`]: exact value, containment and size similarity
//! - [`SparseProjectionComparator`]: approximate L1 distance of random projections
//! - [`CorpusAnalyzer`]: all-pairs similarity and near-duplicate detection

mod value;
pub mod projection;
pub mod corpus;

pub use value::{level_importance, similarity, GraphSimilarity, SimilarityComparator};
pub use projection::{ProjectionConfig, SparseProjectionComparator};
pub use corpus::{CorpusAnalyzer, CorpusReport, NearDuplicatePair, SimilarityMatrix};
