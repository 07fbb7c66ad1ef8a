//! Persistence and ingestion collaborators.
//!
//! The core hands serialized graphs to an [`ObjectStore`] as opaque blobs
//! keyed by `(name, category)` and reads corpora through a [`LineLoader`].
//! [`GraphRepository`] wraps a store with the graph blob envelope.

pub mod memory;
pub mod blob;
pub mod lines;

/// Opaque blob persistence keyed by name and category.
///
/// Implementations must return `list` results in a deterministic order.
pub trait ObjectStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store `blob` under `(name, category)`, replacing any previous blob.
    fn save(&self, name: &str, category: &str, blob: &[u8]) -> Result<(), Self::Error>;

    /// Fetch the blob stored under `(name, category)`.
    fn load(&self, name: &str, category: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Check whether a blob exists under `(name, category)`.
    fn exists(&self, name: &str, category: &str) -> Result<bool, Self::Error>;

    /// Names stored in `category`, sorted.
    fn list(&self, category: &str) -> Result<Vec<String>, Self::Error>;
}

/// Ordered, finite sequence of lines from some source.
pub trait LineLoader {
    /// Error type for reading lines.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read every line, in order.
    fn load_lines(&mut self) -> Result<Vec<String>, Self::Error>;
}

pub use memory::{InMemoryError, InMemoryObjectStore};
pub use blob::{content_hash, GraphBlob, GraphRepository, StoreError, GRAPH_CATEGORY};
pub use lines::{build_corpus, CorpusError, ReaderLineLoader, StaticLines};
