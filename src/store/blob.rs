//! Graph blob envelope.
//!
//! Graphs are stored as JSON:
//!
//! ```text
//! { "schema_version": 1, "content_hash": "<sha256 hex of source text>", "graph": { .. } }
//! ```
//!
//! Loading checks the schema version and recomputes the content hash from
//! the embedded source text.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ObjectStore;
use crate::graph::NGramGraph;
use crate::GRAPH_SCHEMA_VERSION;

/// Category under which graphs are stored.
pub const GRAPH_CATEGORY: &str = "ngram_graph";

/// Errors from graph persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No blob under this key.
    #[error("No graph named {name:?} in category {category:?}")]
    NotFound {
        /// Requested name.
        name: String,
        /// Requested category.
        category: String,
    },
    /// Blob is not a valid graph envelope.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Embedded text does not match the recorded hash.
    #[error("Content hash mismatch: expected {expected}, computed {computed}")]
    ContentHashMismatch {
        /// Hash recorded in the envelope.
        expected: String,
        /// Hash of the embedded source text.
        computed: String,
    },
    /// Envelope written by an incompatible version.
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaMismatch {
        /// Version this build reads.
        expected: u32,
        /// Version found in the envelope.
        found: u32,
    },
    /// Underlying store failed.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// SHA-256 of the source text as 64 lowercase hex characters.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Persisted form of a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphBlob {
    /// Envelope schema version.
    pub schema_version: u32,
    /// SHA-256 of `graph`'s source text.
    pub content_hash: String,
    /// The graph.
    pub graph: NGramGraph,
}

impl GraphBlob {
    /// Wrap a graph.
    pub fn new(graph: NGramGraph) -> Self {
        Self {
            schema_version: GRAPH_SCHEMA_VERSION,
            content_hash: content_hash(graph.data_string()),
            graph,
        }
    }

    /// Check the schema version and content hash.
    pub fn verify(&self) -> Result<(), StoreError> {
        if self.schema_version != GRAPH_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                expected: GRAPH_SCHEMA_VERSION,
                found: self.schema_version,
            });
        }
        let computed = content_hash(self.graph.data_string());
        if computed != self.content_hash {
            return Err(StoreError::ContentHashMismatch {
                expected: self.content_hash.clone(),
                computed,
            });
        }
        Ok(())
    }
}

/// Stores graphs in an [`ObjectStore`] under [`GRAPH_CATEGORY`].
#[derive(Debug)]
pub struct GraphRepository<S> {
    store: S,
}

impl<S: ObjectStore> GraphRepository<S> {
    /// Create a repository over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save `graph` as `name`, replacing any previous graph.
    pub fn save_graph(&self, name: &str, graph: &NGramGraph) -> Result<(), StoreError> {
        let blob = GraphBlob::new(graph.clone());
        let bytes = serde_json::to_vec(&blob)?;
        self.store
            .save(name, GRAPH_CATEGORY, &bytes)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::debug!(
            name,
            bytes = bytes.len(),
            content_hash = %blob.content_hash,
            "Saved graph"
        );
        Ok(())
    }

    /// Load and verify the graph saved as `name`.
    pub fn load_graph(&self, name: &str) -> Result<NGramGraph, StoreError> {
        let bytes = self
            .store
            .load(name, GRAPH_CATEGORY)
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
                category: GRAPH_CATEGORY.to_string(),
            })?;
        let blob: GraphBlob = serde_json::from_slice(&bytes)?;
        blob.verify()?;
        Ok(blob.graph)
    }

    /// Check whether a graph named `name` exists.
    pub fn exists(&self, name: &str) -> Result<bool, StoreError> {
        self.store
            .exists(name, GRAPH_CATEGORY)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Names of stored graphs, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        self.store
            .list(GRAPH_CATEGORY)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Unwrap the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryObjectStore;

    fn repo() -> GraphRepository<InMemoryObjectStore> {
        GraphRepository::new(InMemoryObjectStore::new())
    }

    #[test]
    fn test_content_hash() {
        let h = content_hash("ACTAGT");
        assert_eq!(h.len(), 64);
        assert_eq!(h, content_hash("ACTAGT"));
        assert_ne!(h, content_hash("ACTAGA"));
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_roundtrip() {
        let repo = repo();
        let g = NGramGraph::with_params("ACTAGTACGT", 2, 4, 3).unwrap();

        repo.save_graph("doc", &g).unwrap();
        assert!(repo.exists("doc").unwrap());
        assert_eq!(repo.list().unwrap(), vec!["doc"]);

        let back = repo.load_graph("doc").unwrap();
        assert_eq!(back, g);
        assert_eq!(back.data_string(), g.data_string());
    }

    #[test]
    fn test_missing_graph() {
        let err = repo().load_graph("nope").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_tampered_text_detected() {
        let repo = repo();
        let g = NGramGraph::with_params("ACTAGT", 3, 3, 3).unwrap();
        let mut blob = GraphBlob::new(g);
        blob.graph.set_data_string("ACTAGA");
        repo.store()
            .overwrite("doc", GRAPH_CATEGORY, serde_json::to_vec(&blob).unwrap());

        let err = repo.load_graph("doc").unwrap_err();
        assert!(matches!(err, StoreError::ContentHashMismatch { .. }));
    }

    #[test]
    fn test_schema_mismatch() {
        let repo = repo();
        let mut blob = GraphBlob::new(NGramGraph::with_params("ACTAGT", 3, 3, 3).unwrap());
        blob.schema_version = GRAPH_SCHEMA_VERSION + 1;
        repo.store()
            .overwrite("doc", GRAPH_CATEGORY, serde_json::to_vec(&blob).unwrap());

        let err = repo.load_graph("doc").unwrap_err();
        assert!(matches!(err, StoreError::SchemaMismatch { found, .. } if found == GRAPH_SCHEMA_VERSION + 1));
    }

    #[test]
    fn test_garbage_blob() {
        let repo = repo();
        repo.store().overwrite("doc", GRAPH_CATEGORY, b"not json".to_vec());
        assert!(matches!(repo.load_graph("doc"), Err(StoreError::Serialization(_))));
    }
}
