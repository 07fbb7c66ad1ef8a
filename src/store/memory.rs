//! In-memory object store for testing and embedding.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::ObjectStore;

/// Error type for in-memory store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InMemoryError {
    /// Name or category is empty.
    #[error("Blob key has an empty {0}")]
    EmptyKey(&'static str),
}

/// In-memory object store.
///
/// Uses a BTreeMap for deterministic listing order.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    /// Blobs by (category, name).
    blobs: RwLock<BTreeMap<(String, String), Vec<u8>>>,
}

impl InMemoryObjectStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Remove a blob, returning it.
    pub fn remove(&self, name: &str, category: &str) -> Option<Vec<u8>> {
        self.blobs
            .write()
            .remove(&(category.to_string(), name.to_string()))
    }

    /// Replace a stored blob without validation.
    pub fn overwrite(&self, name: &str, category: &str, blob: Vec<u8>) {
        self.blobs
            .write()
            .insert((category.to_string(), name.to_string()), blob);
    }
}

fn check_key(name: &str, category: &str) -> Result<(), InMemoryError> {
    if name.is_empty() {
        return Err(InMemoryError::EmptyKey("name"));
    }
    if category.is_empty() {
        return Err(InMemoryError::EmptyKey("category"));
    }
    Ok(())
}

impl ObjectStore for InMemoryObjectStore {
    type Error = InMemoryError;

    fn save(&self, name: &str, category: &str, blob: &[u8]) -> Result<(), Self::Error> {
        check_key(name, category)?;
        self.overwrite(name, category, blob.to_vec());
        Ok(())
    }

    fn load(&self, name: &str, category: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        check_key(name, category)?;
        Ok(self.blobs
            .read()
            .get(&(category.to_string(), name.to_string()))
            .cloned())
    }

    fn exists(&self, name: &str, category: &str) -> Result<bool, Self::Error> {
        check_key(name, category)?;
        Ok(self.blobs
            .read()
            .contains_key(&(category.to_string(), name.to_string())))
    }

    fn list(&self, category: &str) -> Result<Vec<String>, Self::Error> {
        Ok(self.blobs
            .read()
            .keys()
            .filter(|(c, _)| c == category)
            .map(|(_, name)| name.clone())
            .collect())
    }
}
