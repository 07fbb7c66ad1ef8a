//! Thread-shared graph.
//!
//! Each mutating call takes the write lock for its own duration only.
//! Sequences of calls are not atomic; a reader may observe a graph between
//! two of them. Hold [`SharedGraph::write`] for multi-step updates.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::graph::UniqueGraph;

/// A [`UniqueGraph`] behind `Arc<RwLock<_>>`. Cloning shares the graph.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<UniqueGraph>>,
}

impl SharedGraph {
    /// Wrap a graph.
    pub fn new(graph: UniqueGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Insert a vertex. Returns `false` if it already exists.
    pub fn add_vertex(&self, label: &str) -> bool {
        self.inner.write().add_vertex(label)
    }

    /// Insert an edge. Returns `false` if the ordered pair already exists.
    pub fn add_edge(&self, source: &str, target: &str, weight: f64) -> bool {
        self.inner.write().add_edge(source, target, weight)
    }

    /// Replace the weight of an existing edge.
    pub fn set_edge_weight(&self, source: &str, target: &str, weight: f64) -> bool {
        self.inner.write().set_edge_weight(source, target, weight)
    }

    /// Add to an edge's weight, inserting it if absent.
    pub fn increment_edge_weight(&self, source: &str, target: &str, delta: f64) -> f64 {
        self.inner.write().increment_edge_weight(source, target, delta)
    }

    /// Remove an edge.
    pub fn remove_edge(&self, source: &str, target: &str) -> Option<f64> {
        self.inner.write().remove_edge(source, target)
    }

    /// Read access for the duration of the guard.
    pub fn read(&self) -> RwLockReadGuard<'_, UniqueGraph> {
        self.inner.read()
    }

    /// Exclusive access for the duration of the guard.
    pub fn write(&self) -> RwLockWriteGuard<'_, UniqueGraph> {
        self.inner.write()
    }

    /// Deep copy of the current state.
    pub fn snapshot(&self) -> UniqueGraph {
        self.inner.read().clone()
    }

    /// Unwrap the graph if this is the last handle, otherwise copy it.
    pub fn into_inner(self) -> UniqueGraph {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => shared.read().clone(),
        }
    }
}

impl From<UniqueGraph> for SharedGraph {
    fn from(graph: UniqueGraph) -> Self {
        Self::new(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_handles_share_state() {
        let g = SharedGraph::default();
        let other = g.clone();

        assert!(g.add_edge("ACT", "CTA", 1.0));
        assert!(!other.add_edge("ACT", "CTA", 5.0));
        assert_eq!(other.read().edge_weight("ACT", "CTA"), Some(1.0));

        assert!(other.set_edge_weight("ACT", "CTA", 2.0));
        assert_eq!(g.read().edge_weight("ACT", "CTA"), Some(2.0));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let g = SharedGraph::default();
        g.add_edge("A", "B", 1.0);

        let snap = g.snapshot();
        g.increment_edge_weight("A", "B", 1.0);

        assert_eq!(snap.edge_weight("A", "B"), Some(1.0));
        assert_eq!(g.read().edge_weight("A", "B"), Some(2.0));
    }

    #[test]
    fn test_concurrent_increments() {
        let g = SharedGraph::default();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let g = g.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        g.increment_edge_weight("A", "B", 1.0);
                        g.add_vertex(&format!("V{}", i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let graph = g.into_inner();
        assert_eq!(graph.edge_weight("A", "B"), Some(800.0));
        assert_eq!(graph.vertex_count(), 10);
        assert_eq!(graph.edge_count(), 1);
    }
}
