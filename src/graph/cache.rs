//! Edge locator cache.
//!
//! Algebra operations and graph construction probe many `(head, tail)`
//! pairs. The cache snapshots the full outgoing adjacency of a head vertex
//! on first probe and answers later probes from that snapshot.
//!
//! ## Invalidation
//!
//! A cache is bound to one graph instance and its structural revision.
//! Edges added through [`EdgeLocatorCache::added_edge`] are patched into
//! the snapshot in place. Any other structural change, or probing a
//! different graph, drops every snapshot before the next lookup. Weights
//! are never cached, so `set_edge_weight` needs no invalidation.
//!
//! ## Eviction
//!
//! Snapshots live in an `LruCache` bounded by `CacheConfig::max_entries`
//! head vertices. Each entry also records the logical-clock tick of its
//! last access.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::graph::UniqueGraph;
use crate::types::{Edge, EdgeKey};

/// Default number of cached head vertices.
pub const DEFAULT_CACHE_ENTRIES: usize = 4096;

/// Configuration for the edge locator cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached head vertices.
    pub max_entries: usize,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_ENTRIES,
            enabled: true,
        }
    }
}

/// Snapshot of one vertex's outgoing edges.
#[derive(Debug)]
struct OutgoingSnapshot {
    targets: HashMap<String, EdgeKey>,
    last_access: u64,
}

/// LRU cache of per-vertex outgoing edge maps.
///
/// Not thread-safe; own one per graph or per algebra call.
#[derive(Debug)]
pub struct EdgeLocatorCache {
    entries: Option<LruCache<String, OutgoingSnapshot>>,
    /// `(instance_id, revision)` of the graph the snapshots describe.
    bound_to: Option<(u64, u64)>,
    clock: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl EdgeLocatorCache {
    /// Create a cache with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with a custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        let entries = if config.enabled {
            let size = NonZeroUsize::new(config.max_entries)
                .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_ENTRIES));
            size.map(LruCache::new)
        } else {
            None
        };

        Self {
            entries,
            bound_to: None,
            clock: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Drop snapshots if `graph` is not the graph they were taken from.
    fn sync(&mut self, graph: &UniqueGraph) {
        let identity = (graph.instance_id(), graph.revision());
        if self.bound_to == Some(identity) {
            return;
        }
        if self.bound_to.is_some() {
            tracing::trace!(
                instance_id = identity.0,
                revision = identity.1,
                "Graph changed outside the cache, dropping snapshots"
            );
        }
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
        self.bound_to = Some(identity);
    }

    /// Locate the directed edge `head → tail`, returning its key and
    /// current weight.
    pub fn locate_directed_key(
        &mut self,
        graph: &UniqueGraph,
        head: &str,
        tail: &str,
    ) -> Option<(EdgeKey, f64)> {
        self.sync(graph);
        self.clock += 1;
        let clock = self.clock;

        let Some(entries) = self.entries.as_mut() else {
            self.misses += 1;
            let key = graph.edge_key(head, tail)?;
            return graph.weight_by_key(key).map(|w| (key, w));
        };

        if let Some(snapshot) = entries.get_mut(head) {
            self.hits += 1;
            snapshot.last_access = clock;
            let key = snapshot.targets.get(tail).copied()?;
            return graph.weight_by_key(key).map(|w| (key, w));
        }

        self.misses += 1;
        let source = graph.locate_vertex(head)?;
        let targets: HashMap<String, EdgeKey> = graph
            .successors(source)
            .iter()
            .filter_map(|t| graph.label(*t).map(|l| (l.to_string(), EdgeKey::new(source, *t))))
            .collect();
        let found = targets.get(tail).copied();

        let snapshot = OutgoingSnapshot {
            targets,
            last_access: clock,
        };
        if let Some((evicted, old)) = entries.push(head.to_string(), snapshot) {
            if evicted != head {
                self.evictions += 1;
                tracing::trace!(
                    evicted = %evicted,
                    last_access = old.last_access,
                    "Evicted edge snapshot"
                );
            }
        }

        let key = found?;
        graph.weight_by_key(key).map(|w| (key, w))
    }

    /// Locate the directed edge `head → tail`.
    pub fn locate_directed_edge(&mut self, graph: &UniqueGraph, head: &str, tail: &str) -> Option<Edge> {
        self.locate_directed_key(graph, head, tail)
            .map(|(_, w)| Edge::new(head, tail, w))
    }

    /// Locate `head → tail`, falling back to `tail → head`.
    pub fn locate_undirected_edge(&mut self, graph: &UniqueGraph, head: &str, tail: &str) -> Option<Edge> {
        self.locate_directed_edge(graph, head, tail)
            .or_else(|| self.locate_directed_edge(graph, tail, head))
    }

    /// Record that `edge` was just added to `graph`.
    ///
    /// Patches the source's snapshot in place if it is cached. If the graph
    /// changed in any other way since the last lookup, all snapshots are
    /// dropped instead.
    pub fn added_edge(&mut self, graph: &UniqueGraph, edge: &Edge) {
        let current = (graph.instance_id(), graph.revision());
        let bound = self.bound_to;
        match bound {
            Some(bound) if bound == current => {}
            Some((instance, revision)) if instance == current.0 && revision + 1 == current.1 => {
                self.bound_to = Some(current);
                let Some(entries) = self.entries.as_mut() else { return };
                if let Some(snapshot) = entries.peek_mut(edge.source.as_str()) {
                    if let Some(key) = graph.edge_key(&edge.source, &edge.target) {
                        snapshot.targets.insert(edge.target.clone(), key);
                    }
                }
            }
            _ => self.sync(graph),
        }
    }

    /// Clear every snapshot and counter; the logical clock restarts.
    pub fn reset_cache(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
        self.bound_to = None;
        self.clock = 0;
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    /// `hits / (hits + misses)`, 0.0 before any lookup.
    pub fn success_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }

    /// Cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.entries.as_ref().map(|e| e.len()).unwrap_or(0),
            cap: self.entries.as_ref().map(|e| e.cap().get()).unwrap_or(0),
        }
    }
}

impl Default for EdgeLocatorCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a snapshot.
    pub hits: u64,
    /// Lookups that had to consult the graph.
    pub misses: u64,
    /// Snapshots evicted for capacity.
    pub evictions: u64,
    /// Current number of cached head vertices.
    pub len: usize,
    /// Maximum number of cached head vertices (0 when disabled).
    pub cap: usize,
}
