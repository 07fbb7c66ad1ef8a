//! Label-unique directed weighted graph.
//!
//! Vertices are interned once per graph: `labels[i]` is the label of
//! `VertexId(i)` and `index` maps the label back. Edges only ever refer to
//! vertex ids, so a vertex can never be duplicated by accident.
//!
//! ## Insertion Contract
//!
//! - `add_vertex` and `add_edge` are idempotent and return `false` when
//!   nothing new was inserted.
//! - `add_edge` never overwrites the weight of an existing edge. Callers
//!   that need to replace a weight use `set_edge_weight`; callers that
//!   accumulate use `increment_edge_weight`.
//!
//! ## Revisions
//!
//! Every structural change (vertex or edge added or removed) bumps
//! `revision()` by exactly one per call. Weight-only changes do not.
//! `EdgeLocatorCache` keys its snapshots on `(instance_id, revision)`.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::types::{Edge, EdgeKey, EdgeRef, VertexId};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

fn next_instance_id() -> u64 {
    NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Lazily computed weight sums, dropped on any mutation.
#[derive(Debug, Clone, Default)]
struct WeightAggregates {
    outgoing: Vec<f64>,
    incoming: Vec<f64>,
    total: f64,
}

/// Flat serialized form of a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphRecord {
    vertices: Vec<String>,
    edges: Vec<Edge>,
}

/// Directed, weighted graph with at most one vertex per label and at most
/// one edge per ordered label pair.
#[derive(Debug, Serialize, Deserialize)]
#[serde(from = "GraphRecord", into = "GraphRecord")]
pub struct UniqueGraph {
    instance_id: u64,
    revision: u64,
    labels: Vec<String>,
    index: HashMap<String, VertexId>,
    weights: HashMap<EdgeKey, f64>,
    outgoing: Vec<Vec<VertexId>>,
    incoming: Vec<Vec<VertexId>>,
    aggregates: OnceLock<WeightAggregates>,
}

impl UniqueGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty graph with room for `vertices` vertices.
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            instance_id: next_instance_id(),
            revision: 0,
            labels: Vec::with_capacity(vertices),
            index: HashMap::with_capacity(vertices),
            weights: HashMap::new(),
            outgoing: Vec::with_capacity(vertices),
            incoming: Vec::with_capacity(vertices),
            aggregates: OnceLock::new(),
        }
    }

    /// Process-unique identity of this graph instance. Clones get a new one.
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// Structural revision counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch_structure(&mut self) {
        self.revision += 1;
        self.aggregates.take();
    }

    fn touch_weights(&mut self) {
        self.aggregates.take();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Vertices
    // ─────────────────────────────────────────────────────────────────────

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    /// True when the graph has no vertices (and therefore no edges).
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Check whether a vertex with this label exists.
    pub fn contains_vertex(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Find the vertex with this label.
    pub fn locate_vertex(&self, label: &str) -> Option<VertexId> {
        self.index.get(label).copied()
    }

    /// Label of a vertex id.
    pub fn label(&self, id: VertexId) -> Option<&str> {
        self.labels.get(id.index()).map(String::as_str)
    }

    /// Vertex labels in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Vertex labels in ascending order.
    pub fn sorted_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.vertices().collect();
        labels.sort_unstable();
        labels
    }

    /// Insert a vertex. Returns `false` if the label already exists.
    pub fn add_vertex(&mut self, label: &str) -> bool {
        if self.index.contains_key(label) {
            return false;
        }
        self.intern(label);
        self.touch_structure();
        true
    }

    fn intern(&mut self, label: &str) -> VertexId {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = VertexId::new(self.labels.len());
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), id);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Remove a vertex and every incident edge.
    pub fn remove_vertex(&mut self, label: &str) -> bool {
        self.contains_vertex(label) && self.retain_vertices(|l| l != label) > 0
    }

    /// Keep only vertices for which `keep` returns true; incident edges of
    /// removed vertices go with them. Returns the number removed.
    ///
    /// Vertex ids are reassigned.
    pub fn retain_vertices<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let keep_flags: Vec<bool> = self.labels.iter().map(|l| keep(l.as_str())).collect();
        let removed = keep_flags.iter().filter(|k| !**k).count();
        if removed == 0 {
            return 0;
        }

        let mut remap: Vec<Option<VertexId>> = vec![None; self.labels.len()];
        let mut labels = Vec::with_capacity(self.labels.len() - removed);
        let mut index = HashMap::with_capacity(self.labels.len() - removed);
        for (old, label) in std::mem::take(&mut self.labels).into_iter().enumerate() {
            if keep_flags[old] {
                let id = VertexId::new(labels.len());
                remap[old] = Some(id);
                index.insert(label.clone(), id);
                labels.push(label);
            }
        }

        let mut outgoing = vec![Vec::new(); labels.len()];
        let mut incoming = vec![Vec::new(); labels.len()];
        let mut weights = HashMap::with_capacity(self.weights.len());
        for (old_source, targets) in self.outgoing.iter().enumerate() {
            let Some(source) = remap[old_source] else { continue };
            for old_target in targets {
                let Some(target) = remap[old_target.index()] else { continue };
                let old_key = EdgeKey::new(VertexId::new(old_source), *old_target);
                if let Some(&w) = self.weights.get(&old_key) {
                    weights.insert(EdgeKey::new(source, target), w);
                    outgoing[source.index()].push(target);
                    incoming[target.index()].push(source);
                }
            }
        }

        self.labels = labels;
        self.index = index;
        self.weights = weights;
        self.outgoing = outgoing;
        self.incoming = incoming;
        self.touch_structure();
        removed
    }

    // ─────────────────────────────────────────────────────────────────────
    // Edges
    // ─────────────────────────────────────────────────────────────────────

    /// Insert a directed edge, creating missing vertices.
    ///
    /// Returns `false` if the ordered pair already exists; the existing
    /// weight is left untouched.
    pub fn add_edge(&mut self, source: &str, target: &str, weight: f64) -> bool {
        let vertices_before = self.labels.len();
        let s = self.intern(source);
        let t = self.intern(target);
        let key = EdgeKey::new(s, t);
        if self.weights.contains_key(&key) {
            if self.labels.len() != vertices_before {
                self.touch_structure();
            }
            return false;
        }
        self.weights.insert(key, weight);
        self.outgoing[s.index()].push(t);
        self.incoming[t.index()].push(s);
        self.touch_structure();
        true
    }

    /// Resolve an ordered label pair to its edge key.
    pub fn edge_key(&self, source: &str, target: &str) -> Option<EdgeKey> {
        let key = EdgeKey::new(self.locate_vertex(source)?, self.locate_vertex(target)?);
        self.weights.contains_key(&key).then_some(key)
    }

    /// Check whether the ordered pair exists.
    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edge_key(source, target).is_some()
    }

    /// Weight of the ordered pair, if present.
    pub fn edge_weight(&self, source: &str, target: &str) -> Option<f64> {
        let key = EdgeKey::new(self.locate_vertex(source)?, self.locate_vertex(target)?);
        self.weights.get(&key).copied()
    }

    /// Weight of an edge by key.
    pub fn weight_by_key(&self, key: EdgeKey) -> Option<f64> {
        self.weights.get(&key).copied()
    }

    /// Owned copy of an edge.
    pub fn get_edge(&self, source: &str, target: &str) -> Option<Edge> {
        self.edge_weight(source, target)
            .map(|w| Edge::new(source, target, w))
    }

    /// Replace the weight of an existing edge. Returns `false` if absent.
    pub fn set_edge_weight(&mut self, source: &str, target: &str, weight: f64) -> bool {
        match self.edge_key(source, target) {
            Some(key) => self.set_weight_by_key(key, weight),
            None => false,
        }
    }

    /// Replace the weight of an existing edge by key. Returns `false` if absent.
    pub fn set_weight_by_key(&mut self, key: EdgeKey, weight: f64) -> bool {
        match self.weights.get_mut(&key) {
            Some(w) => {
                *w = weight;
                self.touch_weights();
                true
            }
            None => false,
        }
    }

    /// Add `delta` to an edge's weight, inserting it with weight `delta`
    /// if absent. Returns the resulting weight.
    pub fn increment_edge_weight(&mut self, source: &str, target: &str, delta: f64) -> f64 {
        match self.edge_key(source, target) {
            Some(key) => {
                let w = self.weights.get(&key).copied().unwrap_or(0.0) + delta;
                self.set_weight_by_key(key, w);
                w
            }
            None => {
                self.add_edge(source, target, delta);
                delta
            }
        }
    }

    /// Remove an edge, returning its weight. Vertices stay.
    pub fn remove_edge(&mut self, source: &str, target: &str) -> Option<f64> {
        let key = self.edge_key(source, target)?;
        let weight = self.weights.remove(&key)?;
        self.outgoing[key.source.index()].retain(|v| *v != key.target);
        self.incoming[key.target.index()].retain(|v| *v != key.source);
        self.touch_structure();
        Some(weight)
    }

    /// All edges, grouped by source in vertex insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> {
        self.outgoing.iter().enumerate().flat_map(move |(s, targets)| {
            let source = VertexId::new(s);
            targets.iter().map(move |t| EdgeRef {
                source: &self.labels[s],
                target: &self.labels[t.index()],
                weight: self.weights.get(&EdgeKey::new(source, *t)).copied().unwrap_or(0.0),
            })
        })
    }

    /// All edges as owned values, sorted by (source, target).
    pub fn to_edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.edges().map(|e| e.to_edge()).collect();
        edges.sort();
        edges
    }

    /// Successor ids of a vertex.
    pub fn successors(&self, id: VertexId) -> &[VertexId] {
        self.outgoing.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Predecessor ids of a vertex.
    pub fn predecessors(&self, id: VertexId) -> &[VertexId] {
        self.incoming.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Outgoing edges of a vertex; empty if the vertex is absent.
    pub fn outgoing_edges(&self, label: &str) -> Vec<EdgeRef<'_>> {
        let Some(s) = self.locate_vertex(label) else { return Vec::new() };
        self.successors(s)
            .iter()
            .map(|t| EdgeRef {
                source: &self.labels[s.index()],
                target: &self.labels[t.index()],
                weight: self.weights.get(&EdgeKey::new(s, *t)).copied().unwrap_or(0.0),
            })
            .collect()
    }

    /// Incoming edges of a vertex; empty if the vertex is absent.
    pub fn incoming_edges(&self, label: &str) -> Vec<EdgeRef<'_>> {
        let Some(t) = self.locate_vertex(label) else { return Vec::new() };
        self.predecessors(t)
            .iter()
            .map(|s| EdgeRef {
                source: &self.labels[s.index()],
                target: &self.labels[t.index()],
                weight: self.weights.get(&EdgeKey::new(*s, t)).copied().unwrap_or(0.0),
            })
            .collect()
    }

    /// Distinct neighbors (predecessors and successors), sorted by label.
    pub fn neighbors(&self, label: &str) -> Vec<&str> {
        let Some(v) = self.locate_vertex(label) else { return Vec::new() };
        let ids: BTreeSet<VertexId> = self.successors(v)
            .iter()
            .chain(self.predecessors(v))
            .copied()
            .collect();
        let mut labels: Vec<&str> = ids.into_iter()
            .map(|id| self.labels[id.index()].as_str())
            .collect();
        labels.sort_unstable();
        labels
    }

    /// Largest weight among edges touching a vertex, 0.0 if none.
    pub fn max_incident_weight(&self, label: &str) -> f64 {
        let Some(v) = self.locate_vertex(label) else { return 0.0 };
        let out = self.successors(v).iter().map(|t| EdgeKey::new(v, *t));
        let inc = self.predecessors(v).iter().map(|s| EdgeKey::new(*s, v));
        out.chain(inc)
            .filter_map(|k| self.weights.get(&k).copied())
            .fold(0.0, f64::max)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Aggregates
    // ─────────────────────────────────────────────────────────────────────

    fn aggregates(&self) -> &WeightAggregates {
        self.aggregates.get_or_init(|| {
            let mut agg = WeightAggregates {
                outgoing: vec![0.0; self.labels.len()],
                incoming: vec![0.0; self.labels.len()],
                total: 0.0,
            };
            for (key, w) in &self.weights {
                agg.outgoing[key.source.index()] += w;
                agg.incoming[key.target.index()] += w;
                agg.total += w;
            }
            agg
        })
    }

    /// Sum of weights of edges leaving a vertex.
    pub fn outgoing_weight_sum(&self, label: &str) -> f64 {
        self.locate_vertex(label)
            .map(|v| self.aggregates().outgoing[v.index()])
            .unwrap_or(0.0)
    }

    /// Sum of weights of edges entering a vertex.
    pub fn incoming_weight_sum(&self, label: &str) -> f64 {
        self.locate_vertex(label)
            .map(|v| self.aggregates().incoming[v.index()])
            .unwrap_or(0.0)
    }

    /// Sum of all edge weights.
    pub fn total_edge_weight(&self) -> f64 {
        self.aggregates().total
    }

    /// Normalized edge weight:
    ///
    /// ```text
    /// k_out = w / Σ out(source)
    /// k_in  = w / Σ in(target)
    /// score = k_out · k_in / (k_out + k_in)
    /// ```
    ///
    /// 0.0 if the edge is absent or its weight sums vanish.
    pub fn normalized_edge_weight(&self, source: &str, target: &str) -> f64 {
        let Some(key) = self.edge_key(source, target) else { return 0.0 };
        let w = self.weights[&key];
        let agg = self.aggregates();
        let out_sum = agg.outgoing[key.source.index()];
        let in_sum = agg.incoming[key.target.index()];
        if out_sum == 0.0 || in_sum == 0.0 {
            return 0.0;
        }
        let k_out = w / out_sum;
        let k_in = w / in_sum;
        if k_out + k_in == 0.0 {
            return 0.0;
        }
        k_out * k_in / (k_out + k_in)
    }

    /// Remove all vertices and edges.
    pub fn clear(&mut self) {
        if self.labels.is_empty() {
            return;
        }
        self.labels.clear();
        self.index.clear();
        self.weights.clear();
        self.outgoing.clear();
        self.incoming.clear();
        self.touch_structure();
    }
}

impl Default for UniqueGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy with a fresh instance id.
impl Clone for UniqueGraph {
    fn clone(&self) -> Self {
        Self {
            instance_id: next_instance_id(),
            revision: 0,
            labels: self.labels.clone(),
            index: self.index.clone(),
            weights: self.weights.clone(),
            outgoing: self.outgoing.clone(),
            incoming: self.incoming.clone(),
            aggregates: self.aggregates.clone(),
        }
    }
}

/// Structural equality: same labels, same ordered pairs, same weights.
impl PartialEq for UniqueGraph {
    fn eq(&self, other: &Self) -> bool {
        self.vertex_count() == other.vertex_count()
            && self.edge_count() == other.edge_count()
            && self.labels.iter().all(|l| other.contains_vertex(l))
            && self.edges().all(|e| other.edge_weight(e.source, e.target) == Some(e.weight))
    }
}

impl From<GraphRecord> for UniqueGraph {
    fn from(record: GraphRecord) -> Self {
        let mut graph = Self::with_capacity(record.vertices.len());
        for label in &record.vertices {
            graph.intern(label);
        }
        for edge in &record.edges {
            graph.add_edge(&edge.source, &edge.target, edge.weight);
        }
        graph.revision = 0;
        graph
    }
}

impl From<UniqueGraph> for GraphRecord {
    fn from(graph: UniqueGraph) -> Self {
        Self {
            edges: graph.edges().map(|e| e.to_edge()).collect(),
            vertices: graph.labels,
        }
    }
}
