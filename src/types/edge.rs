//! Vertex and edge identities for n-gram graphs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Index of a vertex inside one graph's interning arena.
///
/// Only meaningful for the graph that issued it. Indices are reassigned
/// when vertices are removed, so never keep one across a structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(u32);

impl VertexId {
    /// Create a vertex id from an arena index.
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Arena index of this vertex.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Ordered (source, target) pair of arena indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    /// Source vertex.
    pub source: VertexId,
    /// Target vertex.
    pub target: VertexId,
}

impl EdgeKey {
    /// Create a new edge key.
    pub fn new(source: VertexId, target: VertexId) -> Self {
        Self { source, target }
    }
}

/// Directed, weighted edge between two n-gram labels.
///
/// Identity is the ordered label pair. The weight is excluded from
/// equality, hashing and ordering so it can change without affecting
/// set membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Source label.
    pub source: String,
    /// Target label.
    pub target: String,
    /// Edge weight.
    pub weight: f64,
}

impl Edge {
    /// Create a new edge.
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
    }
}

// Canonical ordering: source, then target
impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.source.cmp(&other.source) {
            std::cmp::Ordering::Equal => self.target.cmp(&other.target),
            ord => ord,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}:{}", self.source, self.target, self.weight)
    }
}

/// Borrowed view of an edge inside a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRef<'a> {
    /// Source label.
    pub source: &'a str,
    /// Target label.
    pub target: &'a str,
    /// Edge weight.
    pub weight: f64,
}

impl<'a> EdgeRef<'a> {
    /// Copy into an owned edge.
    pub fn to_edge(&self) -> Edge {
        Edge::new(self.source, self.target, self.weight)
    }
}
