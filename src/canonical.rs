//! Canonical encodings for ordering, equality and hashing.
//!
//! ## Canonical Code
//!
//! Vertices of one level are processed in ascending label order. When the
//! vertex at position `i` is processed, it is compared with every vertex
//! at positions `0..=i` (itself included):
//!
//! - forward entry: weight of `v → w`, or `0`
//! - backward entry: weight of `w → v`, or `0`
//!
//! One line per vertex is `label:forward|backward` with entries joined by
//! `,`. The full code is the forward stream followed by the backward
//! stream. Encoding is O(V²); cap the vertex count before encoding large
//! graphs.
//!
//! ## Canonical Bytes
//!
//! Derived artifacts (similarity matrices, configs) hash their JSON form:
//!
//! - Stable field order: Struct fields serialize in declaration order
//! - Stable Vec order: Vectors serialize in index order
//! - No HashMap allowed: Use BTreeMap for maps in hashed data
//! - Stable float format: f32/f64 serialize consistently

use std::cmp::Ordering;
use std::fmt::Write;

use serde::Serialize;
use xxhash_rust::xxh64::{xxh64, Xxh64};

use crate::graph::{NGramGraph, UniqueGraph};
use crate::types::{EdgeKey, VertexId};

/// Serialize a value to canonical JSON bytes for hashing.
///
/// This function produces deterministic output for the same input,
/// suitable for hash computation and replay verification.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

// ─────────────────────────────────────────────────────────────────────────
// Graph codes
// ─────────────────────────────────────────────────────────────────────────

fn sorted_ids(graph: &UniqueGraph) -> Vec<VertexId> {
    let mut ids: Vec<VertexId> = (0..graph.vertex_count()).map(VertexId::new).collect();
    ids.sort_by(|a, b| graph.label(*a).cmp(&graph.label(*b)));
    ids
}

fn push_weight(out: &mut String, graph: &UniqueGraph, key: EdgeKey) {
    match graph.weight_by_key(key) {
        Some(w) => {
            let _ = write!(out, "{}", w);
        }
        None => out.push('0'),
    }
}

/// Forward and backward entries of the vertex at `position`.
fn encode_row(graph: &UniqueGraph, order: &[VertexId], position: usize) -> (String, String) {
    let v = order[position];
    let mut forward = String::new();
    let mut backward = String::new();
    for (j, w) in order[..=position].iter().enumerate() {
        if j > 0 {
            forward.push(',');
            backward.push(',');
        }
        push_weight(&mut forward, graph, EdgeKey::new(v, *w));
        push_weight(&mut backward, graph, EdgeKey::new(*w, v));
    }
    (forward, backward)
}

/// Lazily produced canonical code, one line per vertex.
#[derive(Debug)]
pub struct CanonicalCodeLines<'a> {
    graph: &'a UniqueGraph,
    order: Vec<VertexId>,
    position: usize,
}

impl<'a> Iterator for CanonicalCodeLines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let id = *self.order.get(self.position)?;
        let (forward, backward) = encode_row(self.graph, &self.order, self.position);
        self.position += 1;
        let label = self.graph.label(id).unwrap_or_default();
        Some(format!("{}:{}|{}", label, forward, backward))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.order.len() - self.position;
        (left, Some(left))
    }
}

impl ExactSizeIterator for CanonicalCodeLines<'_> {}

/// Canonical code lines of one level.
pub fn canonical_lines(graph: &UniqueGraph) -> CanonicalCodeLines<'_> {
    CanonicalCodeLines {
        graph,
        order: sorted_ids(graph),
        position: 0,
    }
}

/// Full canonical code of one level: forward stream, `|`, backward stream.
///
/// Forward entries of each vertex are prefixed by its label and
/// terminated by `;`.
pub fn canonical_code(graph: &UniqueGraph) -> String {
    let order = sorted_ids(graph);
    let mut forward = String::new();
    let mut backward = String::new();
    for (i, id) in order.iter().enumerate() {
        let (f, b) = encode_row(graph, &order, i);
        let _ = write!(forward, "{}:{};", graph.label(*id).unwrap_or_default(), f);
        let _ = write!(backward, "{};", b);
    }
    forward.push('|');
    forward.push_str(&backward);
    forward
}

/// Compare two levels by their canonical code lines.
///
/// Lines compare lexicographically one by one; a graph whose lines run
/// out first while the other still has lines is `Less`.
pub fn compare_canonical_codes(a: &UniqueGraph, b: &UniqueGraph) -> Ordering {
    canonical_lines(a).cmp(canonical_lines(b))
}

/// Fingerprint of a multi-level graph: `xxh64` over the n-gram size and
/// canonical code of every level. Equal graphs have equal fingerprints.
pub fn graph_fingerprint(graph: &NGramGraph) -> u64 {
    let mut hasher = Xxh64::new(0);
    for (n, level) in graph.levels() {
        hasher.update(&(n as u64).to_le_bytes());
        hasher.update(canonical_code(level).as_bytes());
    }
    hasher.digest()
}
