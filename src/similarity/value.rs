//! Value, containment and size similarity.
//!
//! ## Per-level metrics
//!
//! With `small` the level with fewer edges, `min`/`max` the two edge
//! counts, and `deg` degradation counters:
//!
//! ```text
//! containment = Σ_{e ∈ small ∩ large} 1 / max(1, deg_small(e))              / min
//! value       = Σ_{e ∈ small ∩ large} ratio(e) / max(1, deg_a(e) + deg_b(e)) / max
//! size        = min / max(1, max)
//! ```
//!
//! where `ratio(e) = min(w_a, w_b) / max(w_a, w_b)`.
//!
//! ## Aggregation
//!
//! Levels are weighted by [`level_importance`], which grows with the
//! n-gram size. Levels missing from `b`, and levels where neither graph
//! has an edge, do not count.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeLocatorCache, NGramGraph, UniqueGraph};

/// Similarity of two graphs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSimilarity {
    /// Weight agreement over shared edges, relative to the larger graph.
    pub value: f64,
    /// Share of the smaller graph's edges found in the larger one.
    pub containment: f64,
    /// Ratio of edge counts.
    pub size: f64,
}

impl GraphSimilarity {
    /// All three metrics at 1.0.
    pub const IDENTICAL: Self = Self {
        value: 1.0,
        containment: 1.0,
        size: 1.0,
    };

    /// Product of the three metrics.
    pub fn overall(&self) -> f64 {
        self.value * self.containment * self.size
    }

    /// `1 / overall`, or `+∞` when the overall similarity is 0.
    pub fn distance(&self) -> f64 {
        let overall = self.overall();
        if overall == 0.0 {
            f64::INFINITY
        } else {
            1.0 / overall
        }
    }

    /// Value similarity with the size penalty factored out; 0.0 when size is 0.
    pub fn normalized_value(&self) -> f64 {
        if self.size == 0.0 {
            0.0
        } else {
            self.value / self.size
        }
    }
}

/// Importance of level `n` in a graph whose smallest level is `min_n`:
/// `Σ_{k=min_n}^{n} Σ_{j=min_n}^{k} 1`.
pub fn level_importance(n: usize, min_n: usize) -> f64 {
    if n < min_n {
        return 0.0;
    }
    let m = (n - min_n + 1) as f64;
    m * (m + 1.0) / 2.0
}

/// Compares multi-level graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityComparator;

impl SimilarityComparator {
    /// Create a comparator.
    pub fn new() -> Self {
        Self
    }

    /// Similarity of `a` to `b`, iterating the levels of `a`.
    pub fn compare(&self, a: &NGramGraph, b: &NGramGraph) -> GraphSimilarity {
        let min_n = a.min_size();
        let mut totals = GraphSimilarity::default();
        let mut overall_importance = 0.0;

        for (n, level_a) in a.levels() {
            let Some(level_b) = b.level(n) else { continue };
            if level_a.edge_count() == 0 && level_b.edge_count() == 0 {
                continue;
            }

            let level = compare_level(a, level_a, b, level_b);
            let importance = level_importance(n, min_n);
            totals.value += level.value * importance;
            totals.containment += level.containment * importance;
            totals.size += level.size * importance;
            overall_importance += importance;
        }

        if overall_importance == 0.0 {
            return if same_vertices(a, b) {
                GraphSimilarity::IDENTICAL
            } else {
                GraphSimilarity::default()
            };
        }

        GraphSimilarity {
            value: totals.value / overall_importance,
            containment: totals.containment / overall_importance,
            size: totals.size / overall_importance,
        }
    }
}

/// Similarity using the default comparator.
pub fn similarity(a: &NGramGraph, b: &NGramGraph) -> GraphSimilarity {
    SimilarityComparator::new().compare(a, b)
}

fn compare_level(
    a: &NGramGraph,
    level_a: &UniqueGraph,
    b: &NGramGraph,
    level_b: &UniqueGraph,
) -> GraphSimilarity {
    let a_is_small = level_a.edge_count() <= level_b.edge_count();
    let (small, large, small_owner) = if a_is_small {
        (level_a, level_b, a)
    } else {
        (level_b, level_a, b)
    };
    let min_edges = small.edge_count() as f64;
    let max_edges = large.edge_count() as f64;

    let mut containment = 0.0;
    let mut value = 0.0;
    let mut cache = EdgeLocatorCache::new();
    for e in small.edges() {
        let Some((_, w_large)) = cache.locate_directed_key(large, e.source, e.target) else {
            continue;
        };
        let deg_small = small_owner.degradation_degree(e.source, e.target);
        let deg_sum = a.degradation_degree(e.source, e.target) + b.degradation_degree(e.source, e.target);

        containment += 1.0 / f64::from(deg_small.max(1));

        let (lo, hi) = if e.weight <= w_large { (e.weight, w_large) } else { (w_large, e.weight) };
        let ratio = if hi == 0.0 { 1.0 } else { lo / hi };
        value += ratio / f64::from(deg_sum.max(1));
    }

    GraphSimilarity {
        containment: if min_edges > 0.0 { containment / min_edges } else { 0.0 },
        value: if max_edges > 0.0 { value / max_edges } else { 0.0 },
        size: min_edges / max_edges.max(1.0),
    }
}

/// True when every n-gram size has the same vertex labels in both graphs.
fn same_vertices(a: &NGramGraph, b: &NGramGraph) -> bool {
    let sizes: BTreeSet<usize> = a.levels().chain(b.levels()).map(|(n, _)| n).collect();
    sizes.into_iter().all(|n| labels_at(a, n) == labels_at(b, n))
}

fn labels_at(g: &NGramGraph, n: usize) -> Vec<&str> {
    g.level(n).map(UniqueGraph::sorted_labels).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::degrade;

    fn ngg(text: &str) -> NGramGraph {
        NGramGraph::with_params(text, 3, 3, 3).unwrap()
    }

    #[test]
    fn test_self_similarity_is_one() {
        let a = NGramGraph::with_params("the quick brown fox", 1, 4, 3).unwrap();
        let s = similarity(&a, &a);

        assert_eq!(s, GraphSimilarity::IDENTICAL);
        assert_eq!(s.overall(), 1.0);
        assert_eq!(s.distance(), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = ngg("ACTAGT");
        let b = ngg("ACTACTA");

        let s = similarity(&a, &b);

        // One shared edge, CTA→ACT: weights 1 and 2
        assert!((s.containment - 1.0 / 6.0).abs() < 1e-12);
        assert!((s.value - 0.5 / 8.0).abs() < 1e-12);
        assert!((s.size - 6.0 / 8.0).abs() < 1e-12);
        assert!((s.normalized_value() - (0.5 / 8.0) / (6.0 / 8.0)).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_is_symmetric_without_degradation() {
        let a = ngg("ACTAGTTAC");
        let b = ngg("ACTACTAGA");
        let (ab, ba) = (similarity(&a, &b), similarity(&b, &a));
        assert!((ab.value - ba.value).abs() < 1e-12);
        assert!((ab.containment - ba.containment).abs() < 1e-12);
        assert_eq!(ab.size, ba.size);
    }

    #[test]
    fn test_disjoint_graphs() {
        let a = ngg("AAAA");
        let b = ngg("CCCC");

        let s = similarity(&a, &b);
        assert_eq!(s.containment, 0.0);
        assert_eq!(s.value, 0.0);
        assert_eq!(s.overall(), 0.0);
        assert_eq!(s.distance(), f64::INFINITY);
    }

    #[test]
    fn test_degradation_dampens() {
        let mut a = ngg("ACTAGT");
        let b = a.clone();
        let fresh = similarity(&a, &b);

        degrade(&mut a, &b);
        degrade(&mut a, &b);
        let damped = similarity(&a, &b);

        assert!(damped.value < fresh.value);
        assert!(damped.containment < fresh.containment);
        assert_eq!(damped.size, fresh.size);
    }

    #[test]
    fn test_level_importance() {
        assert_eq!(level_importance(3, 3), 1.0);
        assert_eq!(level_importance(4, 3), 3.0);
        assert_eq!(level_importance(5, 3), 6.0);
        assert_eq!(level_importance(2, 3), 0.0);
    }

    #[test]
    fn test_edgeless_levels() {
        let a = ngg("ACT");
        let b = ngg("ACT");
        assert_eq!(similarity(&a, &b), GraphSimilarity::IDENTICAL);

        let c = ngg("GGA");
        assert_eq!(similarity(&a, &c), GraphSimilarity::default());
    }
}
