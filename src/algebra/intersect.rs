//! Intersection, difference and their combinations.

use crate::algebra::merge::merge;
use crate::algebra::remove_all;
use crate::graph::{EdgeLocatorCache, NGramGraph, UniqueGraph};
use crate::types::Edge;

/// Edges whose ordered pair exists in both graphs, weighted by the mean of
/// the two weights.
///
/// The result has `a`'s configuration; levels missing from `b` stay empty.
pub fn intersect(a: &NGramGraph, b: &NGramGraph) -> NGramGraph {
    let mut result = a.empty_like();
    for (n, target) in result.levels_mut() {
        let (Some(level_a), Some(level_b)) = (a.level(n), b.level(n)) else { continue };
        intersect_level(level_a, level_b, target);
    }

    tracing::debug!(edges = result.total_edge_count(), "Intersected graphs");
    result
}

fn intersect_level(a: &UniqueGraph, b: &UniqueGraph, out: &mut UniqueGraph) {
    // Probe the larger graph with the edges of the smaller one
    let (small, large) = if a.edge_count() <= b.edge_count() { (a, b) } else { (b, a) };
    let mut cache = EdgeLocatorCache::new();
    for e in small.edges() {
        if let Some((_, w)) = cache.locate_directed_key(large, e.source, e.target) {
            out.add_edge(e.source, e.target, (e.weight + w) / 2.0);
        }
    }
}

/// Union of `a` and `b` (keeping `a`'s weights) minus their intersection.
///
/// Approximates what changed between `a` and `b`.
pub fn inverse_intersect(a: &NGramGraph, b: &NGramGraph) -> NGramGraph {
    let mut union = a.clone();
    merge(&mut union, b, 0.0);
    let common = intersect(a, b);
    subtract(&mut union, &common);
    union
}

/// Intersection and union-minus-intersection in one pass.
///
/// The union is seeded from whichever graph has more edges and merged with
/// the other, so the returned delta carries that graph's configuration and
/// weights.
pub fn intersect_and_delta(a: &NGramGraph, b: &NGramGraph) -> (NGramGraph, NGramGraph) {
    let (larger, smaller) = if a.total_edge_count() >= b.total_edge_count() {
        (a, b)
    } else {
        (b, a)
    };

    let mut delta = larger.clone();
    merge(&mut delta, smaller, 0.0);
    let common = intersect(a, b);
    subtract(&mut delta, &common);

    (common, delta)
}

/// Copy of `a` without any edge whose ordered pair exists in `b`,
/// regardless of weight.
pub fn all_not_in(a: &NGramGraph, b: &NGramGraph) -> NGramGraph {
    let mut result = a.clone();
    let mut removed = 0;
    for (n, level) in result.levels_mut() {
        let Some(other) = b.level(n) else { continue };
        let mut cache = EdgeLocatorCache::new();
        let shared: Vec<Edge> = level
            .edges()
            .filter(|e| cache.locate_directed_key(other, e.source, e.target).is_some())
            .map(|e| e.to_edge())
            .collect();
        removed += remove_all(level, &shared);
    }

    tracing::debug!(removed, "Removed edges present in other graph");
    result
}

/// Remove from `graph` every edge pair present in `other`.
fn subtract(graph: &mut NGramGraph, other: &NGramGraph) {
    for (n, level) in graph.levels_mut() {
        let Some(other_level) = other.level(n) else { continue };
        let edges: Vec<Edge> = other_level.edges().map(|e| e.to_edge()).collect();
        remove_all(level, &edges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn ngg(text: &str) -> NGramGraph {
        NGramGraph::with_params(text, 3, 3, 3).unwrap()
    }

    fn pairs(g: &NGramGraph) -> BTreeSet<(usize, String, String)> {
        g.levels()
            .flat_map(|(n, l)| {
                l.edges()
                    .map(move |e| (n, e.source.to_string(), e.target.to_string()))
            })
            .collect()
    }

    #[test]
    fn test_intersect_mean_weight() {
        let a = ngg("ACTAGT");
        let b = ngg("ACTACTA");

        let c = intersect(&a, &b);

        let level = c.level(3).unwrap();
        assert_eq!(level.edge_count(), 1);
        assert_eq!(level.edge_weight("CTA", "ACT"), Some(1.5));
    }

    #[test]
    fn test_intersect_members_in_both() {
        let a = ngg("the cat sat on the mat");
        let b = ngg("the cat ate the rat");

        let c = intersect(&a, &b);
        assert!(c.total_edge_count() > 0);
        for (_, s, t) in pairs(&c) {
            assert!(a.level(3).unwrap().contains_edge(&s, &t));
            assert!(b.level(3).unwrap().contains_edge(&s, &t));
        }
    }

    #[test]
    fn test_intersect_is_non_destructive() {
        let a = ngg("ACTAGT");
        let b = ngg("ACTACTA");
        let (a0, b0) = (a.clone(), b.clone());

        let _ = intersect(&a, &b);
        let _ = inverse_intersect(&a, &b);
        let _ = all_not_in(&a, &b);

        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_all_not_in_partitions_with_intersect() {
        let a = ngg("ACTAGTACGGT");
        let b = ngg("ACTACTAGG");

        let only_a = all_not_in(&a, &b);
        let common = intersect(&a, &b);

        let mut union = pairs(&only_a);
        let common_pairs = pairs(&common);
        assert!(union.is_disjoint(&common_pairs));
        union.extend(common_pairs);
        assert_eq!(union, pairs(&a));
    }

    #[test]
    fn test_inverse_intersect() {
        let a = ngg("ACTAGT");
        let b = ngg("ACTACTA");

        let d = inverse_intersect(&a, &b);
        let level = d.level(3).unwrap();

        assert!(!level.contains_edge("CTA", "ACT"));
        assert!(level.contains_edge("AGT", "TAG"));
        assert!(level.contains_edge("ACT", "ACT"));
        // 6 edges in a, 8 in b, 1 shared
        assert_eq!(level.edge_count(), 12);
    }

    #[test]
    fn test_intersect_and_delta_seeds_from_larger() {
        let small = ngg("ACTAGT");
        let large = ngg("ACTACTAGGA");

        let (common, delta) = intersect_and_delta(&small, &large);
        assert_eq!(common, intersect(&small, &large));

        // Pairs in exactly one graph survive the delta
        let expected: BTreeSet<_> = pairs(&inverse_intersect(&small, &large));
        assert_eq!(pairs(&delta), expected);
        assert_eq!(delta.data_string(), "ACTACTAGGA");
    }

    #[test]
    fn test_intersect_missing_level_is_empty() {
        let a = NGramGraph::with_params("ACTAGT", 2, 3, 3).unwrap();
        let b = NGramGraph::with_params("ACTAGT", 2, 2, 3).unwrap();

        let c = intersect(&a, &b);
        assert!(!c.level(2).unwrap().is_empty());
        assert!(c.level(3).unwrap().is_empty());
    }
}
