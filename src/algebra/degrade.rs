//! Degradation counters.

use crate::graph::{EdgeLocatorCache, NGramGraph};

/// Increment `a`'s degradation counter for every edge of `b` whose ordered
/// pair also exists in `a`. Returns the number of counters bumped.
///
/// Only `a`'s side table changes; its levels and weights are untouched.
pub fn degrade(a: &mut NGramGraph, b: &NGramGraph) -> usize {
    let mut matched: Vec<(String, String)> = Vec::new();
    for (n, level_a) in a.levels() {
        let Some(level_b) = b.level(n) else { continue };
        let mut cache = EdgeLocatorCache::new();
        matched.extend(
            level_b
                .edges()
                .filter(|e| cache.locate_directed_key(level_a, e.source, e.target).is_some())
                .map(|e| (e.source.to_string(), e.target.to_string())),
        );
    }

    for (source, target) in &matched {
        a.record_degradation(source, target);
    }

    tracing::debug!(matched = matched.len(), "Degraded graph");
    matched.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrade_counts_shared_edges() {
        let mut a = NGramGraph::with_params("ACTAGT", 3, 3, 3).unwrap();
        let b = NGramGraph::with_params("ACTACTA", 3, 3, 3).unwrap();

        assert_eq!(degrade(&mut a, &b), 1);
        assert_eq!(a.degradation_degree("CTA", "ACT"), 1);
        assert_eq!(degrade(&mut a, &b), 1);
        assert_eq!(a.degradation_degree("CTA", "ACT"), 2);
        assert_eq!(a.degradation_degree("AGT", "TAG"), 0);
    }

    #[test]
    fn test_degrade_leaves_weights() {
        let mut a = NGramGraph::with_params("ACTAGT", 3, 3, 3).unwrap();
        let before = a.clone();
        let b = a.clone();

        assert_eq!(degrade(&mut a, &b), 6);
        assert_eq!(a, before);
    }
}
