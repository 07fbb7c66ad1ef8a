//! Weighted merge.

use crate::graph::{EdgeLocatorCache, NGramGraph, UniqueGraph};

/// Blend `b` into `a` in place.
///
/// For every level present in both graphs and every edge `(s, t, w_b)` of
/// `b`:
/// - if `a` has `(s, t)` with weight `w_a`, it becomes `w_a + (w_b - w_a) · λ`
/// - otherwise `(s, t, w_b)` is inserted
///
/// `λ = 0` keeps `a`'s weights and only adds `b`'s missing edges; `λ = 1`
/// adopts `b`'s weight on every edge `b` has. Levels absent from `a` are
/// not created.
pub fn merge(a: &mut NGramGraph, b: &NGramGraph, learning_rate: f64) {
    let mut updated = 0usize;
    let mut inserted = 0usize;

    for (n, level_a) in a.levels_mut() {
        let Some(level_b) = b.level(n) else { continue };
        let (u, i) = merge_level(level_a, level_b, learning_rate);
        updated += u;
        inserted += i;
    }

    tracing::debug!(learning_rate, updated, inserted, "Merged graphs");
}

fn merge_level(a: &mut UniqueGraph, b: &UniqueGraph, learning_rate: f64) -> (usize, usize) {
    let mut cache = EdgeLocatorCache::new();
    let mut updated = 0;
    let mut inserted = 0;

    for e in b.edges() {
        match cache.locate_directed_key(a, e.source, e.target) {
            Some((key, old)) => {
                a.set_weight_by_key(key, old + (e.weight - old) * learning_rate);
                updated += 1;
            }
            None => {
                // Known absent, so add_edge inserts
                if a.add_edge(e.source, e.target, e.weight) {
                    cache.added_edge(a, &e.to_edge());
                    inserted += 1;
                }
            }
        }
    }
    (updated, inserted)
}

/// Representative graph of a class: every edge weight is the running
/// average over the graphs that contain it.
///
/// Starts from a copy of the first graph and merges graph `i` with
/// `λ = 1 / (i + 1)`. Returns `None` for an empty slice.
pub fn representative(graphs: &[NGramGraph]) -> Option<NGramGraph> {
    let (first, rest) = graphs.split_first()?;
    let mut rep = first.clone();
    for (i, g) in rest.iter().enumerate() {
        merge(&mut rep, g, 1.0 / (i + 2) as f64);
    }
    Some(rep)
}
