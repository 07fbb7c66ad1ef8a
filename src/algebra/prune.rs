//! Coexistence-importance pruning.
//!
//! ```text
//! importance(v) = log10( (2 · maxW)^2.5 / max(1, (nbr / 2)^2) )
//! ```
//!
//! `maxW` is the largest incident edge weight and `nbr` the largest
//! neighbor count of `v` at any single level. Vertices with no weighted
//! edge get [`PRUNE_SENTINEL`], which is below any practical threshold.

use std::collections::HashMap;

use crate::graph::NGramGraph;

/// Importance of a vertex with no positive incident weight.
pub const PRUNE_SENTINEL: f64 = -200_000.0;

/// Coexistence importance from a vertex's maximum incident weight and
/// maximum neighbor count.
pub fn coexistence_importance(max_weight: f64, neighbor_count: usize) -> f64 {
    if max_weight <= 0.0 {
        return PRUNE_SENTINEL;
    }
    let half = neighbor_count as f64 / 2.0;
    let denominator = (half * half).max(1.0);
    ((2.0 * max_weight).powf(2.5) / denominator).log10()
}

/// Copy of `graph` without vertices whose importance is below `threshold`.
pub fn prune(graph: &NGramGraph, threshold: f64) -> NGramGraph {
    let mut result = graph.clone();
    prune_in_place(&mut result, threshold);
    result
}

/// Remove, from every level, vertices whose importance is below
/// `threshold`. Returns the number of vertex removals summed over levels.
pub fn prune_in_place(graph: &mut NGramGraph, threshold: f64) -> usize {
    let importance = importance_by_label(graph);

    let mut removed = 0;
    for (_, level) in graph.levels_mut() {
        removed += level.retain_vertices(|label| {
            importance.get(label).copied().unwrap_or(PRUNE_SENTINEL) >= threshold
        });
    }

    tracing::debug!(threshold, removed, "Pruned graph");
    removed
}

fn importance_by_label(graph: &NGramGraph) -> HashMap<String, f64> {
    let mut extremes: HashMap<String, (f64, usize)> = HashMap::new();
    for (_, level) in graph.levels() {
        for label in level.vertices() {
            let weight = level.max_incident_weight(label);
            let neighbors = level.neighbors(label).len();
            let entry = extremes.entry(label.to_string()).or_insert((0.0, 0));
            entry.0 = entry.0.max(weight);
            entry.1 = entry.1.max(neighbors);
        }
    }
    extremes
        .into_iter()
        .map(|(label, (w, n))| (label, coexistence_importance(w, n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_formula() {
        // (2 · 1)^2.5 / max(1, 1) = 5.657
        let v = coexistence_importance(1.0, 2);
        assert!((v - 2f64.powf(2.5).log10()).abs() < 1e-12);

        // More neighbors lowers importance
        assert!(coexistence_importance(1.0, 6) < v);
        // Heavier edges raise it
        assert!(coexistence_importance(3.0, 2) > v);
    }

    #[test]
    fn test_zero_weight_is_sentinel() {
        assert_eq!(coexistence_importance(0.0, 4), PRUNE_SENTINEL);
    }

    #[test]
    fn test_prune_removes_isolated_vertex() {
        let mut g = NGramGraph::with_params("ACT", 3, 3, 3).unwrap();
        assert_eq!(g.level(3).unwrap().vertex_count(), 1);

        assert_eq!(g.prune_in_place(-1000.0), 1);
        assert!(g.is_empty());
    }

    #[test]
    fn test_prune_threshold() {
        let g = NGramGraph::with_params("ACTACTA", 3, 3, 3).unwrap();

        // Everything has at least one edge of weight 1
        let kept = prune(&g, PRUNE_SENTINEL + 1.0);
        assert_eq!(kept, g);

        let gone = prune(&g, f64::INFINITY);
        assert!(gone.is_empty());
        assert!(!g.is_empty(), "prune copies");
    }

    #[test]
    fn test_prune_keeps_heavy_vertex() {
        // CTA→ACT has weight 2, so CTA and ACT outrank TAC
        let g = NGramGraph::with_params("ACTACTA", 3, 3, 3).unwrap();
        let level = g.level(3).unwrap();
        let act = coexistence_importance(level.max_incident_weight("ACT"), level.neighbors("ACT").len());
        let tac = coexistence_importance(level.max_incident_weight("TAC"), level.neighbors("TAC").len());
        assert!(act > tac);

        let pruned = prune(&g, (act + tac) / 2.0);
        let level = pruned.level(3).unwrap();
        assert!(level.contains_vertex("ACT"));
        assert!(!level.contains_vertex("TAC"));
    }
}
