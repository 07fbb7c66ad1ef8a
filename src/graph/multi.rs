//! Multi-level n-gram graph.
//!
//! An `NGramGraph` holds one [`UniqueGraph`] per n-gram size in
//! `[min_n, max_n]`, the text it was built from, and a side table counting
//! how often each edge has matched during [`crate::algebra::degrade`].
//!
//! The levels are rebuilt from scratch whenever the text is set; there is
//! no incremental update.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::builder::GraphBuilder;
use crate::graph::UniqueGraph;
use crate::policy::{ConfigError, GraphConfig, WindowPolicy};

/// Degradation counter of one edge, as serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedEdge {
    /// Source label.
    pub source: String,
    /// Target label.
    pub target: String,
    /// Number of times the edge matched during degrade.
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NGramGraphRecord {
    config: GraphConfig,
    data: String,
    levels: Vec<UniqueGraph>,
    degraded: Vec<DegradedEdge>,
}

/// Multi-level n-gram graph over a source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NGramGraphRecord", into = "NGramGraphRecord")]
pub struct NGramGraph {
    config: GraphConfig,
    data: String,
    /// `levels[i]` holds n-gram size `config.min_n + i`.
    levels: Vec<UniqueGraph>,
    degraded: HashMap<(String, String), u32>,
}

impl NGramGraph {
    /// Build a graph from `text`.
    pub fn new(text: &str, config: GraphConfig) -> Result<Self, ConfigError> {
        let builder = GraphBuilder::new(config)?;
        let levels = builder.build_levels(text);
        Ok(Self {
            config: builder.config().clone(),
            data: text.to_string(),
            levels,
            degraded: HashMap::new(),
        })
    }

    /// Build a plain-window graph from `text`.
    pub fn with_params(text: &str, min_n: usize, max_n: usize, window: usize) -> Result<Self, ConfigError> {
        Self::new(text, GraphConfig::new(min_n, max_n, window, WindowPolicy::Plain)?)
    }

    /// An empty graph with every level present but no vertices.
    pub fn empty(config: GraphConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::empty_unchecked(config))
    }

    fn empty_unchecked(config: GraphConfig) -> Self {
        let levels = (0..config.level_count()).map(|_| UniqueGraph::new()).collect();
        Self {
            config,
            data: String::new(),
            levels,
            degraded: HashMap::new(),
        }
    }

    /// An empty graph with the same configuration as this one.
    pub fn empty_like(&self) -> Self {
        Self::empty_unchecked(self.config.clone())
    }

    /// Replace the source text and rebuild every level.
    ///
    /// Degradation counters refer to the old edges and are cleared.
    pub fn set_data_string(&mut self, text: &str) {
        // Config was validated when this graph was created
        let builder = GraphBuilder::from_validated(self.config.clone());
        self.levels = builder.build_levels(text);
        self.data = text.to_string();
        self.degraded.clear();
    }

    /// Source text.
    pub fn data_string(&self) -> &str {
        &self.data
    }

    /// Configuration used to build the levels.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Smallest n-gram size.
    pub fn min_size(&self) -> usize {
        self.config.min_n
    }

    /// Largest n-gram size.
    pub fn max_size(&self) -> usize {
        self.config.max_n
    }

    /// Correlation window.
    pub fn window(&self) -> usize {
        self.config.window
    }

    /// Graph for n-gram size `n`.
    pub fn level(&self, n: usize) -> Option<&UniqueGraph> {
        n.checked_sub(self.config.min_n)
            .and_then(|i| self.levels.get(i))
    }

    /// Mutable graph for n-gram size `n`.
    pub fn level_mut(&mut self, n: usize) -> Option<&mut UniqueGraph> {
        n.checked_sub(self.config.min_n)
            .and_then(move |i| self.levels.get_mut(i))
    }

    /// `(n, graph)` pairs from `min_n` to `max_n`.
    pub fn levels(&self) -> impl Iterator<Item = (usize, &UniqueGraph)> {
        let min = self.config.min_n;
        self.levels.iter().enumerate().map(move |(i, g)| (min + i, g))
    }

    /// Mutable `(n, graph)` pairs from `min_n` to `max_n`.
    pub fn levels_mut(&mut self) -> impl Iterator<Item = (usize, &mut UniqueGraph)> {
        let min = self.config.min_n;
        self.levels.iter_mut().enumerate().map(move |(i, g)| (min + i, g))
    }

    /// True when every level is empty.
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(UniqueGraph::is_empty)
    }

    /// Edges across all levels.
    pub fn total_edge_count(&self) -> usize {
        self.levels.iter().map(UniqueGraph::edge_count).sum()
    }

    /// Vertices across all levels.
    pub fn total_vertex_count(&self) -> usize {
        self.levels.iter().map(UniqueGraph::vertex_count).sum()
    }

    /// How many times `source → target` has matched during degrade.
    pub fn degradation_degree(&self, source: &str, target: &str) -> u32 {
        // Avoid allocating a key for the common empty case
        if self.degraded.is_empty() {
            return 0;
        }
        self.degraded
            .get(&(source.to_string(), target.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Increment the degradation counter of `source → target`, returning the new count.
    pub fn record_degradation(&mut self, source: &str, target: &str) -> u32 {
        let count = self.degraded
            .entry((source.to_string(), target.to_string()))
            .or_insert(0);
        *count += 1;
        *count
    }

    /// All degradation counters, sorted by (source, target).
    pub fn degraded_edges(&self) -> Vec<DegradedEdge> {
        let mut edges: Vec<DegradedEdge> = self.degraded
            .iter()
            .map(|((source, target), count)| DegradedEdge {
                source: source.clone(),
                target: target.clone(),
                count: *count,
            })
            .collect();
        edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
        edges
    }

    /// Forget all degradation counters.
    pub fn clear_degradation(&mut self) {
        self.degraded.clear();
    }

    /// Remove low-importance vertices in place. See [`crate::algebra::prune`].
    pub fn prune_in_place(&mut self, threshold: f64) -> usize {
        crate::algebra::prune_in_place(self, threshold)
    }
}

/// Structural equality: same n-gram range and equal levels. Source text
/// and degradation counters are not compared.
impl PartialEq for NGramGraph {
    fn eq(&self, other: &Self) -> bool {
        self.config.min_n == other.config.min_n
            && self.config.max_n == other.config.max_n
            && self.levels == other.levels
    }
}

impl TryFrom<NGramGraphRecord> for NGramGraph {
    type Error = ConfigError;

    fn try_from(record: NGramGraphRecord) -> Result<Self, Self::Error> {
        record.config.validate()?;
        let mut levels = record.levels;
        levels.resize_with(record.config.level_count(), UniqueGraph::new);
        let degraded = record.degraded
            .into_iter()
            .map(|d| ((d.source, d.target), d.count))
            .collect();
        Ok(Self {
            config: record.config,
            data: record.data,
            levels,
            degraded,
        })
    }
}

impl From<NGramGraph> for NGramGraphRecord {
    fn from(graph: NGramGraph) -> Self {
        Self {
            degraded: graph.degraded_edges(),
            config: graph.config,
            data: graph.data,
            levels: graph.levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_cover_range() {
        let g = NGramGraph::with_params("ACTAGTACG", 2, 4, 3).unwrap();

        let sizes: Vec<usize> = g.levels().map(|(n, _)| n).collect();
        assert_eq!(sizes, vec![2, 3, 4]);
        assert!(g.level(1).is_none());
        assert!(g.level(5).is_none());
        assert!(g.level(3).unwrap().contains_vertex("ACT"));
    }

    #[test]
    fn test_level_longer_than_text_is_empty() {
        let g = NGramGraph::with_params("ACTA", 2, 5, 2).unwrap();

        assert!(g.level(5).unwrap().is_empty());
        assert!(!g.level(4).unwrap().is_empty());
        assert!(!g.level(2).unwrap().is_empty());
        assert!(!g.is_empty());
    }

    #[test]
    fn test_set_data_string_rebuilds() {
        let mut g = NGramGraph::with_params("ACTAGT", 3, 3, 3).unwrap();
        g.record_degradation("CTA", "ACT");

        g.set_data_string("GGGCCC");
        assert_eq!(g.data_string(), "GGGCCC");
        assert!(!g.level(3).unwrap().contains_vertex("ACT"));
        assert!(g.level(3).unwrap().contains_vertex("GGC"));
        assert_eq!(g.degradation_degree("CTA", "ACT"), 0);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        assert_eq!(
            NGramGraph::with_params("ACTAGT", 4, 3, 3).unwrap_err(),
            ConfigError::InvertedRange { min: 4, max: 3 }
        );
        assert_eq!(
            NGramGraph::with_params("ACTAGT", 3, 3, 0).unwrap_err(),
            ConfigError::NonPositiveWindow
        );
    }

    #[test]
    fn test_clone_is_deep() {
        let g = NGramGraph::with_params("ACTAGT", 3, 3, 3).unwrap();
        let mut copy = g.clone();
        assert_eq!(g, copy);

        copy.level_mut(3).unwrap().set_edge_weight("CTA", "ACT", 5.0);
        assert_eq!(g.level(3).unwrap().edge_weight("CTA", "ACT"), Some(1.0));
        assert_ne!(g, copy);
    }

    #[test]
    fn test_degradation_counters() {
        let mut g = NGramGraph::with_params("ACTAGT", 3, 3, 3).unwrap();
        assert_eq!(g.degradation_degree("CTA", "ACT"), 0);
        assert_eq!(g.record_degradation("CTA", "ACT"), 1);
        assert_eq!(g.record_degradation("CTA", "ACT"), 2);
        assert_eq!(g.degradation_degree("CTA", "ACT"), 2);
        assert_eq!(g.degradation_degree("ACT", "CTA"), 0);

        g.clear_degradation();
        assert!(g.degraded_edges().is_empty());
    }

    #[test]
    fn test_serde_roundtrip_keeps_degradation() {
        let mut g = NGramGraph::with_params("ACTAGTAC", 2, 3, 2).unwrap();
        g.record_degradation("CTA", "ACT");

        let json = serde_json::to_string(&g).unwrap();
        let back: NGramGraph = serde_json::from_str(&json).unwrap();

        assert_eq!(g, back);
        assert_eq!(back.data_string(), "ACTAGTAC");
        assert_eq!(back.degradation_degree("CTA", "ACT"), 1);
    }

    #[test]
    fn test_empty_like() {
        let g = NGramGraph::with_params("ACTAGT", 2, 3, 3).unwrap();
        let e = g.empty_like();
        assert!(e.is_empty());
        assert_eq!(e.levels().count(), 2);
        assert_eq!(e.config(), g.config());
    }
}
