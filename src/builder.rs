//! N-gram graph construction.
//!
//! One builder covers all window policies; the policy only decides which
//! preceding tokens count as neighbors, how much each co-occurrence
//! weighs, and whether the edge is recorded in both directions.
//!
//! ## Algorithm (one level, n-gram size `n`)
//!
//! 1. Slide a window of `n` characters over the text, producing tokens
//! 2. For token `i`, visit the preceding tokens inside the policy horizon
//! 3. For each neighbor `j`, add the neighbor weight to `token[i] → token[j]`
//!    (and `token[j] → token[i]` for symmetric policies), accumulating on
//!    repeated co-occurrence
//! 4. A token without neighbors is still inserted as an isolated vertex
//!
//! Text shorter than `n` characters leaves the level empty.

use crate::graph::{CacheConfig, EdgeLocatorCache, UniqueGraph};
use crate::policy::{neighbors_of, ConfigError, GraphConfig};
use crate::types::Edge;

/// Split `text` into overlapping character n-grams.
///
/// Returns an empty vector when `n` is zero or the text is shorter than `n`.
pub fn extract_ngrams(text: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    ngrams_of(&chars, n)
}

fn ngrams_of(chars: &[char], n: usize) -> Vec<String> {
    if n == 0 || chars.len() < n {
        return Vec::new();
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}

/// Builds one graph level per configured n-gram size.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: GraphConfig,
    cache_config: CacheConfig,
}

impl GraphBuilder {
    /// Create a builder after validating the configuration.
    pub fn new(config: GraphConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub(crate) fn from_validated(config: GraphConfig) -> Self {
        Self {
            config,
            cache_config: CacheConfig::default(),
        }
    }

    /// Use a custom edge cache configuration during construction.
    pub fn with_cache_config(mut self, cache_config: CacheConfig) -> Self {
        self.cache_config = cache_config;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Build every level, ordered from `min_n` to `max_n`.
    pub fn build_levels(&self, text: &str) -> Vec<UniqueGraph> {
        let chars: Vec<char> = text.chars().collect();
        self.config
            .sizes()
            .map(|n| self.build_from_chars(&chars, n))
            .collect()
    }

    /// Build the graph for a single n-gram size.
    pub fn build_level(&self, text: &str, n: usize) -> UniqueGraph {
        let chars: Vec<char> = text.chars().collect();
        self.build_from_chars(&chars, n)
    }

    fn build_from_chars(&self, chars: &[char], n: usize) -> UniqueGraph {
        let tokens = ngrams_of(chars, n);
        let policy = self.config.policy;
        let mut graph = UniqueGraph::with_capacity(tokens.len());
        let mut cache = EdgeLocatorCache::with_config(self.cache_config.clone());

        for (i, token) in tokens.iter().enumerate() {
            let mut connected = false;
            for neighbor in neighbors_of(&policy, self.config.window, i) {
                let other = &tokens[neighbor.position];
                accumulate(&mut graph, &mut cache, token, other, neighbor.weight);
                if policy.is_symmetric() {
                    accumulate(&mut graph, &mut cache, other, token, neighbor.weight);
                }
                connected = true;
            }
            if !connected {
                graph.add_vertex(token);
            }
        }

        tracing::debug!(
            n,
            policy = policy.name(),
            tokens = tokens.len(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            cache_success = cache.success_ratio(),
            "Built n-gram graph level"
        );

        graph
    }
}

/// Add `weight` to `source → target`.
fn accumulate(
    graph: &mut UniqueGraph,
    cache: &mut EdgeLocatorCache,
    source: &str,
    target: &str,
    weight: f64,
) {
    match cache.locate_directed_key(graph, source, target) {
        Some((key, current)) => {
            graph.set_weight_by_key(key, current + weight);
        }
        None => {
            // Pair is known absent, so add_edge inserts rather than rejects
            graph.add_edge(source, target, weight);
            cache.added_edge(graph, &Edge::new(source, target, weight));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::WindowPolicy;

    fn builder(min_n: usize, max_n: usize, window: usize, policy: WindowPolicy) -> GraphBuilder {
        GraphBuilder::new(GraphConfig::new(min_n, max_n, window, policy).unwrap()).unwrap()
    }

    #[test]
    fn test_extract_ngrams() {
        assert_eq!(extract_ngrams("ACTAGT", 3), vec!["ACT", "CTA", "TAG", "AGT"]);
        assert!(extract_ngrams("AC", 3).is_empty());
        assert_eq!(extract_ngrams("ACT", 3), vec!["ACT"]);
    }

    #[test]
    fn test_extract_ngrams_unicode() {
        assert_eq!(extract_ngrams("ñäö", 2), vec!["ñä", "äö"]);
    }

    #[test]
    fn test_plain_window_edges() {
        let g = builder(3, 3, 3, WindowPolicy::Plain).build_level("ACTAGT", 3);

        let edges: Vec<(String, String, f64)> = g
            .to_edges()
            .into_iter()
            .map(|e| (e.source, e.target, e.weight))
            .collect();

        let expected = vec![
            ("AGT".to_string(), "ACT".to_string(), 1.0),
            ("AGT".to_string(), "CTA".to_string(), 1.0),
            ("AGT".to_string(), "TAG".to_string(), 1.0),
            ("CTA".to_string(), "ACT".to_string(), 1.0),
            ("TAG".to_string(), "ACT".to_string(), 1.0),
            ("TAG".to_string(), "CTA".to_string(), 1.0),
        ];
        assert_eq!(edges, expected);
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn test_repeated_cooccurrence_accumulates() {
        let g = builder(3, 3, 3, WindowPolicy::Plain).build_level("ACTACTA", 3);

        assert_eq!(g.edge_weight("CTA", "ACT"), Some(2.0));
        assert_eq!(g.edge_weight("ACT", "ACT"), Some(1.0), "Repeated n-gram links to itself");
    }

    #[test]
    fn test_window_bounds_neighbors() {
        let g = builder(1, 1, 1, WindowPolicy::Plain).build_level("ABC", 1);

        assert_eq!(g.edge_count(), 2);
        assert!(g.contains_edge("B", "A"));
        assert!(g.contains_edge("C", "B"));
        assert!(!g.contains_edge("C", "A"));
    }

    #[test]
    fn test_symmetric_window() {
        let g = builder(1, 1, 2, WindowPolicy::Symmetric).build_level("ABC", 1);

        for (s, t) in [("A", "B"), ("B", "A"), ("A", "C"), ("C", "A"), ("B", "C"), ("C", "B")] {
            assert_eq!(g.edge_weight(s, t), Some(1.0), "{s}->{t}");
        }
    }

    #[test]
    fn test_gaussian_window() {
        let g = builder(1, 1, 1, WindowPolicy::gaussian_for(1)).build_level("ABCD", 1);

        // Horizon is 3 tokens: D reaches back to A
        let near = g.edge_weight("D", "C").unwrap();
        let far = g.edge_weight("D", "A").unwrap();
        assert!((near - (-0.5f64).exp()).abs() < 1e-12);
        assert!((far - (-4.5f64).exp()).abs() < 1e-12);
        assert_eq!(g.edge_weight("A", "D"), Some(far), "Gaussian edges are symmetric");
    }

    #[test]
    fn test_single_token_is_isolated_vertex() {
        let g = builder(3, 3, 3, WindowPolicy::Plain).build_level("ACT", 3);
        assert_eq!(g.vertex_count(), 1);
        assert_eq!(g.edge_count(), 0);
        assert!(g.contains_vertex("ACT"));
    }

    #[test]
    fn test_short_text_leaves_level_empty() {
        let levels = builder(1, 4, 2, WindowPolicy::Plain).build_levels("ABC");

        assert_eq!(levels.len(), 4);
        assert!(!levels[0].is_empty());
        assert!(!levels[2].is_empty());
        assert!(levels[3].is_empty());
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        let config = GraphConfig::default().with_window(0);
        assert!(GraphBuilder::new(config).is_err());
    }

    #[test]
    fn test_huge_gaussian_window_builds() {
        let config = GraphConfig::new(1, 1, usize::MAX / 2, WindowPolicy::Gaussian { sigma: 1.0 }).unwrap();
        let g = GraphBuilder::new(config).unwrap().build_level("ABC", 1);

        assert_eq!(g.vertex_count(), 3);
        assert!(g.contains_edge("C", "A"));
        assert!(g.contains_edge("A", "C"));
    }

    #[test]
    fn test_build_without_cache_matches() {
        let text = "the quick brown fox jumps over the lazy dog";
        let cached = builder(2, 3, 4, WindowPolicy::Symmetric);
        let uncached = cached.clone().with_cache_config(CacheConfig {
            max_entries: 1,
            enabled: false,
        });

        assert_eq!(cached.build_levels(text), uncached.build_levels(text));
    }
}
