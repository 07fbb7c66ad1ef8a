//! All-pairs similarity over a corpus of graphs.
//!
//! Computes the similarity matrix of a set of graphs and the near-duplicate
//! pairs above a threshold. Both carry a content hash so reports can be
//! compared across runs.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::graph::NGramGraph;
use crate::similarity::{GraphSimilarity, SimilarityComparator};

/// Row-major `n × n` matrix; entry `(i, j)` compares graph `i` to graph `j`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    /// Number of graphs.
    pub size: usize,
    /// Row-major entries.
    pub entries: Vec<GraphSimilarity>,
    /// Content hash for integrity verification.
    pub matrix_hash: String,
}

impl SimilarityMatrix {
    fn new(size: usize, entries: Vec<GraphSimilarity>) -> Self {
        let matrix_hash = canonical_hash_hex(&entries);
        Self {
            size,
            entries,
            matrix_hash,
        }
    }

    /// Similarity of graph `i` to graph `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<&GraphSimilarity> {
        if i >= self.size || j >= self.size {
            return None;
        }
        self.entries.get(i * self.size + j)
    }

    /// Overall similarity of graph `i` to graph `j`, 0.0 out of range.
    pub fn overall(&self, i: usize, j: usize) -> f64 {
        self.get(i, j).map(GraphSimilarity::overall).unwrap_or(0.0)
    }

    /// Most similar other graph to `i`; ties go to the lower index.
    pub fn nearest(&self, i: usize) -> Option<(usize, f64)> {
        (0..self.size)
            .filter(|j| *j != i)
            .map(|j| (j, self.overall(i, j)))
            .fold(None, |best, (j, s)| match best {
                Some((_, b)) if b >= s => best,
                _ => Some((j, s)),
            })
    }
}

/// Two graphs whose overall similarity reaches the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearDuplicatePair {
    /// Lower graph index.
    pub a: usize,
    /// Higher graph index.
    pub b: usize,
    /// Overall similarity of `a` to `b`.
    pub similarity: f64,
}

/// Near-duplicate pairs of a corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusReport {
    /// Pairs at or above the threshold, most similar first.
    pub pairs: Vec<NearDuplicatePair>,
    /// Number of graphs compared.
    pub graph_count: usize,
    /// Threshold used.
    pub min_similarity: f64,
    /// Content hash for integrity verification.
    pub report_hash: String,
}

impl CorpusReport {
    /// Pairs involving graph `i`.
    pub fn pairs_for(&self, i: usize) -> Vec<&NearDuplicatePair> {
        self.pairs.iter().filter(|p| p.a == i || p.b == i).collect()
    }

    /// Groups of graphs connected through near-duplicate pairs, each sorted,
    /// ordered by their smallest member. Singletons are included.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut parent: Vec<usize> = (0..self.graph_count).collect();
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }
        for pair in &self.pairs {
            let (ra, rb) = (find(&mut parent, pair.a), find(&mut parent, pair.b));
            if ra != rb {
                parent[ra.max(rb)] = ra.min(rb);
            }
        }

        let mut clusters: Vec<Vec<usize>> = Vec::new();
        let mut slot: Vec<Option<usize>> = vec![None; self.graph_count];
        for i in 0..self.graph_count {
            let root = find(&mut parent, i);
            match slot[root] {
                Some(c) => clusters[c].push(i),
                None => {
                    slot[root] = Some(clusters.len());
                    clusters.push(vec![i]);
                }
            }
        }
        clusters
    }
}

/// Analyzer for corpus-wide similarity.
#[derive(Debug, Clone, Default)]
pub struct CorpusAnalyzer {
    /// Minimum overall similarity for a near-duplicate pair.
    pub min_similarity: f64,
    comparator: SimilarityComparator,
}

impl CorpusAnalyzer {
    /// Create an analyzer that reports every pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with a minimum similarity threshold.
    pub fn with_min_similarity(min_similarity: f64) -> Self {
        Self {
            min_similarity,
            comparator: SimilarityComparator::new(),
        }
    }

    /// Compare every graph with every graph.
    pub fn matrix(&self, graphs: &[NGramGraph]) -> SimilarityMatrix {
        let entries = graphs
            .iter()
            .flat_map(|a| graphs.iter().map(move |b| (a, b)))
            .map(|(a, b)| self.comparator.compare(a, b))
            .collect();
        SimilarityMatrix::new(graphs.len(), entries)
    }

    /// Near-duplicate pairs of `graphs`.
    pub fn compute(&self, graphs: &[NGramGraph]) -> CorpusReport {
        let mut pairs = Vec::new();
        for i in 0..graphs.len() {
            for j in (i + 1)..graphs.len() {
                let similarity = self.comparator.compare(&graphs[i], &graphs[j]).overall();
                if similarity >= self.min_similarity {
                    pairs.push(NearDuplicatePair { a: i, b: j, similarity });
                }
            }
        }

        // Sort for determinism
        pairs.sort_by(|x, y| {
            y.similarity
                .total_cmp(&x.similarity)
                .then_with(|| (x.a, x.b).cmp(&(y.a, y.b)))
        });

        tracing::debug!(
            graphs = graphs.len(),
            pairs = pairs.len(),
            min_similarity = self.min_similarity,
            "Computed near-duplicate pairs"
        );

        let report_hash = canonical_hash_hex(&pairs);
        CorpusReport {
            pairs,
            graph_count: graphs.len(),
            min_similarity: self.min_similarity,
            report_hash,
        }
    }
}
