//! Sparse random projection of graph adjacency.
//!
//! A level built with n-gram size `rank` over an alphabet of `A` symbols
//! has at most `A^rank` distinct vertices, so its adjacency flattens into a
//! feature vector of dimension `D = (A^rank)²`, indexed by
//! `index(source) · A^rank + index(target)`.
//!
//! The projection matrix has shape `D × target_dim` with entries
//!
//! ```text
//! +1  with probability 1 / (2√D)
//! -1  with probability 1 / (2√D)
//!  0  otherwise
//! ```
//!
//! It is drawn once per comparator from a seeded `StdRng` and stored row
//! by row in compressed sparse form. Projecting a graph only touches the
//! rows of its edges.

use std::collections::HashMap;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::graph::{NGramGraph, UniqueGraph};
use crate::policy::ConfigError;

/// Largest supported feature dimension `D`.
pub const MAX_FEATURE_DIMENSION: u64 = 1 << 24;

/// Largest supported `D × target_dim`.
pub const MAX_PROJECTION_CELLS: u64 = 1 << 28;

/// Default projection seed.
pub const DEFAULT_PROJECTION_SEED: u64 = 0x6e67_7261_6d73;

/// Configuration of a sparse projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Symbols n-grams are drawn from; order fixes feature indices.
    pub alphabet: Vec<char>,
    /// N-gram size of the projected level.
    pub rank: usize,
    /// Dimension of projected vectors.
    pub target_dim: usize,
    /// Seed of the projection matrix.
    pub seed: u64,
}

impl ProjectionConfig {
    /// Create a configuration with the default seed.
    pub fn new(alphabet: &str, rank: usize, target_dim: usize) -> Self {
        Self {
            alphabet: alphabet.chars().collect(),
            rank,
            target_dim,
            seed: DEFAULT_PROJECTION_SEED,
        }
    }

    /// Nucleotide alphabet `ACGT`.
    pub fn dna(rank: usize, target_dim: usize) -> Self {
        Self::new("ACGT", rank, target_dim)
    }

    /// Use a different seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the configuration and return the feature dimension `D`.
    pub fn feature_dimension(&self) -> Result<u64, ConfigError> {
        if self.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        let mut seen = Vec::with_capacity(self.alphabet.len());
        for &symbol in &self.alphabet {
            if seen.contains(&symbol) {
                return Err(ConfigError::DuplicateAlphabetSymbol(symbol));
            }
            seen.push(symbol);
        }
        if self.rank == 0 {
            return Err(ConfigError::InvalidRank);
        }
        if self.target_dim == 0 {
            return Err(ConfigError::InvalidTargetDimension);
        }

        let too_large = |dimension| ConfigError::ProjectionTooLarge { dimension };
        let vertices = u32::try_from(self.rank)
            .ok()
            .and_then(|rank| (self.alphabet.len() as u64).checked_pow(rank))
            .ok_or(too_large(u64::MAX))?;
        let dimension = vertices.checked_mul(vertices).ok_or(too_large(u64::MAX))?;
        let cells = dimension.saturating_mul(self.target_dim as u64);
        if dimension > MAX_FEATURE_DIMENSION || cells > MAX_PROJECTION_CELLS {
            return Err(too_large(dimension));
        }
        Ok(dimension)
    }
}

/// Approximate graph distance through a sparse random projection.
#[derive(Debug, Clone)]
pub struct SparseProjectionComparator {
    config: ProjectionConfig,
    symbols: HashMap<char, u64>,
    vertex_space: u64,
    dimension: u64,
    /// `entries[row_offsets[r]..row_offsets[r + 1]]` holds row `r`.
    row_offsets: Vec<usize>,
    /// `(column, sign)` pairs.
    entries: Vec<(u32, i8)>,
}

impl SparseProjectionComparator {
    /// Draw the projection matrix for `config`.
    pub fn new(config: ProjectionConfig) -> Result<Self, ConfigError> {
        let dimension = config.feature_dimension()?;
        let symbols: HashMap<char, u64> = config
            .alphabet
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, i as u64))
            .collect();
        let vertex_space = (config.alphabet.len() as u64).pow(config.rank as u32);

        let probability = 1.0 / (2.0 * (dimension as f64).sqrt());
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut row_offsets = Vec::with_capacity(dimension as usize + 1);
        let mut entries = Vec::new();
        row_offsets.push(0);
        for _ in 0..dimension {
            for col in 0..config.target_dim {
                let u: f64 = rng.gen();
                if u < probability {
                    entries.push((col as u32, 1));
                } else if u < 2.0 * probability {
                    entries.push((col as u32, -1));
                }
            }
            row_offsets.push(entries.len());
        }

        tracing::debug!(
            dimension,
            target_dim = config.target_dim,
            nonzero = entries.len(),
            seed = config.seed,
            "Drew sparse projection matrix"
        );

        Ok(Self {
            config,
            symbols,
            vertex_space,
            dimension,
            row_offsets,
            entries,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Feature dimension `D`.
    pub fn dimension(&self) -> u64 {
        self.dimension
    }

    /// Number of nonzero matrix entries.
    pub fn nonzero_count(&self) -> usize {
        self.entries.len()
    }

    fn vertex_index(&self, label: &str) -> Option<u64> {
        let mut index = 0u64;
        let mut length = 0;
        for c in label.chars() {
            if length == self.config.rank {
                return None;
            }
            index = index * self.config.alphabet.len() as u64 + self.symbols.get(&c)?;
            length += 1;
        }
        (length == self.config.rank).then_some(index)
    }

    /// Feature index of the edge `source → target`, if both labels are
    /// `rank` symbols of the alphabet.
    pub fn feature_index(&self, source: &str, target: &str) -> Option<u64> {
        Some(self.vertex_index(source)? * self.vertex_space + self.vertex_index(target)?)
    }

    /// Project one level. Edges outside the feature space are ignored.
    pub fn project(&self, graph: &UniqueGraph) -> Vec<f64> {
        let mut projected = vec![0.0; self.config.target_dim];
        let mut skipped = 0usize;
        for e in graph.edges() {
            let Some(row) = self.feature_index(e.source, e.target) else {
                skipped += 1;
                continue;
            };
            let row = row as usize;
            for &(col, sign) in &self.entries[self.row_offsets[row]..self.row_offsets[row + 1]] {
                projected[col as usize] += e.weight * f64::from(sign);
            }
        }
        if skipped > 0 {
            tracing::trace!(skipped, "Edges outside projection alphabet");
        }
        projected
    }

    /// L1 distance between the projections of two levels.
    pub fn distance(&self, a: &UniqueGraph, b: &UniqueGraph) -> f64 {
        self.project(a)
            .iter()
            .zip(self.project(b))
            .map(|(x, y)| (x - y).abs())
            .sum()
    }

    /// Distance between the `rank` levels of two graphs; `None` if either
    /// lacks that level.
    pub fn compare(&self, a: &NGramGraph, b: &NGramGraph) -> Option<f64> {
        Some(self.distance(a.level(self.config.rank)?, b.level(self.config.rank)?))
    }
}
