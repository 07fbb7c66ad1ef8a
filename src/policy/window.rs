//! Graph construction configuration: n-gram range, correlation window and
//! window policy.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! The Gaussian `sigma` is quantized to an integer before hashing so that
//! `params_hash` is stable across platforms and serializer settings. The
//! quantization factor is 1e6 (multiply by 1,000,000 and round to i64).

use serde::{Deserialize, Serialize};
use crate::canonical::canonical_hash_hex;

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Horizon multiplier for the Gaussian window (neighbors up to `3 × window` back).
pub const GAUSSIAN_HORIZON_FACTOR: usize = 3;

/// Configuration errors. Raised at construction, never deferred.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Minimum n-gram size must be at least 1.
    #[error("Minimum n-gram size must be at least 1")]
    InvalidMinSize,
    /// Maximum n-gram size is below the minimum.
    #[error("Maximum n-gram size {max} is below minimum {min}")]
    InvertedRange {
        /// Configured minimum size.
        min: usize,
        /// Configured maximum size.
        max: usize,
    },
    /// Correlation window must be positive.
    #[error("Correlation window must be positive")]
    NonPositiveWindow,
    /// Gaussian sigma must be finite and positive.
    #[error("Gaussian sigma must be finite and positive, got {0}")]
    InvalidSigma(f64),
    /// Projection alphabet is empty.
    #[error("Projection alphabet is empty")]
    EmptyAlphabet,
    /// Projection alphabet lists a symbol twice.
    #[error("Projection alphabet contains duplicate symbol {0:?}")]
    DuplicateAlphabetSymbol(char),
    /// Projection rank must be at least 1.
    #[error("Projection rank must be at least 1")]
    InvalidRank,
    /// Projection target dimension must be at least 1.
    #[error("Projection target dimension must be at least 1")]
    InvalidTargetDimension,
    /// Projection feature space exceeds the supported size.
    #[error("Projection feature dimension {dimension} exceeds the supported maximum")]
    ProjectionTooLarge {
        /// Requested feature dimension (saturated on overflow).
        dimension: u64,
    },
}

/// How co-occurring n-grams inside the correlation window are connected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Directed edge from the current n-gram to each of the last `window`
    /// n-grams, +1.0 per co-occurrence.
    Plain,
    /// Edges in both directions between the current n-gram and each of the
    /// last `window` n-grams, +1.0 each way.
    Symmetric,
    /// Symmetric edges to the last `3 × window` n-grams weighted by
    /// `exp(-d² / (2σ²))` for token distance `d`.
    Gaussian {
        /// Standard deviation of the distance kernel, in tokens.
        sigma: f64,
    },
}

impl WindowPolicy {
    /// Gaussian policy whose sigma equals the correlation window.
    pub fn gaussian_for(window: usize) -> Self {
        Self::Gaussian { sigma: window as f64 }
    }

    /// Policy name as used in logs and hashes.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Symmetric => "symmetric",
            Self::Gaussian { .. } => "gaussian",
        }
    }

    /// Whether the policy records edges in both directions.
    pub fn is_symmetric(&self) -> bool {
        !matches!(self, Self::Plain)
    }

    /// Number of preceding tokens considered for a correlation window.
    /// Saturates at `usize::MAX`.
    pub fn horizon(&self, window: usize) -> usize {
        match self {
            Self::Plain | Self::Symmetric => window,
            Self::Gaussian { .. } => window.saturating_mul(GAUSSIAN_HORIZON_FACTOR),
        }
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::Plain
    }
}

/// Quantized configuration for deterministic hashing.
#[derive(Debug, Clone, Serialize)]
struct QuantizedConfig {
    min_n: usize,
    max_n: usize,
    window: usize,
    policy: &'static str,
    sigma: i64,
}

/// Configuration of an n-gram graph.
///
/// ## Parameters
///
/// - `min_n`, `max_n`: inclusive n-gram size range, one graph level per size
/// - `window`: correlation window in tokens
/// - `policy`: how co-occurrences inside the window become edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Smallest n-gram size.
    pub min_n: usize,
    /// Largest n-gram size.
    pub max_n: usize,
    /// Correlation window.
    pub window: usize,
    /// Window policy.
    pub policy: WindowPolicy,
}

impl GraphConfig {
    /// Create and validate a configuration.
    pub fn new(min_n: usize, max_n: usize, window: usize, policy: WindowPolicy) -> Result<Self, ConfigError> {
        let config = Self {
            min_n,
            max_n,
            window,
            policy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the n-gram size range.
    pub fn with_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.min_n = min_n;
        self.max_n = max_n;
        self
    }

    /// Set the correlation window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the window policy.
    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check the configuration for values that would silently yield empty graphs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_n == 0 {
            return Err(ConfigError::InvalidMinSize);
        }
        if self.max_n < self.min_n {
            return Err(ConfigError::InvertedRange {
                min: self.min_n,
                max: self.max_n,
            });
        }
        if self.window == 0 {
            return Err(ConfigError::NonPositiveWindow);
        }
        if let WindowPolicy::Gaussian { sigma } = self.policy {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(ConfigError::InvalidSigma(sigma));
            }
        }
        Ok(())
    }

    /// Number of levels (`max_n - min_n + 1`).
    pub fn level_count(&self) -> usize {
        self.max_n.saturating_sub(self.min_n) + 1
    }

    /// Iterate the n-gram sizes covered by this configuration.
    pub fn sizes(&self) -> std::ops::RangeInclusive<usize> {
        self.min_n..=self.max_n
    }

    /// Compute a hash of the configuration parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&self.to_quantized())
    }

    fn to_quantized(&self) -> QuantizedConfig {
        let sigma = match self.policy {
            WindowPolicy::Gaussian { sigma } => quantize_float(sigma),
            _ => 0,
        };
        QuantizedConfig {
            min_n: self.min_n,
            max_n: self.max_n,
            window: self.window,
            policy: self.policy.name(),
            sigma,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            min_n: 3,
            max_n: 3,
            window: 3,
            policy: WindowPolicy::Plain,
        }
    }
}

/// Quantize a float to an i64 for deterministic hashing.
fn quantize_float(value: f64) -> i64 {
    (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
}
