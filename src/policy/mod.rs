//! Graph construction policy definitions.

pub mod window;
pub mod weighting;

pub use window::{ConfigError, GraphConfig, WindowPolicy, GAUSSIAN_HORIZON_FACTOR};
pub use weighting::{neighbor_weight, neighbors_of, Neighbor};
