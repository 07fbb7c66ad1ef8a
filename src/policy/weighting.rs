//! Co-occurrence weighting for graph construction.

use super::window::WindowPolicy;

/// Weight contributed by a neighbor `distance` tokens before the current one.
///
/// Formula:
/// ```text
/// plain, symmetric: 1.0
/// gaussian:         exp(-d² / (2σ²))
/// ```
///
/// Returns 0.0 for a distance of zero; a token is never its own neighbor.
pub fn neighbor_weight(policy: &WindowPolicy, distance: usize) -> f64 {
    if distance == 0 {
        return 0.0;
    }
    match policy {
        WindowPolicy::Plain | WindowPolicy::Symmetric => 1.0,
        WindowPolicy::Gaussian { sigma } => {
            let d = distance as f64;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        }
    }
}

/// One neighbor of the token at the current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the neighbor token.
    pub position: usize,
    /// Distance in tokens from the current position.
    pub distance: usize,
    /// Weight contributed by this co-occurrence.
    pub weight: f64,
}

/// Neighbors of `position` within the policy's horizon, nearest first.
pub fn neighbors_of(policy: &WindowPolicy, window: usize, position: usize) -> impl Iterator<Item = Neighbor> + '_ {
    let horizon = policy.horizon(window).min(position);
    (1..=horizon).map(move |distance| Neighbor {
        position: position - distance,
        distance,
        weight: neighbor_weight(policy, distance),
    })
}
