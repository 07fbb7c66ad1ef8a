//! Multi-level graph algebra.
//!
//! Every operation walks the levels both operands share (same n-gram size)
//! and leaves the rest alone. Operations return new graphs unless their
//! name says otherwise:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`merge`] | blends `b` into `a` **in place** |
//! | [`representative`] | running-average merge of a class of graphs |
//! | [`intersect`] | pairs in both, mean weight |
//! | [`inverse_intersect`] | union minus intersection, union seeded from `a` |
//! | [`intersect_and_delta`] | both of the above, union seeded from the larger graph |
//! | [`all_not_in`] | pairs of `a` absent from `b` |
//! | [`degrade`] | bumps `a`'s degradation counters **in place** |
//! | [`prune`] | drops low coexistence-importance vertices |
//!
//! Each call owns its own [`EdgeLocatorCache`](crate::graph::EdgeLocatorCache)
//! for the graph it probes.

mod merge;
mod intersect;
mod degrade;
mod prune;

pub use merge::{merge, representative};
pub use intersect::{all_not_in, intersect, intersect_and_delta, inverse_intersect};
pub use degrade::degrade;
pub use prune::{coexistence_importance, prune, prune_in_place, PRUNE_SENTINEL};

use crate::graph::UniqueGraph;
use crate::types::Edge;

/// Remove `edges` from `graph`, tolerating pairs already gone.
fn remove_all(graph: &mut UniqueGraph, edges: &[Edge]) -> usize {
    let mut removed = 0;
    for edge in edges {
        match graph.remove_edge(&edge.source, &edge.target) {
            Some(_) => removed += 1,
            None => tracing::trace!(edge = %edge, "Edge already removed"),
        }
    }
    removed
}
