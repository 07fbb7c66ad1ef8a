//! Core types for n-gram graphs.

pub mod edge;

pub use edge::{Edge, EdgeKey, EdgeRef, VertexId};
