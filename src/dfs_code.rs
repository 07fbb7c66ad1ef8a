//! Depth-first structural encoding of one graph level.
//!
//! Traversal starts at the smallest label (or a given vertex) and uses an
//! explicit stack. Outgoing edges of the vertex being visited are taken in
//! target label order:
//!
//! - target not yet visited: `source->target` goes to the forward stream
//!   and the target is pushed
//! - target already visited: `source->target` goes to the backward stream
//!
//! A vertex popped a second time contributes nothing. When the stack runs
//! dry, the smallest undiscovered label starts a new component; its
//! entries are appended to the same streams.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::UniqueGraph;
use crate::types::VertexId;

/// DFS encoding of a graph level.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DfsCode {
    /// First vertex of each component, in traversal order.
    pub roots: Vec<String>,
    /// Tree edges, `source->target`.
    pub forward: Vec<String>,
    /// Edges into already visited vertices, `source->target`.
    pub backward: Vec<String>,
}

impl DfsCode {
    /// Number of components traversed.
    pub fn component_count(&self) -> usize {
        self.roots.len()
    }
}

impl fmt::Display for DfsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.roots.join(","),
            self.forward.join(","),
            self.backward.join(",")
        )
    }
}

/// Encode a level starting from its smallest label.
pub fn dfs_code(graph: &UniqueGraph) -> DfsCode {
    Encoder::new(graph).run(None)
}

/// Encode a level starting from `start`. `None` if `start` is absent.
pub fn dfs_code_from(graph: &UniqueGraph, start: &str) -> Option<DfsCode> {
    let id = graph.locate_vertex(start)?;
    Some(Encoder::new(graph).run(Some(id)))
}

struct Encoder<'a> {
    graph: &'a UniqueGraph,
    visited: Vec<bool>,
    code: DfsCode,
}

impl<'a> Encoder<'a> {
    fn new(graph: &'a UniqueGraph) -> Self {
        Self {
            graph,
            visited: vec![false; graph.vertex_count()],
            code: DfsCode::default(),
        }
    }

    fn label(&self, id: VertexId) -> &'a str {
        self.graph.label(id).unwrap_or_default()
    }

    fn run(mut self, start: Option<VertexId>) -> DfsCode {
        if let Some(id) = start {
            self.explore(id);
        }

        let mut order: Vec<VertexId> = (0..self.graph.vertex_count()).map(VertexId::new).collect();
        order.sort_by_key(|id| self.label(*id));
        for id in order {
            if !self.visited[id.index()] {
                self.explore(id);
            }
        }
        self.code
    }

    fn explore(&mut self, root: VertexId) {
        self.code.roots.push(self.label(root).to_string());
        let mut stack = vec![root];

        while let Some(v) = stack.pop() {
            if self.visited[v.index()] {
                continue;
            }
            self.visited[v.index()] = true;

            let source = self.label(v);
            let mut targets: Vec<VertexId> = self.graph.successors(v).to_vec();
            targets.sort_by_key(|t| self.label(*t));

            let mut discovered = Vec::new();
            for t in targets {
                let entry = format!("{}->{}", source, self.label(t));
                if self.visited[t.index()] {
                    self.code.backward.push(entry);
                } else {
                    self.code.forward.push(entry);
                    discovered.push(t);
                }
            }
            // Smallest target is popped first
            stack.extend(discovered.into_iter().rev());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NGramGraph;

    fn chain() -> UniqueGraph {
        let mut g = UniqueGraph::new();
        g.add_edge("B", "C", 1.0);
        g.add_edge("A", "C", 1.0);
        g.add_edge("A", "B", 1.0);
        g.add_edge("C", "A", 1.0);
        g
    }

    #[test]
    fn test_dfs_order() {
        let code = dfs_code(&chain());

        assert_eq!(code.roots, vec!["A"]);
        assert_eq!(code.forward, vec!["A->B", "A->C", "B->C"]);
        assert_eq!(code.backward, vec!["C->A"]);
        assert_eq!(code.to_string(), "A|A->B,A->C,B->C|C->A");
    }

    #[test]
    fn test_dfs_independent_of_insertion_order() {
        let mut g = UniqueGraph::new();
        g.add_edge("C", "A", 1.0);
        g.add_edge("A", "B", 1.0);
        g.add_edge("A", "C", 1.0);
        g.add_edge("B", "C", 1.0);

        assert_eq!(dfs_code(&g), dfs_code(&chain()));
    }

    #[test]
    fn test_disconnected_components_appended() {
        let mut g = chain();
        g.add_edge("Y", "X", 1.0);
        g.add_vertex("M");

        let code = dfs_code(&g);
        assert_eq!(code.roots, vec!["A", "M", "X", "Y"]);
        assert_eq!(code.component_count(), 4);
        assert_eq!(code.forward.last().map(String::as_str), Some("B->C"));
        assert_eq!(code.backward, vec!["C->A", "Y->X"]);
    }

    #[test]
    fn test_dfs_from_start() {
        let code = dfs_code_from(&chain(), "C").unwrap();
        assert_eq!(code.roots, vec!["C"]);
        assert_eq!(code.forward, vec!["C->A", "A->B"]);
        assert_eq!(code.backward, vec!["A->C", "B->C"]);

        assert!(dfs_code_from(&chain(), "Z").is_none());
    }

    #[test]
    fn test_dfs_empty() {
        let code = dfs_code(&UniqueGraph::new());
        assert_eq!(code, DfsCode::default());
        assert_eq!(code.to_string(), "||");
    }

    #[test]
    fn test_dfs_code_of_ngram_level_is_stable() {
        let g = NGramGraph::with_params("ACTAGTACT", 3, 3, 3).unwrap();
        let level = g.level(3).unwrap();
        assert_eq!(dfs_code(level), dfs_code(&level.clone()));
    }
}
