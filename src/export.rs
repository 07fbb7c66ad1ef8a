//! DOT rendering of one graph level for external tooling.
//!
//! Node identifiers are the vertex labels with every non-word character
//! replaced by `_`; edges carry their weight with two decimals. The output
//! is for visualization only and is not parsed back.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::graph::{NGramGraph, UniqueGraph};

/// Edge style of the rendered graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DotStyle {
    /// `digraph`, one `->` edge per ordered pair.
    #[default]
    Directed,
    /// `graph`, one `--` edge per unordered pair.
    Undirected,
}

fn non_word() -> &'static Regex {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    NON_WORD.get_or_init(|| Regex::new(r"\W").expect("static pattern"))
}

/// Node identifier for a vertex label.
pub fn dot_id(label: &str) -> String {
    non_word().replace_all(label, "_").into_owned()
}

/// Render one level.
pub fn to_dot(graph: &UniqueGraph, name: &str, style: DotStyle) -> String {
    let (keyword, arrow) = match style {
        DotStyle::Directed => ("digraph", "->"),
        DotStyle::Undirected => ("graph", "--"),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} \"{}\" {{", keyword, dot_id(name));
    for label in graph.sorted_labels() {
        let _ = writeln!(out, "  \"{}\";", dot_id(label));
    }

    let mut seen: BTreeSet<(&str, &str)> = BTreeSet::new();
    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort_by(|a, b| (a.source, a.target).cmp(&(b.source, b.target)));
    for e in edges {
        if style == DotStyle::Undirected {
            let pair = if e.source <= e.target { (e.source, e.target) } else { (e.target, e.source) };
            if !seen.insert(pair) {
                continue;
            }
        }
        let _ = writeln!(
            out,
            "  \"{}\" {} \"{}\" [label=\"{:.2}\"];",
            dot_id(e.source),
            arrow,
            dot_id(e.target),
            e.weight
        );
    }
    out.push_str("}\n");
    out
}

/// Render level `n` of a multi-level graph, named `ngram_<n>`.
pub fn level_to_dot(graph: &NGramGraph, n: usize, style: DotStyle) -> Option<String> {
    graph.level(n).map(|level| to_dot(level, &format!("ngram_{}", n), style))
}
