//! Line-oriented corpus ingestion: one graph per line.

use std::convert::Infallible;
use std::io::{self, BufRead};

use super::LineLoader;
use crate::graph::NGramGraph;
use crate::policy::{ConfigError, GraphConfig};

/// Errors from building a corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// The loader failed.
    #[error("Failed to load lines: {0}")]
    Load(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The graph configuration is invalid.
    #[error("Invalid graph configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Reads lines from any buffered reader, such as a `BufReader<File>`.
///
/// Line terminators (`\n` or `\r\n`) are stripped. The reader is consumed
/// by the first load.
#[derive(Debug)]
pub struct ReaderLineLoader<R> {
    reader: R,
}

impl<R: BufRead> ReaderLineLoader<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineLoader for ReaderLineLoader<R> {
    type Error = io::Error;

    fn load_lines(&mut self) -> Result<Vec<String>, Self::Error> {
        (&mut self.reader).lines().collect()
    }
}

/// Lines already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticLines {
    lines: Vec<String>,
}

impl StaticLines {
    /// Wrap owned lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineLoader for StaticLines {
    type Error = Infallible;

    fn load_lines(&mut self) -> Result<Vec<String>, Self::Error> {
        Ok(self.lines.clone())
    }
}

/// Build one graph per line, in line order.
pub fn build_corpus<L: LineLoader>(
    loader: &mut L,
    config: &GraphConfig,
) -> Result<Vec<NGramGraph>, CorpusError> {
    config.validate()?;
    let lines = loader
        .load_lines()
        .map_err(|e| CorpusError::Load(Box::new(e)))?;

    let graphs = lines
        .iter()
        .map(|line| NGramGraph::new(line, config.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        lines = graphs.len(),
        edges = graphs.iter().map(NGramGraph::total_edge_count).sum::<usize>(),
        "Built corpus"
    );
    Ok(graphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_loader_strips_terminators() {
        let mut loader = ReaderLineLoader::new(Cursor::new("ACTAGT\r\nGGCA\n\nTT"));
        assert_eq!(loader.load_lines().unwrap(), vec!["ACTAGT", "GGCA", "", "TT"]);
        assert!(loader.load_lines().unwrap().is_empty());
    }

    #[test]
    fn test_build_corpus() {
        let mut lines = StaticLines::new(["ACTAGT", "ACTACTA", "AC"]);
        let graphs = build_corpus(&mut lines, &GraphConfig::default()).unwrap();

        assert_eq!(graphs.len(), 3);
        assert_eq!(graphs[0].data_string(), "ACTAGT");
        assert_eq!(graphs[0].total_edge_count(), 6);
        assert!(graphs[2].is_empty());
    }

    #[test]
    fn test_build_corpus_rejects_config() {
        let mut lines = StaticLines::new(["ACTAGT"]);
        let config = GraphConfig::default().with_range(4, 2);

        let err = build_corpus(&mut lines, &config).unwrap_err();
        assert!(matches!(err, CorpusError::Config(ConfigError::InvertedRange { min: 4, max: 2 })));
    }

    #[derive(Debug)]
    struct Broken;

    impl LineLoader for Broken {
        type Error = io::Error;

        fn load_lines(&mut self) -> Result<Vec<String>, Self::Error> {
            Err(io::Error::new(io::ErrorKind::Other, "disk gone"))
        }
    }

    #[test]
    fn test_loader_failure_propagates() {
        let err = build_corpus(&mut Broken, &GraphConfig::default()).unwrap_err();
        assert!(matches!(err, CorpusError::Load(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
