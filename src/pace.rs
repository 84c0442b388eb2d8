//! Reading Steiner tree instances in the PACE 2018 `.gr` format.
//!
//! Node ids in the file are 1-based and are kept as they are. Solutions are written with
//! [Tree::write](crate::Tree::write).

use crate::error::{ParseError, Result, SteinerError};
use crate::graph::{EdgeWeight, NodeId, WeightedGraph};
use std::fmt::Display;
use std::iter::Enumerate;
use std::str::{FromStr, Lines};

impl FromStr for WeightedGraph {
    type Err = SteinerError;

    fn from_str(s: &str) -> Result<Self> {
        parse_graph(s)
    }
}

/// Parse graph, reporting parse errors.
/// Since we're dealing with an NP-hard problem and thus the graphs are not going to be "huge"
/// it's acceptable to expect the whole graph file to be read into memory.
pub fn parse_graph(text: &str) -> Result<WeightedGraph> {
    let mut reader = Reader::new(text);
    reader.expect(&["SECTION", "Graph"])?;
    let num_nodes: NodeId = reader.key_value("Nodes")?;
    let num_edges: usize = reader.key_value("Edges")?;
    let mut graph = WeightedGraph::new();
    for node in 1..=num_nodes {
        graph.add_node(node);
    }
    for _ in 0..num_edges {
        let (from, to, weight) = reader.edge(num_nodes)?;
        if from == to {
            return Err(reader.error(format!("self-loop on node {}", from)).into());
        }
        // duplicate edges keep their first weight
        if !graph.has_edge(from, to) {
            graph.add_edge(from, to, weight)?;
        }
    }
    reader.expect(&["END"])?;

    reader.expect(&["SECTION", "Terminals"])?;
    let num_terminals: usize = reader.key_value("Terminals")?;
    for _ in 0..num_terminals {
        let terminal: NodeId = reader.key_value("T")?;
        reader.check_node(terminal, num_nodes)?;
        graph.set_terminal(terminal, true);
    }
    reader.expect(&["END"])?;
    reader.expect(&["EOF"])?;
    Ok(graph)
}

/// Line-by-line tokenizer that skips blank lines and remembers where it is.
struct Reader<'a> {
    lines: Enumerate<Lines<'a>>,
    line: usize,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            line: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.line, message)
    }

    /// Whitespace-separated tokens of the next non-empty line.
    fn next_tokens(&mut self) -> Result<Vec<&'a str>, ParseError> {
        for (index, line) in self.lines.by_ref() {
            self.line = index + 1;
            let tokens = line.split_ascii_whitespace().collect::<Vec<_>>();
            if !tokens.is_empty() {
                return Ok(tokens);
            }
        }
        Err(self.error("unexpected end of input"))
    }

    /// Error if the next line doesn't consist of exactly the expected tokens.
    fn expect(&mut self, expected: &[&str]) -> Result<(), ParseError> {
        let tokens = self.next_tokens()?;
        if tokens != expected {
            return Err(self.error(format!(
                "expected '{}' but got '{}'",
                expected.join(" "),
                tokens.join(" ")
            )));
        }
        Ok(())
    }

    /// Parse a line of the form `KEY VALUE`.
    fn key_value<T: FromStr>(&mut self, key: &str) -> Result<T, ParseError>
    where
        T::Err: Display,
    {
        match self.next_tokens()?.as_slice() {
            [found, value] if *found == key => self.parse(value),
            tokens => Err(self.error(format!(
                "expected '{} <value>' but got '{}'",
                key,
                tokens.join(" ")
            ))),
        }
    }

    /// Parse edge in the format `E u v w`.
    fn edge(&mut self, num_nodes: NodeId) -> Result<(NodeId, NodeId, EdgeWeight), ParseError> {
        match self.next_tokens()?.as_slice() {
            ["E", from, to, weight] => {
                let from = self.parse(from)?;
                let to = self.parse(to)?;
                self.check_node(from, num_nodes)?;
                self.check_node(to, num_nodes)?;
                Ok((from, to, self.parse(weight)?))
            }
            tokens => Err(self.error(format!(
                "expected 'E <from> <to> <weight>' but got '{}'",
                tokens.join(" ")
            ))),
        }
    }

    fn check_node(&self, node: NodeId, num_nodes: NodeId) -> Result<(), ParseError> {
        if node == 0 || node > num_nodes {
            return Err(self.error(format!(
                "node {} is outside 1..={}",
                node, num_nodes
            )));
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, token: &str) -> Result<T, ParseError>
    where
        T::Err: Display,
    {
        token
            .parse()
            .map_err(|err| self.error(format!("could not parse '{}': {}", token, err)))
    }
}
