use crate::error::{Result, SteinerError};
use crate::graph::{Distance, NodeId, WeightedGraph};
use std::io::{self, Write};

/// A [WeightedGraph] known to be connected and acyclic.
///
/// The only way to get one is [Tree::try_from], which checks both properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    graph: WeightedGraph,
}

impl TryFrom<WeightedGraph> for Tree {
    type Error = SteinerError;

    fn try_from(graph: WeightedGraph) -> Result<Self> {
        if !graph.is_connected() {
            return Err(SteinerError::Disconnected);
        }
        let (nodes, edges) = (graph.node_count(), graph.edge_count());
        // a connected graph with `n - 1` edges has no cycle
        if edges != nodes.saturating_sub(1) {
            return Err(SteinerError::NotATree { nodes, edges });
        }
        Ok(Self { graph })
    }
}

impl Tree {
    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    pub fn into_graph(self) -> WeightedGraph {
        self.graph
    }

    /// Total edge weight, recomputed on every call.
    pub fn weight(&self) -> Distance {
        self.graph.total_weight()
    }

    /// Nodes of degree one.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.graph
            .nodes()
            .filter(|&n| self.graph.degree(n) == 1)
            .collect()
    }

    /// Write the tree in the PACE solution format: `VALUE <weight>` followed by one edge per line.
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "VALUE {}", self.weight())?;
        for (a, b, _) in self.graph.edges() {
            writeln!(out, "{} {}", a, b)?;
        }
        Ok(())
    }
}
