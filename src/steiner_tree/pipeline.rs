//! The metric-closure approximation (Kou, Markowsky and Berman) as a chain of owned stages.
//!
//! Every stage consumes the previous one and builds fresh graphs; the input graph is carried
//! along untouched because path expansion and pruning look things up in it.

use crate::error::{Result, SteinerError};
use crate::graph::{Distance, NodeId, WeightedGraph};
use crate::spanning_tree::minimum_spanning_tree;
use crate::steiner_tree::algorithms::{metric_closure, prune_leaves, union_of_paths};
use crate::steiner_tree::tree::Tree;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub enum Stage {
    Generated {
        graph: WeightedGraph,
    },
    ClosureBuilt {
        graph: WeightedGraph,
        closure: WeightedGraph,
    },
    FirstTreeFound {
        graph: WeightedGraph,
        closure_tree: Tree,
    },
    PathsExpanded {
        graph: WeightedGraph,
        expanded: WeightedGraph,
    },
    SecondTreeFound {
        graph: WeightedGraph,
        spanning_tree: Tree,
    },
    Pruned {
        graph: WeightedGraph,
        steiner_tree: Tree,
    },
}

impl Stage {
    pub fn new(graph: WeightedGraph) -> Self {
        Stage::Generated { graph }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Generated { .. } => "generated",
            Stage::ClosureBuilt { .. } => "closure built",
            Stage::FirstTreeFound { .. } => "first tree found",
            Stage::PathsExpanded { .. } => "paths expanded",
            Stage::SecondTreeFound { .. } => "second tree found",
            Stage::Pruned { .. } => "pruned",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Stage::Pruned { .. })
    }

    /// The graph this stage produced (the input graph for [Stage::Generated]).
    pub fn output(&self) -> &WeightedGraph {
        match self {
            Stage::Generated { graph } => graph,
            Stage::ClosureBuilt { closure, .. } => closure,
            Stage::FirstTreeFound { closure_tree, .. } => closure_tree.graph(),
            Stage::PathsExpanded { expanded, .. } => expanded,
            Stage::SecondTreeFound { spanning_tree, .. } => spanning_tree.graph(),
            Stage::Pruned { steiner_tree, .. } => steiner_tree.graph(),
        }
    }

    /// Run the next step. [Stage::Pruned] is final and is returned as is.
    pub fn advance(self) -> Result<Self> {
        let next = match self {
            Stage::Generated { graph } => {
                if graph.num_terminals() == 0 {
                    return Err(SteinerError::InvalidInstance(
                        "graph has no terminals".into(),
                    ));
                }
                let closure = metric_closure(&graph)?;
                Stage::ClosureBuilt { graph, closure }
            }
            Stage::ClosureBuilt { graph, closure } => {
                let closure_tree = minimum_spanning_tree(&closure)?;
                Stage::FirstTreeFound {
                    graph,
                    closure_tree,
                }
            }
            Stage::FirstTreeFound {
                graph,
                closure_tree,
            } => {
                let expanded = union_of_paths(&graph, &closure_tree)?;
                Stage::PathsExpanded { graph, expanded }
            }
            Stage::PathsExpanded { graph, expanded } => {
                let spanning_tree = minimum_spanning_tree(&expanded)?;
                Stage::SecondTreeFound {
                    graph,
                    spanning_tree,
                }
            }
            Stage::SecondTreeFound {
                graph,
                spanning_tree,
            } => {
                let steiner_tree = prune_leaves(spanning_tree, graph.terminals())?;
                Stage::Pruned {
                    graph,
                    steiner_tree,
                }
            }
            pruned @ Stage::Pruned { .. } => return Ok(pruned),
        };
        let output = next.output();
        debug!(
            stage = next.name(),
            nodes = output.node_count(),
            edges = output.edge_count(),
            weight = output.total_weight(),
            "pipeline stage done"
        );
        trace!(edges = ?output.edges().collect::<Vec<_>>(), "{}", next.name());
        Ok(next)
    }
}

/// Final tree of a run together with the graph it was computed on.
#[derive(Debug, Clone)]
pub struct SteinerSolution {
    graph: WeightedGraph,
    tree: Tree,
}

impl SteinerSolution {
    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Sum of the tree's edge weights.
    pub fn weight(&self) -> Distance {
        self.tree.weight()
    }

    pub fn terminals(&self) -> Vec<NodeId> {
        self.graph.terminals().iter().copied().collect()
    }
}

/// Approximate a minimum Steiner tree over the terminals of `graph`.
///
/// # Errors
/// [SteinerError::InvalidInstance] if `graph` has no terminals, [SteinerError::Unreachable] if
/// two terminals are disconnected.
pub fn kou_markowsky_berman(graph: WeightedGraph) -> Result<SteinerSolution> {
    let mut stage = Stage::new(graph);
    loop {
        stage = match stage {
            Stage::Pruned {
                graph,
                steiner_tree,
            } => {
                return Ok(SteinerSolution {
                    graph,
                    tree: steiner_tree,
                })
            }
            other => other.advance()?,
        };
    }
}
