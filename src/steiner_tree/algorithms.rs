use crate::error::{Result, SteinerError};
use crate::graph::{EdgeWeight, NodeId, WeightedGraph};
use crate::shortest_paths::ShortestPathOracle;
use crate::spanning_tree::minimum_spanning_tree;
use crate::steiner_tree::tree::Tree;
use itertools::Itertools;
use std::collections::BTreeSet;
use tracing::trace;

/// Complete graph over the terminals of `graph` where each edge weighs the shortest path
/// distance between its endpoints in `graph`.
///
/// One Dijkstra run per terminal; every pair is filled from the run of its smaller endpoint.
/// Fewer than two terminals give a graph without edges.
pub fn metric_closure(graph: &WeightedGraph) -> Result<WeightedGraph> {
    let oracle = ShortestPathOracle::new(graph);
    let terminals = graph.terminals().iter().copied().collect::<Vec<_>>();
    let mut closure = WeightedGraph::new();
    for &terminal in &terminals {
        closure.add_node(terminal);
        closure.set_terminal(terminal, true);
    }
    for (i, &from) in terminals.iter().enumerate() {
        if i + 1 == terminals.len() {
            break;
        }
        let from_here = oracle.single_source(from)?;
        for &to in &terminals[i + 1..] {
            let distance = from_here.distance(to)?;
            let weight = EdgeWeight::try_from(distance).map_err(|_| SteinerError::InvalidEdge {
                from,
                to,
                reason: "distance does not fit an edge weight",
            })?;
            trace!(from = from, to = to, distance = distance, "closure edge");
            closure.add_edge(from, to, weight)?;
        }
    }
    Ok(closure)
}

/// Replace every edge of `closure_tree` by its shortest path in `graph` and take the spanning
/// tree of the union, which removes cycles created where paths overlap.
pub fn expand_paths(graph: &WeightedGraph, closure_tree: &Tree) -> Result<Tree> {
    let expanded = union_of_paths(graph, closure_tree)?;
    minimum_spanning_tree(&expanded)
}

/// The graph made of every node and edge on the shortest paths behind `closure_tree`'s edges.
/// Terminal markers and weights come from `graph`.
pub fn union_of_paths(graph: &WeightedGraph, closure_tree: &Tree) -> Result<WeightedGraph> {
    let oracle = ShortestPathOracle::new(graph);
    let mut expanded = WeightedGraph::new();
    for node in closure_tree.graph().nodes() {
        expanded.add_node(node);
        expanded.set_terminal(node, graph.is_terminal(node));
    }
    for (from, to, _) in closure_tree.graph().edges() {
        let path = oracle.path(from, to)?;
        trace!(from = from, to = to, path = ?path.path(), "expanding closure edge");
        for &node in path.path() {
            if expanded.add_node(node) {
                expanded.set_terminal(node, graph.is_terminal(node));
            }
        }
        for (a, b) in path.edges() {
            let weight = graph.weight(a, b).ok_or(SteinerError::InvalidEdge {
                from: a,
                to: b,
                reason: "path edge missing from graph",
            })?;
            expanded.add_edge(a, b, weight)?;
        }
    }
    Ok(expanded)
}

/// Repeatedly drop every non-terminal leaf until none is left.
///
/// Each pass removes all current non-terminal leaves at once. A tree with a single node is
/// returned untouched.
pub fn prune_leaves(tree: Tree, terminals: &BTreeSet<NodeId>) -> Result<Tree> {
    if tree.graph().node_count() <= 1 {
        return Ok(tree);
    }
    let mut graph = tree.into_graph();
    loop {
        let leaves = graph
            .nodes()
            .filter(|n| graph.degree(*n) == 1 && !terminals.contains(n))
            .collect_vec();
        if leaves.is_empty() {
            break;
        }
        trace!(?leaves, "pruning non-terminal leaves");
        for leaf in leaves {
            graph.remove_node(leaf);
        }
    }
    Tree::try_from(graph)
}
