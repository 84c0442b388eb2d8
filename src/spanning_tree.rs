//! Kruskal's algorithm over a [WeightedGraph].

use crate::error::{Result, SteinerError};
use crate::graph::{NodeId, WeightedGraph};
use crate::steiner_tree::tree::Tree;
use std::collections::BTreeMap;
use tracing::trace;

/// Union-find over node ids with path halving and union by size.
#[derive(Debug, Clone)]
pub(crate) struct DisjointSets {
    parent: BTreeMap<NodeId, NodeId>,
    size: BTreeMap<NodeId, usize>,
}

impl DisjointSets {
    pub(crate) fn new(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let parent = nodes.into_iter().map(|n| (n, n)).collect::<BTreeMap<_, _>>();
        let size = parent.keys().map(|&n| (n, 1)).collect();
        Self { parent, size }
    }

    pub(crate) fn find(&mut self, mut node: NodeId) -> NodeId {
        while let Some(&parent) = self.parent.get(&node) {
            if parent == node {
                break;
            }
            let grandparent = self.parent.get(&parent).copied().unwrap_or(parent);
            self.parent.insert(node, grandparent);
            node = grandparent;
        }
        node
    }

    /// Merge the sets of `a` and `b`. Returns `false` if they already were one set.
    pub(crate) fn union(&mut self, a: NodeId, b: NodeId) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        let size_a = self.size.get(&root_a).copied().unwrap_or(1);
        let size_b = self.size.get(&root_b).copied().unwrap_or(1);
        let (big, small) = if size_a >= size_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent.insert(small, big);
        self.size.insert(big, size_a + size_b);
        true
    }
}

/// Minimum spanning tree of a connected graph.
///
/// Edges are considered by `(weight, smaller endpoint, larger endpoint)`, so among equal-weight
/// trees the one using lower node ids wins. Terminal markers are copied over.
///
/// # Errors
/// [SteinerError::Disconnected] if not every node is reachable from every other.
pub fn minimum_spanning_tree(graph: &WeightedGraph) -> Result<Tree> {
    let mut edges = graph.edges().collect::<Vec<_>>();
    edges.sort_unstable_by_key(|&(a, b, weight)| (weight, a, b));

    let mut tree = WeightedGraph::new();
    for node in graph.nodes() {
        tree.add_node(node);
        tree.set_terminal(node, graph.is_terminal(node));
    }
    let mut sets = DisjointSets::new(graph.nodes());
    let needed = graph.node_count().saturating_sub(1);
    let mut added = 0;
    for (a, b, weight) in edges {
        if added == needed {
            break;
        }
        if sets.union(a, b) {
            trace!(from = a, to = b, weight = weight, "spanning tree edge");
            tree.add_edge(a, b, weight)?;
            added += 1;
        }
    }
    if added != needed {
        return Err(SteinerError::Disconnected);
    }
    Tree::try_from(tree)
}
