use crate::error::{Result, SteinerError};
use std::collections::{BTreeMap, BTreeSet};

pub type NodeId = u32;
pub type EdgeWeight = u32;
/// Sum of edge weights along a path or over a tree.
pub type Distance = u64;

/// Simple undirected graph with non-negative integer weights and terminal markers.
///
/// Adjacency is kept in ordered maps, so every iteration (nodes, neighbors, edges) runs in
/// ascending node id. The shortest path and spanning tree solvers rely on this for
/// deterministic tie-breaking.
#[derive(Eq, PartialEq, Clone, Debug, Default)]
pub struct WeightedGraph {
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, EdgeWeight>>,
    terminals: BTreeSet<NodeId>,
}

impl WeightedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an edge list. Endpoints are added on demand.
    pub fn from_edges(
        edges: &[(NodeId, NodeId, EdgeWeight)],
        terminals: &[NodeId],
    ) -> Result<Self> {
        let mut graph = Self::new();
        for &(from, to, weight) in edges {
            graph.add_node(from);
            graph.add_node(to);
            graph.add_edge(from, to, weight)?;
        }
        for &terminal in terminals {
            graph.add_node(terminal);
            graph.set_terminal(terminal, true);
        }
        Ok(graph)
    }

    /// Add a node. Returns `false` if it was already present.
    pub fn add_node(&mut self, node: NodeId) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, BTreeMap::new());
        true
    }

    /// Add the undirected edge `from`-`to`. If the edge exists its weight is overwritten and the
    /// previous weight is returned.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: EdgeWeight,
    ) -> Result<Option<EdgeWeight>> {
        if from == to {
            return Err(SteinerError::InvalidEdge {
                from,
                to,
                reason: "self-loop",
            });
        }
        if !self.contains(from) || !self.contains(to) {
            return Err(SteinerError::InvalidEdge {
                from,
                to,
                reason: "endpoint does not exist",
            });
        }
        let previous = self
            .adjacency
            .get_mut(&from)
            .and_then(|neighbors| neighbors.insert(to, weight));
        if let Some(neighbors) = self.adjacency.get_mut(&to) {
            neighbors.insert(from, weight);
        }
        Ok(previous)
    }

    /// Remove a node together with its incident edges. Returns `false` if it did not exist.
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        let Some(neighbors) = self.adjacency.remove(&node) else {
            return false;
        };
        for neighbor in neighbors.keys() {
            if let Some(back) = self.adjacency.get_mut(neighbor) {
                back.remove(&node);
            }
        }
        self.terminals.remove(&node);
        true
    }

    /// Mark or unmark a node as terminal. Unknown nodes are ignored.
    pub fn set_terminal(&mut self, node: NodeId, is_terminal: bool) {
        if !self.contains(node) {
            return;
        }
        if is_terminal {
            self.terminals.insert(node);
        } else {
            self.terminals.remove(&node);
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.terminals.contains(&node)
    }

    pub fn terminals(&self) -> &BTreeSet<NodeId> {
        &self.terminals
    }

    pub fn num_terminals(&self) -> usize {
        self.terminals.len()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len() // since `adjacency` is keyed by node this is the number of *nodes*
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    /// Iterator over the node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Return an iterator over all edges. Only edges `(a,b)` with `a < b` are returned since
    /// this is an undirected graph.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, EdgeWeight)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&from, e)| e.iter().map(move |(&to, &weight)| (from, to, weight)))
            .filter(|&(from, to, _)| from < to)
    }

    /// Neighbors of `node` with the connecting edge weight. Empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeWeight)> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|e| e.iter().map(|(&to, &weight)| (to, weight)))
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, BTreeMap::len)
    }

    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<EdgeWeight> {
        self.adjacency.get(&from)?.get(&to).copied()
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.weight(from, to).is_some()
    }

    /// Sum of all edge weights.
    pub fn total_weight(&self) -> Distance {
        self.edges().map(|(_, _, w)| Distance::from(w)).sum()
    }

    /// Whether `to` can be reached from `from`.
    pub fn are_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.contains(to) && self.reachable_from(from).contains(&to)
    }

    /// Whether every node can reach every other node. The empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        match self.nodes().next() {
            Some(start) => self.reachable_from(start).len() == self.node_count(),
            None => true,
        }
    }

    /// Connected components, each sorted, ordered by their smallest node.
    pub fn components(&self) -> Vec<BTreeSet<NodeId>> {
        let mut seen = BTreeSet::new();
        let mut components = vec![];
        for node in self.nodes() {
            if seen.contains(&node) {
                continue;
            }
            let component = self.reachable_from(node);
            seen.extend(component.iter().copied());
            components.push(component);
        }
        components
    }

    fn reachable_from(&self, start: NodeId) -> BTreeSet<NodeId> {
        let mut found = BTreeSet::new();
        if !self.contains(start) {
            return found;
        }
        let mut stack = vec![start];
        found.insert(start);
        while let Some(top) = stack.pop() {
            for (neighbor, _) in self.neighbors(top) {
                if found.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        found
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::util::TestResult;

    /// ```text
    ///     1
    /// 1 ----- 2
    ///  \     /
    /// 3 \   / 2
    ///    \ /
    ///     3
    /// ```
    /// Terminals: `1, 3`
    pub(crate) fn small_test_graph() -> Result<WeightedGraph> {
        WeightedGraph::from_edges(&[(1, 2, 1), (2, 3, 2), (3, 1, 3)], &[1, 3])
    }

    /// ```text
    ///    1
    ///  1----2
    ///  |  / |
    /// 7| /1 |2
    ///  |/   |
    ///  3----4
    ///    4
    /// ```
    /// Terminals: `1, 3`
    pub(crate) fn shortcut_test_graph() -> Result<WeightedGraph> {
        WeightedGraph::from_edges(
            &[(2, 1, 1), (2, 4, 2), (2, 3, 1), (4, 3, 4), (1, 3, 7)],
            &[1, 3],
        )
    }

    /// Six nodes on a ring, every edge weighs 1. Terminals: `1, 3, 5`.
    pub(crate) fn cycle_test_graph() -> Result<WeightedGraph> {
        WeightedGraph::from_edges(
            &[(1, 2, 1), (2, 3, 1), (3, 4, 1), (4, 5, 1), (5, 6, 1), (6, 1, 1)],
            &[1, 3, 5],
        )
    }

    /// Non-terminal center `4` with terminal leaves `1, 2, 3`.
    pub(crate) fn star_test_graph() -> Result<WeightedGraph> {
        WeightedGraph::from_edges(&[(4, 1, 3), (4, 2, 5), (4, 3, 7)], &[1, 2, 3])
    }

    /// From [Wikipedia](https://de.wikipedia.org/wiki/Steinerbaumproblem#/media/Datei:Steinerbaum_Beispiel_Graph.svg).
    pub(crate) fn steiner_example_wiki() -> Result<WeightedGraph> {
        WeightedGraph::from_edges(
            &[
                (1, 2, 15),
                (2, 3, 30),
                (3, 4, 50),
                (4, 7, 30),
                (1, 5, 25),
                (2, 9, 50),
                (2, 6, 45),
                (3, 6, 40),
                (6, 8, 60),
                (7, 8, 20),
                (5, 9, 30),
                (9, 11, 15),
                (8, 10, 50),
                (11, 10, 40),
                (12, 11, 10),
            ],
            &[1, 9, 12, 7, 8],
        )
    }

    #[test]
    fn test_edges() -> TestResult {
        let short = shortcut_test_graph()?;
        let edges = short.edges().collect::<Vec<_>>();
        assert_eq!(
            edges,
            vec![(1, 2, 1), (1, 3, 7), (2, 3, 1), (2, 4, 2), (3, 4, 4)]
        );
        assert_eq!(short.edge_count(), 5);
        assert_eq!(short.node_count(), 4);
        assert_eq!(short.total_weight(), 15);
        Ok(())
    }

    #[test]
    fn test_weight() -> TestResult {
        let graph = shortcut_test_graph()?;
        assert_eq!(graph.weight(1, 3), Some(7));
        assert_eq!(graph.weight(3, 1), Some(7));
        assert_eq!(graph.weight(3, 4), Some(4));
        assert_eq!(graph.weight(4, 1), None);
        assert_eq!(graph.weight(1, 4), None);
        Ok(())
    }

    #[test]
    fn test_add_edge_rejects_self_loop_and_missing_endpoint() {
        let mut graph = WeightedGraph::new();
        graph.add_node(1);
        assert!(matches!(
            graph.add_edge(1, 1, 3),
            Err(SteinerError::InvalidEdge { from: 1, to: 1, .. })
        ));
        assert!(matches!(
            graph.add_edge(1, 2, 3),
            Err(SteinerError::InvalidEdge { from: 1, to: 2, .. })
        ));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_overwrites() -> TestResult {
        let mut graph = small_test_graph()?;
        assert_eq!(graph.add_edge(2, 1, 9)?, Some(1));
        assert_eq!(graph.weight(1, 2), Some(9));
        assert_eq!(graph.edge_count(), 3);
        Ok(())
    }

    #[test]
    fn test_degree_and_neighbors() -> TestResult {
        let graph = star_test_graph()?;
        assert_eq!(graph.degree(4), 3);
        assert_eq!(graph.degree(1), 1);
        assert_eq!(graph.degree(42), 0);
        assert_eq!(
            graph.neighbors(4).collect::<Vec<_>>(),
            vec![(1, 3), (2, 5), (3, 7)]
        );
        Ok(())
    }

    #[test]
    fn test_remove_node() -> TestResult {
        let mut graph = star_test_graph()?;
        assert!(graph.remove_node(1));
        assert!(!graph.remove_node(1));
        assert!(!graph.is_terminal(1));
        assert_eq!(graph.degree(4), 2);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.is_connected());
        assert!(graph.remove_node(4));
        assert!(!graph.is_connected());
        assert_eq!(graph.components().len(), 2);
        Ok(())
    }

    #[test]
    fn test_connectivity() -> TestResult {
        let mut graph = WeightedGraph::from_edges(&[(1, 2, 1), (3, 4, 1)], &[1])?;
        assert!(graph.are_connected(1, 2));
        assert!(!graph.are_connected(1, 3));
        assert!(!graph.are_connected(1, 99));
        assert!(!graph.is_connected());
        assert_eq!(
            graph.components(),
            vec![BTreeSet::from([1, 2]), BTreeSet::from([3, 4])]
        );
        graph.add_edge(2, 3, 5)?;
        assert!(graph.is_connected());
        assert!(WeightedGraph::new().is_connected());
        Ok(())
    }

    #[test]
    fn test_terminals() -> TestResult {
        let mut graph = steiner_example_wiki()?;
        assert_eq!(
            graph.terminals().iter().copied().collect::<Vec<_>>(),
            vec![1, 7, 8, 9, 12]
        );
        graph.set_terminal(42, true);
        assert_eq!(graph.num_terminals(), 5);
        graph.set_terminal(7, false);
        assert!(!graph.is_terminal(7));
        Ok(())
    }
}
