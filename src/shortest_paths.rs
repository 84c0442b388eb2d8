//! Dijkstra-based shortest paths over [WeightedGraph]s with non-negative weights.
//!
//! Ties are broken deterministically: the frontier pops the smallest `(distance, node)` pair and
//! a predecessor is only replaced on a strict improvement, so for an unchanged graph every query
//! returns the same path.

use crate::error::{Result, SteinerError};
use crate::graph::{Distance, NodeId, WeightedGraph};
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortestPath {
    distance: Distance,
    path: Vec<NodeId>,
}

impl ShortestPath {
    pub fn new(path: Vec<NodeId>, distance: Distance) -> Self {
        Self { path, distance }
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// All nodes from source to target, both included.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Number of edges on the path.
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consecutive node pairs along the path.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.path.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

impl Ord for ShortestPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance()
            .cmp(&other.distance())
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for ShortestPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of a single-source run: distances and predecessors of all reachable nodes.
#[derive(Clone, Debug)]
pub struct ShortestPathTree {
    source: NodeId,
    distances: BTreeMap<NodeId, Distance>,
    predecessors: BTreeMap<NodeId, NodeId>,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn distance(&self, target: NodeId) -> Result<Distance> {
        self.distances
            .get(&target)
            .copied()
            .ok_or(SteinerError::Unreachable {
                from: self.source,
                to: target,
            })
    }

    /// Walk the predecessor chain back from `target`.
    pub fn path_to(&self, target: NodeId) -> Result<ShortestPath> {
        let distance = self.distance(target)?;
        let mut path = vec![target];
        let mut current = target;
        while let Some(&pred) = self.predecessors.get(&current) {
            path.push(pred);
            current = pred;
        }
        path.reverse();
        debug_assert_eq!(path.first(), Some(&self.source));
        Ok(ShortestPath::new(path, distance))
    }
}

/// Shortest path queries against one graph.
#[derive(Clone, Copy, Debug)]
pub struct ShortestPathOracle<'a> {
    graph: &'a WeightedGraph,
}

impl<'a> ShortestPathOracle<'a> {
    pub fn new(graph: &'a WeightedGraph) -> Self {
        Self { graph }
    }

    pub fn distance(&self, from: NodeId, to: NodeId) -> Result<Distance> {
        self.single_source(from)?.distance(to)
    }

    pub fn path(&self, from: NodeId, to: NodeId) -> Result<ShortestPath> {
        self.single_source(from)?.path_to(to)
    }

    /// Dijkstra from `source`. Fails with [SteinerError::Unreachable] if `source` is not a node.
    pub fn single_source(&self, source: NodeId) -> Result<ShortestPathTree> {
        if !self.graph.contains(source) {
            return Err(SteinerError::Unreachable {
                from: source,
                to: source,
            });
        }
        let mut distances = BTreeMap::from([(source, 0)]);
        let mut predecessors = BTreeMap::new();
        let mut frontier = BinaryHeap::from([Reverse((0, source))]);
        while let Some(Reverse((distance, node))) = frontier.pop() {
            if distances.get(&node).is_some_and(|&best| distance > best) {
                continue; // stale entry
            }
            for (neighbor, weight) in self.graph.neighbors(node) {
                let candidate = distance + Distance::from(weight);
                let improves = distances
                    .get(&neighbor)
                    .map_or(true, |&known| candidate < known);
                if improves {
                    distances.insert(neighbor, candidate);
                    predecessors.insert(neighbor, node);
                    frontier.push(Reverse((candidate, neighbor)));
                }
            }
        }
        Ok(ShortestPathTree {
            source,
            distances,
            predecessors,
        })
    }
}
