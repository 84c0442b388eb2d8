//! Random connected test instances.
//!
//! Generation is deterministic for a given RNG state; [InstanceGenerator::generate_seeded] uses
//! `rand_chacha` so the same seed yields the same graph on every platform.

use crate::error::{Result, SteinerError};
use crate::graph::{EdgeWeight, NodeId, WeightedGraph};
use itertools::Itertools;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A node may only receive a repair edge while its degree is below this.
const ATTACH_DEGREE_CAP: usize = 2;

/// Consecutive useless draws allowed in a generation phase before giving up.
pub const DEFAULT_ATTEMPT_BUDGET: usize = 100_000;

/// Shape of a random instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceParams {
    /// Number of nodes, labelled `1..=nodes`.
    pub nodes: NodeId,
    /// Share of nodes marked terminal, in `[0, 1]`.
    pub terminal_fraction: f64,
    /// Edge weights are drawn from `1..=max_weight`.
    pub max_weight: EdgeWeight,
}

impl Default for InstanceParams {
    fn default() -> Self {
        Self {
            nodes: 6,
            terminal_fraction: 0.7,
            max_weight: 50,
        }
    }
}

impl InstanceParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(mut self, nodes: NodeId) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_terminal_fraction(mut self, fraction: f64) -> Self {
        self.terminal_fraction = fraction;
        self
    }

    pub fn with_max_weight(mut self, max_weight: EdgeWeight) -> Self {
        self.max_weight = max_weight;
        self
    }

    /// `round(terminal_fraction * nodes)`.
    pub fn terminal_count(&self) -> usize {
        (self.terminal_fraction * f64::from(self.nodes)).round() as usize
    }

    fn validate(&self) -> Result<()> {
        if self.nodes < 2 {
            return Err(SteinerError::InvalidInstance(format!(
                "need at least 2 nodes, got {}",
                self.nodes
            )));
        }
        if !(0.0..=1.0).contains(&self.terminal_fraction) {
            return Err(SteinerError::InvalidInstance(format!(
                "terminal fraction {} is outside [0, 1]",
                self.terminal_fraction
            )));
        }
        if self.max_weight < 1 {
            return Err(SteinerError::InvalidInstance(
                "maximum edge weight must be at least 1".into(),
            ));
        }
        if self.terminal_count() == 0 {
            return Err(SteinerError::InvalidInstance(format!(
                "terminal fraction {} of {} nodes selects no terminal",
                self.terminal_fraction, self.nodes
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    params: InstanceParams,
    attempt_budget: usize,
}

impl InstanceGenerator {
    pub fn new(params: InstanceParams) -> Self {
        Self {
            params,
            attempt_budget: DEFAULT_ATTEMPT_BUDGET,
        }
    }

    pub fn with_attempt_budget(mut self, attempt_budget: usize) -> Self {
        self.attempt_budget = attempt_budget;
        self
    }

    pub fn params(&self) -> &InstanceParams {
        &self.params
    }

    pub fn generate_seeded(&self, seed: u64) -> Result<WeightedGraph> {
        self.generate(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// Build a connected graph:
    /// 1. sample the terminals without replacement,
    /// 2. give every isolated node an edge to a node of degree below [ATTACH_DEGREE_CAP],
    /// 3. join random pairs from different components until the graph is connected,
    /// 4. add random new edges until the edge count reaches a target drawn from
    ///    `[n - 1, n (n - 1) / 2]`.
    ///
    /// A phase fails with [SteinerError::InvalidInstance] once more than the attempt budget of
    /// draws in a row leave the graph unchanged.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<WeightedGraph> {
        self.params.validate()?;
        let n = self.params.nodes;
        let mut graph = WeightedGraph::new();
        for node in 1..=n {
            graph.add_node(node);
        }

        for i in index::sample(rng, n as usize, self.params.terminal_count()) {
            graph.set_terminal(i as NodeId + 1, true);
        }
        let max_edges = n as usize * (n as usize - 1) / 2;
        let target_edges = rng.gen_range(n as usize - 1..=max_edges);

        for u in 1..=n {
            let mut failures = 0;
            while graph.degree(u) < 1 {
                let v = rng.gen_range(1..=n);
                if v != u && graph.degree(v) < ATTACH_DEGREE_CAP {
                    graph.add_edge(u, v, self.random_weight(rng))?;
                } else {
                    self.count_failure(&mut failures, "attaching isolated nodes")?;
                }
            }
        }

        let mut connected = graph.is_connected();
        let mut failures = 0;
        while !connected {
            let (u, v) = (rng.gen_range(1..=n), rng.gen_range(1..=n));
            if u != v && !graph.are_connected(u, v) {
                graph.add_edge(u, v, self.random_weight(rng))?;
                connected = graph.is_connected();
                failures = 0;
            } else {
                self.count_failure(&mut failures, "connecting components")?;
            }
        }

        let mut edges = graph.edge_count();
        let mut failures = 0;
        while edges < target_edges && 2 * edges < max_edges {
            let (u, v) = (rng.gen_range(1..=n), rng.gen_range(1..=n));
            if u != v && !graph.has_edge(u, v) {
                graph.add_edge(u, v, self.random_weight(rng))?;
                edges += 1;
                failures = 0;
            } else {
                self.count_failure(&mut failures, "adding edges")?;
            }
        }
        // Past half density, draw the remaining edges from the missing pairs directly.
        if edges < target_edges {
            let missing = (1..=n)
                .flat_map(|u| (u + 1..=n).map(move |v| (u, v)))
                .filter(|&(u, v)| !graph.has_edge(u, v))
                .collect_vec();
            for i in index::sample(rng, missing.len(), target_edges - edges) {
                let (u, v) = missing[i];
                graph.add_edge(u, v, self.random_weight(rng))?;
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            terminals = ?graph.terminals(),
            "generated instance"
        );
        Ok(graph)
    }

    fn random_weight<R: Rng + ?Sized>(&self, rng: &mut R) -> EdgeWeight {
        rng.gen_range(1..=self.params.max_weight)
    }

    /// Record a draw that changed nothing. Callers reset `failures` after every useful draw.
    fn count_failure(&self, failures: &mut usize, phase: &str) -> Result<()> {
        *failures += 1;
        if *failures > self.attempt_budget {
            warn!(
                phase = phase,
                failed_draws = *failures,
                budget = self.attempt_budget,
                "generator ran out of attempts"
            );
            return Err(SteinerError::InvalidInstance(format!(
                "{} consecutive draws while {} found no usable pair (budget {})",
                *failures, phase, self.attempt_budget
            )));
        }
        Ok(())
    }
}
