//! The driver loop: one generated instance per node count, each solved and reported.

use crate::error::{Result, SteinerError};
use crate::generator::{InstanceGenerator, InstanceParams};
use crate::graph::{EdgeWeight, NodeId};
use crate::report::{Reporter, RunReport};
use crate::steiner_tree::pipeline::kou_markowsky_berman;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info_span};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub min_nodes: NodeId,
    pub max_nodes: NodeId,
    pub terminal_fraction: f64,
    pub max_weight: EdgeWeight,
    /// Instance `n` is generated from `seed + n`. Unset means a fresh entropy seed per run.
    pub seed: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_nodes: 6,
            max_nodes: 12,
            terminal_fraction: 0.7,
            max_weight: 50,
            seed: None,
        }
    }
}

/// A node count whose run was aborted.
#[derive(Debug)]
pub struct FailedRun {
    pub nodes: NodeId,
    pub error: SteinerError,
}

impl SweepConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn params(&self, nodes: NodeId) -> InstanceParams {
        InstanceParams::new()
            .with_nodes(nodes)
            .with_terminal_fraction(self.terminal_fraction)
            .with_max_weight(self.max_weight)
    }

    /// Generate and solve one instance.
    pub fn run_one(&self, nodes: NodeId) -> Result<RunReport> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(u64::from(nodes))),
            None => ChaCha8Rng::from_entropy(),
        };
        let graph = InstanceGenerator::new(self.params(nodes)).generate(&mut rng)?;
        let solution = kou_markowsky_berman(graph)?;
        Ok(RunReport::from(&solution))
    }

    /// Run every node count in `min_nodes..=max_nodes`. A failed run is logged and skipped.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Vec<FailedRun> {
        let mut failures = vec![];
        for nodes in self.min_nodes..=self.max_nodes {
            let _span = info_span!("instance", nodes = nodes).entered();
            match self.run_one(nodes) {
                Ok(report) => reporter.report(&report),
                Err(err) => {
                    error!(%err, "run aborted, moving on");
                    failures.push(FailedRun { nodes, error: err });
                }
            }
        }
        failures
    }
}
