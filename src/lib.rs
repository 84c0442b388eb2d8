//! Approximate minimum Steiner trees with the metric-closure heuristic of Kou, Markowsky and
//! Berman: build the complete graph over the terminals, take its spanning tree, expand its edges
//! back into shortest paths, take the spanning tree again and prune non-terminal leaves.

mod config;
mod error;
mod generator;
mod graph;
mod pace;
mod report;
mod shortest_paths;
mod spanning_tree;
mod steiner_tree;
#[cfg(test)]
mod util;

pub use config::{FailedRun, SweepConfig};
pub use error::{ParseError, Result, SteinerError};
pub use generator::{InstanceGenerator, InstanceParams, DEFAULT_ATTEMPT_BUDGET};
pub use graph::{Distance, EdgeWeight, NodeId, WeightedGraph};
pub use pace::parse_graph;
pub use report::{LogReporter, Reporter, RunReport};
pub use shortest_paths::{ShortestPath, ShortestPathOracle, ShortestPathTree};
pub use spanning_tree::minimum_spanning_tree;
pub use steiner_tree::algorithms::{expand_paths, metric_closure, prune_leaves, union_of_paths};
pub use steiner_tree::pipeline::{kou_markowsky_berman, Stage, SteinerSolution};
pub use steiner_tree::tree::Tree;

#[cfg(test)]
#[ctor::ctor]
fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::builder()
        .parse(std::env::var("RUST_LOG").unwrap_or("steiner_approx=debug".to_string()))
        .unwrap();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .init();
}
