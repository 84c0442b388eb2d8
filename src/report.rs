use crate::graph::{Distance, EdgeWeight, NodeId};
use crate::steiner_tree::pipeline::SteinerSolution;
use tracing::info;

/// Summary of one pipeline run, as handed to a [Reporter].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub node_count: usize,
    pub terminals: Vec<NodeId>,
    pub weight: Distance,
    pub edges: Vec<(NodeId, NodeId, EdgeWeight)>,
}

impl From<&SteinerSolution> for RunReport {
    fn from(solution: &SteinerSolution) -> Self {
        Self {
            node_count: solution.graph().node_count(),
            terminals: solution.terminals(),
            weight: solution.weight(),
            edges: solution.tree().graph().edges().collect(),
        }
    }
}

/// Receives the outcome of each run. Purely informational.
pub trait Reporter {
    fn report(&mut self, report: &RunReport);
}

/// Writes every report to the `tracing` subscriber at info level.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, report: &RunReport) {
        info!(
            nodes = report.node_count,
            terminals = ?report.terminals,
            weight = report.weight,
            "steiner tree found"
        );
        info!(edges = ?report.edges, "steiner tree edges");
    }
}

/// Keeps every report in memory.
impl Reporter for Vec<RunReport> {
    fn report(&mut self, report: &RunReport) {
        self.push(report.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::star_test_graph;
    use crate::steiner_tree::pipeline::kou_markowsky_berman;
    use crate::util::TestResult;

    #[test]
    fn test_report_from_solution() -> TestResult {
        let solution = kou_markowsky_berman(star_test_graph()?)?;
        let mut reports: Vec<RunReport> = vec![];
        reports.report(&RunReport::from(&solution));
        LogReporter.report(&reports[0]);
        assert_eq!(
            reports,
            vec![RunReport {
                node_count: 4,
                terminals: vec![1, 2, 3],
                weight: 15,
                edges: vec![(1, 4, 3), (2, 4, 5), (3, 4, 7)],
            }]
        );
        Ok(())
    }
}
