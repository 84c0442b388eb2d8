//! Run the Steiner tree approximation over a sweep of random instances, or on a PACE file.
//! Results go through the log; set `RUST_LOG` to see the individual pipeline stages.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use steiner_approx::{
    kou_markowsky_berman, EdgeWeight, LogReporter, NodeId, Reporter, RunReport, SweepConfig,
    WeightedGraph,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "steiner-approx", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate and solve one random instance per node count (the default).
    Sweep(SweepArgs),
    /// Solve an instance in the PACE `.gr` format.
    Solve {
        file: PathBuf,
        /// Write the tree in the PACE solution format to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Args)]
struct SweepArgs {
    /// TOML file with sweep settings; flags override it.
    #[arg(short, long, env = "STEINER_SWEEP_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    min_nodes: Option<NodeId>,
    #[arg(long)]
    max_nodes: Option<NodeId>,
    #[arg(long)]
    terminal_fraction: Option<f64>,
    #[arg(long)]
    max_weight: Option<EdgeWeight>,
}

impl SweepArgs {
    fn into_config(self) -> anyhow::Result<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                SweepConfig::from_toml(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => SweepConfig::default(),
        };
        config.seed = self.seed.or(config.seed);
        config.min_nodes = self.min_nodes.unwrap_or(config.min_nodes);
        config.max_nodes = self.max_nodes.unwrap_or(config.max_nodes);
        config.terminal_fraction = self.terminal_fraction.unwrap_or(config.terminal_fraction);
        config.max_weight = self.max_weight.unwrap_or(config.max_weight);
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("steiner_approx=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match Cli::parse().command {
        None => sweep(SweepArgs::default()),
        Some(Command::Sweep(args)) => sweep(args),
        Some(Command::Solve { file, output }) => solve(file, output),
    }
}

fn sweep(args: SweepArgs) -> anyhow::Result<()> {
    let config = args.into_config()?;
    info!(?config, "starting sweep");
    let failures = config.run(&mut LogReporter);
    for failure in &failures {
        warn!(nodes = failure.nodes, error = %failure.error, "instance skipped");
    }
    info!(
        runs = (config.min_nodes..=config.max_nodes).count(),
        failed = failures.len(),
        "sweep finished"
    );
    Ok(())
}

fn solve(file: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let text =
        fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
    let graph: WeightedGraph = text
        .parse()
        .with_context(|| format!("parsing {}", file.display()))?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        terminals = graph.num_terminals(),
        "instance loaded"
    );
    let solution = kou_markowsky_berman(graph)?;
    LogReporter.report(&RunReport::from(&solution));
    if let Some(path) = output {
        let mut out = BufWriter::new(
            File::create(&path).with_context(|| format!("creating {}", path.display()))?,
        );
        solution.tree().write(&mut out)?;
        out.flush()?;
        info!(path = %path.display(), "solution written");
    }
    Ok(())
}
