use std::collections::BTreeMap;
use std::error::Error;
use steiner_approx::{
    kou_markowsky_berman, metric_closure, minimum_spanning_tree, prune_leaves, Distance,
    InstanceGenerator, InstanceParams, NodeId, WeightedGraph,
};

type TestResult = Result<(), Box<dyn Error>>;

#[ctor::ctor]
fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::builder()
        .parse(std::env::var("RUST_LOG").unwrap_or("steiner_approx=info".to_string()))
        .unwrap();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .init();
}

/// All generated instances used below: 2 to 12 nodes, several seeds each.
fn instances() -> impl Iterator<Item = (u64, WeightedGraph)> {
    (2..=12).flat_map(|nodes| {
        let generator = InstanceGenerator::new(InstanceParams::new().with_nodes(nodes));
        (0..6u64).map(move |seed| {
            let seed = seed * 100 + u64::from(nodes);
            let graph = generator
                .generate_seeded(seed)
                .unwrap_or_else(|err| panic!("seed {} failed: {}", seed, err));
            (seed, graph)
        })
    })
}

/// Floyd-Warshall distances, independent of the Dijkstra oracle.
fn all_pairs(graph: &WeightedGraph) -> BTreeMap<(NodeId, NodeId), Distance> {
    let nodes = graph.nodes().collect::<Vec<_>>();
    let mut dist = BTreeMap::new();
    for &n in &nodes {
        dist.insert((n, n), 0);
    }
    for (a, b, w) in graph.edges() {
        dist.insert((a, b), Distance::from(w));
        dist.insert((b, a), Distance::from(w));
    }
    for &k in &nodes {
        for &i in &nodes {
            for &j in &nodes {
                if let (Some(&ik), Some(&kj)) = (dist.get(&(i, k)), dist.get(&(k, j))) {
                    let known = dist.get(&(i, j)).copied();
                    if known.map_or(true, |d| ik + kj < d) {
                        dist.insert((i, j), ik + kj);
                    }
                }
            }
        }
    }
    dist
}

#[test]
fn generated_instances_are_connected_simple_graphs() {
    for (seed, graph) in instances() {
        assert!(graph.is_connected(), "seed {}", seed);
        assert!(graph.edges().all(|(a, b, _)| a < b), "seed {}", seed);
        let expected = InstanceParams::new()
            .with_nodes(graph.node_count() as NodeId)
            .terminal_count();
        assert_eq!(graph.num_terminals(), expected, "seed {}", seed);
    }
}

#[test]
fn closure_weights_are_shortest_distances() -> TestResult {
    for (seed, graph) in instances().filter(|(_, g)| g.node_count() <= 9) {
        let closure = metric_closure(&graph)?;
        let dist = all_pairs(&graph);
        let t = closure.node_count();
        assert_eq!(closure.edge_count(), t * (t - 1) / 2, "seed {}", seed);
        for (a, b, weight) in closure.edges() {
            assert_eq!(Some(Distance::from(weight)), dist.get(&(a, b)).copied());
        }
    }
    Ok(())
}

#[test]
fn steiner_trees_are_valid() -> TestResult {
    for (seed, graph) in instances() {
        let closure_mst = minimum_spanning_tree(&metric_closure(&graph)?)?;
        let solution = kou_markowsky_berman(graph.clone())?;
        let tree = solution.tree().graph();

        assert!(tree.is_connected(), "seed {}", seed);
        assert_eq!(tree.edge_count() + 1, tree.node_count(), "seed {}", seed);
        for terminal in graph.terminals() {
            assert!(tree.contains(*terminal), "seed {}", seed);
        }
        for leaf in solution.tree().leaves() {
            assert!(graph.is_terminal(leaf), "seed {}: leaf {}", seed, leaf);
        }
        for (a, b, weight) in tree.edges() {
            assert_eq!(graph.weight(a, b), Some(weight), "seed {}", seed);
        }

        let weight = solution.weight();
        assert_eq!(weight, tree.edges().map(|(_, _, w)| Distance::from(w)).sum());
        assert!(weight <= closure_mst.weight(), "seed {}", seed);
        assert!(2 * weight >= closure_mst.weight(), "seed {}", seed);
        assert!(weight <= graph.total_weight(), "seed {}", seed);
    }
    Ok(())
}

#[test]
fn pruning_a_steiner_tree_changes_nothing() -> TestResult {
    for (_, graph) in instances() {
        let solution = kou_markowsky_berman(graph.clone())?;
        let again = prune_leaves(solution.tree().clone(), graph.terminals())?;
        assert_eq!(&again, solution.tree());
    }
    Ok(())
}

#[test]
fn runs_are_reproducible() -> TestResult {
    let generator = InstanceGenerator::new(InstanceParams::new().with_nodes(12));
    let first = kou_markowsky_berman(generator.generate_seeded(5)?)?;
    let second = kou_markowsky_berman(generator.generate_seeded(5)?)?;
    assert_eq!(first.tree(), second.tree());
    Ok(())
}

#[test]
fn pace_solution_round_trip() -> TestResult {
    let text = "SECTION Graph\nNodes 4\nEdges 3\nE 1 4 3\nE 2 4 5\nE 3 4 7\nEND\n\n\
        SECTION Terminals\nTerminals 3\nT 1\nT 2\nT 3\nEND\n\nEOF\n";
    let graph: WeightedGraph = text.parse()?;
    let solution = kou_markowsky_berman(graph)?;
    let mut out = vec![];
    solution.tree().write(&mut out)?;
    assert_eq!(String::from_utf8(out)?, "VALUE 15\n1 4\n2 4\n3 4\n");
    Ok(())
}
