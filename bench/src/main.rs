use digraph_core::{Adjacency, Digraph};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1_000_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: digraph-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  chain       Single dependency chain (maximum DFS depth)");
        println!("  fanout      One root with every other node as a direct dependency");
        println!("  layered     Random layered DAG (build-pipeline shape)");
        println!("  diamond     Stacked diamonds (shared dependencies, many revisits)");
        println!();
        println!("Default node_count: 1000000");
        println!("Set RUST_LOG=debug to see construction and sort events.");
        return;
    }

    println!("digraph-bench");
    println!("=============");
    println!();

    let generators: Vec<(&str, fn(u64) -> Adjacency)> = match mode {
        "chain" => vec![("Chain", gen_chain)],
        "fanout" => vec![("Fan-out", gen_fanout)],
        "layered" => vec![("Layered random DAG", gen_layered)],
        "diamond" => vec![("Stacked diamonds", gen_diamonds)],
        "all" => vec![
            ("Chain", gen_chain as fn(u64) -> Adjacency),
            ("Fan-out", gen_fanout),
            ("Layered random DAG", gen_layered),
            ("Stacked diamonds", gen_diamonds),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count);
    }
}

fn run_benchmark(name: &str, generator: fn(u64) -> Adjacency, node_count: u64) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let adjacency = generator(node_count);
    println!("Generated mapping in {:.2}s", t.elapsed().as_secs_f64());

    let t = Instant::now();
    let graph: Digraph = match Digraph::from_mapping(&adjacency) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Construction failed: {}", e);
            return;
        }
    };
    println!(
        "Built in {:.2}s — {} nodes, {} edges, ~{:.0}MB",
        t.elapsed().as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );

    let t = Instant::now();
    let order = graph.topological_sort();
    let sort_time = t.elapsed();
    println!(
        "Topological sort: {} of {} nodes in {:.1}ms",
        order.len(),
        graph.node_count(),
        sort_time.as_secs_f64() * 1000.0
    );

    let t = Instant::now();
    let violations = count_violations(&graph, &order);
    println!(
        "Validated in {:.1}ms — {}",
        t.elapsed().as_secs_f64() * 1000.0,
        if violations == 0 {
            "every edge points forward".to_string()
        } else {
            format!("{} edges point backward", violations)
        }
    );

    let t = Instant::now();
    let snapshot = graph.as_mapping();
    println!(
        "Exported mapping in {:.1}ms (round trip {})",
        t.elapsed().as_secs_f64() * 1000.0,
        if snapshot == adjacency { "ok" } else { "MISMATCH" }
    );
    println!();
}

/// Count edges whose source is not placed before its target.
fn count_violations(graph: &Digraph, order: &[digraph_core::NodeRef]) -> usize {
    let mut position = vec![usize::MAX; graph.node_count()];
    for (i, node) in order.iter().enumerate() {
        position[node.index()] = i;
    }

    graph
        .nodes()
        .flat_map(|(from, node)| {
            node.outgoing()
                .iter()
                .map(move |e| (from.index(), e.target().index()))
        })
        .filter(|&(from, to)| position[from] >= position[to])
        .count()
}

// ---------------------------------------------------------------------------
// Generators: all O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
}

fn name(i: u64) -> String {
    format!("n{}", i)
}

/// n0 -> n1 -> ... -> n(k-1). Traversal depth equals the node count.
fn gen_chain(node_count: u64) -> Adjacency {
    (0..node_count)
        .map(|i| {
            let targets = if i + 1 < node_count {
                vec![name(i + 1)]
            } else {
                Vec::new()
            };
            (name(i), targets)
        })
        .collect()
}

/// A single root depending on every other node. Wide, depth one.
fn gen_fanout(node_count: u64) -> Adjacency {
    let mut adjacency = Adjacency::with_capacity(node_count as usize);
    adjacency.insert(name(0), (1..node_count).map(name).collect());
    for i in 1..node_count {
        adjacency.insert(name(i), Vec::new());
    }
    adjacency
}

/// Random layered DAG: nodes split into layers of ~1000, each node points
/// at up to 4 random nodes of the next layers. Keys are declared in reverse
/// so registration order never matches the sort order.
fn gen_layered(node_count: u64) -> Adjacency {
    let layer = 1000u64;
    let mut rng = FastRng::new(4242);
    let mut adjacency = Adjacency::with_capacity(node_count as usize);

    for i in (0..node_count).rev() {
        let next_layer = (i / layer + 1) * layer;
        let mut targets = Vec::new();
        if next_layer < node_count {
            let span = (node_count - next_layer).min(layer * 2);
            for _ in 0..rng.next(5) {
                let target = name(next_layer + rng.next(span));
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        adjacency.insert(name(i), targets);
    }

    adjacency
}

/// Stacked diamonds: top -> (left, right) -> bottom, where each bottom is
/// the next diamond's top. Every bottom is reached twice.
fn gen_diamonds(node_count: u64) -> Adjacency {
    let diamonds = (node_count.max(4) - 1) / 3;
    let mut adjacency = Adjacency::with_capacity(node_count as usize);

    for d in 0..diamonds {
        let top = d * 3;
        let (left, right, bottom) = (top + 1, top + 2, top + 3);
        adjacency.insert(name(top), vec![name(left), name(right)]);
        adjacency.insert(name(left), vec![name(bottom)]);
        adjacency.insert(name(right), vec![name(bottom)]);
    }
    adjacency.insert(name(diamonds * 3), Vec::new());

    adjacency
}
