//! Graphwalk demo: import an adjacency list, walk it, export it again.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use graphwalk::{adjacency, Graph, GraphConfig, MemoryStore, Node, TraversalOrder, TraversalPolicy};
use rustc_hash::FxHashSet;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SAMPLE_LIST: &str = r#"{
    "a": { "data": "start", "neighbors": ["b", "c", "d", "e"] },
    "b": { "data": { "header": "X" }, "neighbors": ["d", "g", "h", "i"] },
    "c": { "data": { "header": "Y" }, "neighbors": ["f"] },
    "f": { "data": { "end": true }, "neighbors": ["h", "i"] }
}"#;

#[derive(Parser)]
#[command(name = "graphwalk", version, about = "Walk a graph loaded from an adjacency list")]
struct Cli {
    /// Adjacency list JSON file; a built-in sample is used when omitted
    #[arg(long)]
    list: Option<PathBuf>,

    /// Import neighbors as directed edges
    #[arg(long)]
    directed: bool,

    /// Traversal order
    #[arg(long, value_enum, default_value = "bfs")]
    order: Order,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Bfs,
    Dfs,
}

impl From<Order> for TraversalOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Bfs => TraversalOrder::BreadthFirst,
            Order::Dfs => TraversalOrder::DepthFirst,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GraphConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GraphConfig::default(),
    };

    let source = match &cli.list {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading adjacency list {}", path.display()))?,
        None => SAMPLE_LIST.to_string(),
    };
    let list = adjacency::from_json(&source).context("parsing adjacency list")?;

    let graph = Graph::with_config(Arc::new(MemoryStore::with_config(&config)), &config);
    let ids = if cli.directed {
        adjacency::directed(&graph, &list).await?
    } else {
        adjacency::undirected(&graph, &list).await?
    };
    info!("Loaded {} nodes (graphwalk v{})", ids.len(), graphwalk::version());

    let is_start = |node: &Node| node.data == json!("start");
    let has_start = graph.find_first(Some(&is_start)).await?.is_some();

    let mut visited = FxHashSet::default();
    let mut policy = TraversalPolicy::new()
        .filter(move |candidates, _, node| {
            visited.insert(node.id);
            candidates
                .into_iter()
                .filter(|candidate| visited.insert(candidate.id))
                .collect()
        })
        .on_progress(|node, depth, _| {
            println!("{:indent$}{} {}", "", depth, node.data, indent = depth * 2);
        });
    if has_start {
        policy = policy.start_at(is_start);
    }

    let last = graph.traverse(cli.order.into(), policy).await?;
    if let Some(node) = last {
        info!("Traversal ended at {}", node.id);
    }

    let exported = adjacency::to_adjacency_list(&graph).await?;
    println!("{}", serde_json::to_string_pretty(&exported)?);
    Ok(())
}
