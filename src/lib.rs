//! Graphwalk
//!
//! A graph data structure with a storage-agnostic traversal engine.
//!
//! # Architecture
//!
//! - [`graph::Store`]: the storage contract (node CRUD, edges, adjacency queries, scans)
//! - [`graph::MemoryStore`]: the reference in-memory store
//! - [`graph::Graph`]: façade binding one store, accepting nodes or ids
//! - [`algo::traversal`]: breadth-first and depth-first traversal driven by
//!   caller callbacks (start, filter, progress, finish)
//! - [`adjacency`]: adjacency-list import and export
//!
//! Long operations hand control back to the tokio scheduler between unit steps,
//! see [`scheduler::CooperativeYield`] and [`config::GraphConfig`].
//!
//! ## Example Usage
//!
//! ```rust
//! use graphwalk::{Graph, MemoryStore, TraversalPolicy};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let graph = Graph::new(Arc::new(MemoryStore::new()));
//!
//! let start = graph.add_node(json!("start")).await.unwrap();
//! let end = graph.add_node(json!({"end": true})).await.unwrap();
//! graph.add_edge(start, end).await.unwrap();
//!
//! let found = graph
//!     .traverse_bfs(
//!         TraversalPolicy::new()
//!             .start_at(|node| node.data == json!("start"))
//!             .finish_when(|node, _, _| node.data["end"] == json!(true)),
//!     )
//!     .await
//!     .unwrap();
//! assert_eq!(found.map(|node| node.id), Some(end));
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod adjacency;
pub mod algo;
pub mod config;
pub mod graph;
pub mod scheduler;

// Re-export main types for convenience
pub use graph::{EdgeState, Graph, GraphError, GraphResult, MemoryStore, Node, NodeId, Store};

pub use algo::{TraversalOrder, TraversalPolicy};

pub use adjacency::{AdjacencyEntry, AdjacencyList, ExportedAdjacencyList};

pub use config::{ConfigError, ConfigResult, GraphConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
