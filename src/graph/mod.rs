//! Core graph model
//!
//! This module implements the data model and its storage boundary:
//! - Nodes with an opaque JSON payload and a per-node adjacency record
//! - Undirected edges and directed edges with non-traversable back-references
//! - The [`Store`] contract and its in-memory implementation
//! - The [`Graph`] façade that traversal and the adjacency codec run against

pub mod facade;
pub mod memory;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use facade::Graph;
pub use memory::MemoryStore;
pub use node::{merge_payload, Node};
pub use store::{GraphError, GraphResult, NodePredicate, Store};
pub use types::{EdgeState, NodeId};
