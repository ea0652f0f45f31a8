//! Graph algorithms
//!
//! Algorithms here only talk to the [`Store`](crate::graph::Store) contract, so
//! they run unchanged over any backing storage.

pub mod traversal;

pub use traversal::{bfs, dfs, traverse, TraversalOrder, TraversalPolicy};
