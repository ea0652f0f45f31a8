//! Storage contract for graph semantics
//!
//! Any backing storage that implements [`Store`] can host a graph and be walked
//! by the traversal engine. Algorithms only ever talk to this trait.

use super::node::Node;
use super::types::NodeId;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure reported by a backing storage implementation
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Serialization(err.to_string())
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Predicate over nodes used by scans and by traversal start selection
pub type NodePredicate<'a> = dyn Fn(&Node) -> bool + Send + Sync + 'a;

/// Minimal operation set a backing storage must provide.
///
/// Identifiers are issued by the store. Nodes returned are snapshots.
/// Teardown operations (`remove_node`, `remove_edge`, `remove_all_edges`)
/// treat unknown ids as already removed and never fail on them.
#[async_trait]
pub trait Store: Send + Sync {
    /// Open the backing storage. The default does nothing.
    async fn connect(&self) -> GraphResult<()> {
        Ok(())
    }

    /// Release the backing storage. The default does nothing.
    async fn disconnect(&self) -> GraphResult<()> {
        Ok(())
    }

    /// Insert a node and return its freshly allocated id
    async fn add_node(&self, data: Value) -> GraphResult<NodeId>;

    /// Fetch a node; an unknown id yields `None`, not an error
    async fn node(&self, id: NodeId) -> GraphResult<Option<Node>>;

    /// Every node in the store
    async fn nodes(&self) -> GraphResult<Vec<Node>>;

    /// Payload of an existing node
    async fn data(&self, id: NodeId) -> GraphResult<Value>;

    /// Replace the payload of an existing node, returning the new payload
    async fn set_data(&self, id: NodeId, data: Value) -> GraphResult<Value>;

    /// Shallow-merge `partial` into the payload of an existing node
    async fn update_data(&self, id: NodeId, partial: Value) -> GraphResult<Value>;

    /// All nodes matching `predicate`, or all nodes when it is `None`
    async fn find(&self, predicate: Option<&NodePredicate<'_>>) -> GraphResult<Vec<Node>>;

    /// First node in store order matching `predicate`
    async fn find_first(&self, predicate: Option<&NodePredicate<'_>>) -> GraphResult<Option<Node>>;

    /// Remove a node and every neighbor's reference to it
    async fn remove_node(&self, id: NodeId) -> GraphResult<()>;

    /// Drop every node
    async fn remove_all_nodes(&self) -> GraphResult<()>;

    /// Connect two existing nodes in both directions
    async fn add_edge(&self, id1: NodeId, id2: NodeId) -> GraphResult<()>;

    /// Connect `from` toward `to` only; `to` keeps a non-traversable back-reference
    async fn add_directed_edge(&self, from: NodeId, to: NodeId) -> GraphResult<()>;

    /// Delete both halves of the edge between two nodes
    async fn remove_edge(&self, id1: NodeId, id2: NodeId) -> GraphResult<()>;

    /// Delete every edge touching `id`
    async fn remove_all_edges(&self, id: NodeId) -> GraphResult<()>;

    /// Whether `id1` has a traversable edge toward `id2`.
    ///
    /// Fails if `id1` is unknown; an unknown `id2` simply yields `false`.
    async fn adjacent(&self, id1: NodeId, id2: NodeId) -> GraphResult<bool>;

    /// Nodes reachable over a connected edge of `node`, skipping `exclude`
    async fn neighbors(&self, node: &Node, exclude: Option<NodeId>) -> GraphResult<Vec<Node>>;
}
