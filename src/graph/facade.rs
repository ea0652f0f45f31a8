//! Graph façade
//!
//! [`Graph`] binds one [`Store`] and accepts either a node or a bare id wherever
//! the store wants an id. It also exposes the traversal engine.

use super::node::Node;
use super::store::{GraphError, GraphResult, NodePredicate, Store};
use super::types::NodeId;
use crate::algo::traversal::{self, TraversalOrder, TraversalPolicy};
use crate::config::GraphConfig;
use serde_json::Value;
use std::sync::Arc;

/// Thin handle over a shared store.
///
/// Cloning is cheap and several graphs may wrap the same store; nothing is
/// cached here.
#[derive(Clone)]
pub struct Graph {
    store: Arc<dyn Store>,
    traversal_yield_interval: usize,
}

impl Graph {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_config(store, &GraphConfig::default())
    }

    pub fn with_config(store: Arc<dyn Store>, config: &GraphConfig) -> Self {
        Graph {
            store,
            traversal_yield_interval: config.traversal_yield_interval,
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub async fn add_node(&self, data: Value) -> GraphResult<NodeId> {
        self.store.add_node(data).await
    }

    pub async fn node(&self, id: impl Into<NodeId>) -> GraphResult<Option<Node>> {
        self.store.node(id.into()).await
    }

    pub async fn nodes(&self) -> GraphResult<Vec<Node>> {
        self.store.nodes().await
    }

    pub async fn data(&self, node: impl Into<NodeId>) -> GraphResult<Value> {
        self.store.data(node.into()).await
    }

    pub async fn set_data(&self, node: impl Into<NodeId>, data: Value) -> GraphResult<Value> {
        self.store.set_data(node.into(), data).await
    }

    /// Shallow-merge `partial` into the node's payload
    pub async fn update_data(&self, node: impl Into<NodeId>, partial: Value) -> GraphResult<Value> {
        self.store.update_data(node.into(), partial).await
    }

    pub async fn find(&self, predicate: Option<&NodePredicate<'_>>) -> GraphResult<Vec<Node>> {
        self.store.find(predicate).await
    }

    pub async fn find_first(&self, predicate: Option<&NodePredicate<'_>>) -> GraphResult<Option<Node>> {
        self.store.find_first(predicate).await
    }

    pub async fn remove_node(&self, node: impl Into<NodeId>) -> GraphResult<()> {
        self.store.remove_node(node.into()).await
    }

    pub async fn remove_all_nodes(&self) -> GraphResult<()> {
        self.store.remove_all_nodes().await
    }

    pub async fn add_edge(&self, node1: impl Into<NodeId>, node2: impl Into<NodeId>) -> GraphResult<()> {
        self.store.add_edge(node1.into(), node2.into()).await
    }

    pub async fn add_directed_edge(
        &self,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
    ) -> GraphResult<()> {
        self.store.add_directed_edge(from.into(), to.into()).await
    }

    pub async fn remove_edge(&self, node1: impl Into<NodeId>, node2: impl Into<NodeId>) -> GraphResult<()> {
        self.store.remove_edge(node1.into(), node2.into()).await
    }

    pub async fn remove_all_edges(&self, node: impl Into<NodeId>) -> GraphResult<()> {
        self.store.remove_all_edges(node.into()).await
    }

    pub async fn adjacent(&self, node1: impl Into<NodeId>, node2: impl Into<NodeId>) -> GraphResult<bool> {
        self.store.adjacent(node1.into(), node2.into()).await
    }

    /// Neighbors of a node given by id; the id is resolved through the store first.
    ///
    /// `exclude` stays a plain id so a bare `None` needs no type annotation;
    /// pass `Some(node.into())` to exclude a resolved node.
    pub async fn neighbors(&self, node: impl Into<NodeId>, exclude: Option<NodeId>) -> GraphResult<Vec<Node>> {
        let id = node.into();
        let resolved = self
            .store
            .node(id)
            .await?
            .ok_or(GraphError::NodeNotFound(id))?;
        self.store.neighbors(&resolved, exclude).await
    }

    /// Neighbors of an already resolved node, without a store lookup.
    /// `exclude` takes an id, as in [`Graph::neighbors`].
    pub async fn neighbors_of(&self, node: &Node, exclude: Option<NodeId>) -> GraphResult<Vec<Node>> {
        self.store.neighbors(node, exclude).await
    }

    /// Run the traversal engine with an explicit queue discipline.
    ///
    /// Returns the node the run ended on, or `None` when no start node matched.
    /// The configured yield interval applies unless the policy sets its own.
    pub async fn traverse(
        &self,
        order: TraversalOrder,
        policy: TraversalPolicy<'_>,
    ) -> GraphResult<Option<Node>> {
        let policy = policy.default_yield_interval(self.traversal_yield_interval);
        traversal::traverse(self.store.as_ref(), order, policy).await
    }

    pub async fn traverse_bfs(&self, policy: TraversalPolicy<'_>) -> GraphResult<Option<Node>> {
        self.traverse(TraversalOrder::BreadthFirst, policy).await
    }

    pub async fn traverse_dfs(&self, policy: TraversalPolicy<'_>) -> GraphResult<Option<Node>> {
        self.traverse(TraversalOrder::DepthFirst, policy).await
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("traversal_yield_interval", &self.traversal_yield_interval)
            .finish_non_exhaustive()
    }
}
