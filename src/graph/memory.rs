//! In-memory graph storage implementation
//!
//! Nodes live in an id-keyed table; each node owns its adjacency record.
//! Scans walk the table newest-first and `neighbors` reports the most recently
//! added edges first, so results are deterministic for a fixed store state.
//!
//! One exclusive lock guards the table. Multi-step mutations (edge removal
//! touches two nodes, node removal touches every neighbor) hold the write lock
//! for their whole duration, yielding to the scheduler between steps.

use super::node::{merge_payload, Node};
use super::store::{GraphError, GraphResult, NodePredicate, Store};
use super::types::{EdgeState, NodeId};
use crate::config::GraphConfig;
use crate::scheduler::CooperativeYield;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, trace};

/// Store that keeps everything in memory. All data is lost when it is dropped.
#[derive(Debug)]
pub struct MemoryStore {
    nodes: RwLock<IndexMap<NodeId, Node>>,
    scan_yield_interval: usize,
}

impl MemoryStore {
    /// Create an empty store that yields after every scan step
    pub fn new() -> Self {
        Self::with_config(&GraphConfig::default())
    }

    pub fn with_config(config: &GraphConfig) -> Self {
        MemoryStore {
            nodes: RwLock::new(IndexMap::new()),
            scan_yield_interval: config.scan_yield_interval,
        }
    }

    /// Number of nodes currently stored
    pub async fn node_count(&self) -> usize {
        self.nodes.read().await.len()
    }

    fn yielder(&self) -> CooperativeYield {
        CooperativeYield::new(self.scan_yield_interval)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn add_node(&self, data: Value) -> GraphResult<NodeId> {
        let id = NodeId::generate();
        self.nodes.write().await.insert(id, Node::new(id, data));
        debug!("Added node {}", id);
        Ok(id)
    }

    async fn node(&self, id: NodeId) -> GraphResult<Option<Node>> {
        Ok(self.nodes.read().await.get(&id).cloned())
    }

    async fn nodes(&self) -> GraphResult<Vec<Node>> {
        Ok(self.nodes.read().await.values().cloned().collect())
    }

    async fn data(&self, id: NodeId) -> GraphResult<Value> {
        self.nodes
            .read()
            .await
            .get(&id)
            .map(|node| node.data.clone())
            .ok_or(GraphError::NodeNotFound(id))
    }

    async fn set_data(&self, id: NodeId, data: Value) -> GraphResult<Value> {
        let mut nodes = self.nodes.write().await;
        let node = nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        node.data = data;
        Ok(node.data.clone())
    }

    async fn update_data(&self, id: NodeId, partial: Value) -> GraphResult<Value> {
        let mut nodes = self.nodes.write().await;
        let node = nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        node.data = merge_payload(&node.data, partial)?;
        Ok(node.data.clone())
    }

    async fn find(&self, predicate: Option<&NodePredicate<'_>>) -> GraphResult<Vec<Node>> {
        let nodes = self.nodes.read().await;
        let mut yielder = self.yielder();
        let mut result = Vec::new();

        for node in nodes.values().rev() {
            yielder.step().await;
            if predicate.map_or(true, |matches| matches(node)) {
                result.push(node.clone());
            }
        }

        Ok(result)
    }

    async fn find_first(&self, predicate: Option<&NodePredicate<'_>>) -> GraphResult<Option<Node>> {
        let nodes = self.nodes.read().await;
        let mut yielder = self.yielder();

        for node in nodes.values().rev() {
            if predicate.map_or(true, |matches| matches(node)) {
                return Ok(Some(node.clone()));
            }
            yielder.step().await;
        }

        Ok(None)
    }

    async fn remove_node(&self, id: NodeId) -> GraphResult<()> {
        let mut nodes = self.nodes.write().await;
        let Some(removed) = nodes.shift_remove(&id) else {
            trace!("Remove of unknown node {} ignored", id);
            return Ok(());
        };

        let mut yielder = self.yielder();
        for neighbor_id in removed.edges.keys() {
            yielder.step().await;
            if let Some(neighbor) = nodes.get_mut(neighbor_id) {
                neighbor.edges.shift_remove(&id);
            }
        }

        debug!("Removed node {} and {} adjacency entries", id, removed.edge_count());
        Ok(())
    }

    async fn remove_all_nodes(&self) -> GraphResult<()> {
        self.nodes.write().await.clear();
        debug!("Removed all nodes");
        Ok(())
    }

    async fn add_edge(&self, id1: NodeId, id2: NodeId) -> GraphResult<()> {
        let mut nodes = self.nodes.write().await;
        ensure_exists(&nodes, id1)?;
        ensure_exists(&nodes, id2)?;

        set_edge_state(&mut nodes, id1, id2, EdgeState::CONNECTED);
        set_edge_state(&mut nodes, id2, id1, EdgeState::CONNECTED);
        debug!("Added edge {} <-> {}", id1, id2);
        Ok(())
    }

    async fn add_directed_edge(&self, from: NodeId, to: NodeId) -> GraphResult<()> {
        let mut nodes = self.nodes.write().await;
        ensure_exists(&nodes, from)?;
        ensure_exists(&nodes, to)?;

        // A self-loop has a single adjacency entry; keep it traversable.
        if from != to {
            set_edge_state(&mut nodes, to, from, EdgeState::BACK_REFERENCE);
        }
        set_edge_state(&mut nodes, from, to, EdgeState::CONNECTED);
        debug!("Added directed edge {} -> {}", from, to);
        Ok(())
    }

    async fn remove_edge(&self, id1: NodeId, id2: NodeId) -> GraphResult<()> {
        let mut nodes = self.nodes.write().await;
        if let Some(node) = nodes.get_mut(&id1) {
            node.edges.shift_remove(&id2);
        }
        if let Some(node) = nodes.get_mut(&id2) {
            node.edges.shift_remove(&id1);
        }
        debug!("Removed edge {} <-> {}", id1, id2);
        Ok(())
    }

    async fn remove_all_edges(&self, id: NodeId) -> GraphResult<()> {
        let mut nodes = self.nodes.write().await;
        let Some(node) = nodes.get_mut(&id) else {
            trace!("Edge removal for unknown node {} ignored", id);
            return Ok(());
        };
        let edges = std::mem::take(&mut node.edges);

        let mut yielder = self.yielder();
        for neighbor_id in edges.keys() {
            yielder.step().await;
            if let Some(neighbor) = nodes.get_mut(neighbor_id) {
                neighbor.edges.shift_remove(&id);
            }
        }

        debug!("Removed {} edges of node {}", edges.len(), id);
        Ok(())
    }

    async fn adjacent(&self, id1: NodeId, id2: NodeId) -> GraphResult<bool> {
        let nodes = self.nodes.read().await;
        let node = nodes.get(&id1).ok_or(GraphError::NodeNotFound(id1))?;
        Ok(node.is_connected_to(&id2))
    }

    async fn neighbors(&self, node: &Node, exclude: Option<NodeId>) -> GraphResult<Vec<Node>> {
        let nodes = self.nodes.read().await;
        let mut yielder = self.yielder();
        let mut result = Vec::new();

        for (neighbor_id, state) in node.edges.iter().rev() {
            yielder.step().await;
            if !state.connected || exclude == Some(*neighbor_id) {
                continue;
            }
            match nodes.get(neighbor_id) {
                Some(neighbor) => result.push(neighbor.clone()),
                None => trace!("Stale neighbor {} of {} skipped", neighbor_id, node.id),
            }
        }

        Ok(result)
    }
}

fn ensure_exists(nodes: &IndexMap<NodeId, Node>, id: NodeId) -> GraphResult<()> {
    if nodes.contains_key(&id) {
        Ok(())
    } else {
        Err(GraphError::NodeNotFound(id))
    }
}

fn set_edge_state(nodes: &mut IndexMap<NodeId, Node>, owner: NodeId, neighbor: NodeId, state: EdgeState) {
    if let Some(node) = nodes.get_mut(&owner) {
        node.edges.insert(neighbor, state);
    }
}
