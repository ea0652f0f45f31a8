//! Adjacency-list import and export
//!
//! An adjacency list is an ordered mapping from caller-chosen keys to
//! `{ "data": ..., "neighbors": [...] }` entries:
//!
//! ```json
//! {
//!   "a": { "data": "start", "neighbors": ["b", "c"] },
//!   "b": { "data": { "cost": 10 }, "neighbors": ["c"] },
//!   "c": {}
//! }
//! ```
//!
//! Importing creates one node per key, in order of first appearance (an entry's
//! own key, then any of its neighbors not seen yet), and only then adds the
//! edges in list order. Keys that only ever appear as a neighbor get an empty
//! object payload; entries without `data` get `null`.

use crate::graph::{Graph, GraphResult, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// One entry of an adjacency list, keyed by `K`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyEntry<K = String> {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub neighbors: Vec<K>,
}

/// Adjacency list keyed by caller-chosen names
pub type AdjacencyList = IndexMap<String, AdjacencyEntry>;

/// Adjacency list keyed by store-issued ids, as produced by [`to_adjacency_list`]
pub type ExportedAdjacencyList = IndexMap<NodeId, AdjacencyEntry<NodeId>>;

/// Parse an adjacency list from JSON
pub fn from_json(json: &str) -> GraphResult<AdjacencyList> {
    Ok(serde_json::from_str(json)?)
}

/// Populate `graph` from `list` using directed edges (key toward each neighbor).
///
/// Returns the mapping from list keys to the ids the store issued.
pub async fn directed(graph: &Graph, list: &AdjacencyList) -> GraphResult<IndexMap<String, NodeId>> {
    build(graph, list, true).await
}

/// Populate `graph` from `list` using undirected edges
pub async fn undirected(graph: &Graph, list: &AdjacencyList) -> GraphResult<IndexMap<String, NodeId>> {
    build(graph, list, false).await
}

/// Export every node of `graph` with its payload and traversable neighbor ids
pub async fn to_adjacency_list(graph: &Graph) -> GraphResult<ExportedAdjacencyList> {
    let nodes = graph.nodes().await?;
    let mut list = IndexMap::with_capacity(nodes.len());
    for node in nodes {
        let entry = AdjacencyEntry {
            neighbors: node.neighbor_ids(),
            data: node.data,
        };
        list.insert(node.id, entry);
    }
    Ok(list)
}

async fn build(
    graph: &Graph,
    list: &AdjacencyList,
    directed: bool,
) -> GraphResult<IndexMap<String, NodeId>> {
    let mut payloads: IndexMap<&str, Value> = IndexMap::new();
    let mut edges: Vec<(&str, &str)> = Vec::new();

    for (key, entry) in list {
        payloads.insert(key.as_str(), entry.data.clone());
        for neighbor in &entry.neighbors {
            edges.push((key.as_str(), neighbor.as_str()));
            payloads.entry(neighbor.as_str()).or_insert_with(|| json!({}));
        }
    }

    let mut ids = IndexMap::with_capacity(payloads.len());
    for (key, data) in payloads {
        let id = graph.add_node(data).await?;
        ids.insert(key.to_string(), id);
    }

    for (from, to) in &edges {
        let (from, to) = (ids[*from], ids[*to]);
        if directed {
            graph.add_directed_edge(from, to).await?;
        } else {
            graph.add_edge(from, to).await?;
        }
    }

    debug!(
        "Imported adjacency list: {} nodes, {} {} edges",
        ids.len(),
        edges.len(),
        if directed { "directed" } else { "undirected" }
    );
    Ok(ids)
}
