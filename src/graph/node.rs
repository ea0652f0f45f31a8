//! Node implementation
//!
//! A node is an identifier, an opaque JSON payload and an adjacency record
//! mapping each neighbor to the state of the edge toward it.

use super::store::{GraphError, GraphResult};
use super::types::{EdgeState, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node in the graph
///
/// Nodes handed out by a [`Store`](super::store::Store) are snapshots: mutating
/// one does not write back to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Payload, any JSON value including `null`
    pub data: Value,

    /// Adjacency record in edge insertion order
    pub edges: IndexMap<NodeId, EdgeState>,
}

impl Node {
    /// Create a node with no edges
    pub fn new(id: NodeId, data: Value) -> Self {
        Node {
            id,
            data,
            edges: IndexMap::new(),
        }
    }

    /// Edge state toward `neighbor`, if this node references it at all
    pub fn edge_state(&self, neighbor: &NodeId) -> Option<EdgeState> {
        self.edges.get(neighbor).copied()
    }

    /// Check whether a traversable edge leads from this node to `neighbor`
    pub fn is_connected_to(&self, neighbor: &NodeId) -> bool {
        self.edge_state(neighbor).is_some_and(|state| state.connected)
    }

    /// Ids of every neighbor reachable over a connected edge, in insertion order
    pub fn neighbor_ids(&self) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|(_, state)| state.connected)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of adjacency entries, back-references included
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl From<&Node> for NodeId {
    fn from(node: &Node) -> Self {
        node.id
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Shallow-merge `partial` into `existing`.
///
/// Keys of `partial` replace or extend keys of `existing`. A `null` payload is
/// treated as an empty mapping; any other non-object on either side is rejected.
pub fn merge_payload(existing: &Value, partial: Value) -> GraphResult<Value> {
    let Value::Object(updates) = partial else {
        return Err(GraphError::InvalidArgument(format!(
            "partial update must be a mapping, got {}",
            json_type_name(&partial)
        )));
    };

    let mut merged = match existing {
        Value::Object(map) => map.clone(),
        Value::Null => serde_json::Map::new(),
        other => {
            return Err(GraphError::InvalidArgument(format!(
                "cannot merge into a {} payload",
                json_type_name(other)
            )))
        }
    };

    for (key, value) in updates {
        merged.insert(key, value);
    }

    Ok(Value::Object(merged))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
