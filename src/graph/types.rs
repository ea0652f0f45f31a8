//! Core type definitions for the graph store

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node
///
/// Identifiers are time-ordered (UUID v7) and issued by the store on insert.
/// They are never reused, even after the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Allocate a fresh identifier
    pub fn generate() -> Self {
        NodeId(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<Uuid> for NodeId {
    fn from(id: Uuid) -> Self {
        NodeId(id)
    }
}

/// Directional marker kept in a node's adjacency record.
///
/// `connected == true` means the edge can be walked from the owning node toward
/// the neighbor. A directed edge leaves a `connected == false` back-reference
/// on its target so removal can find both halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeState {
    pub connected: bool,
}

impl EdgeState {
    pub const CONNECTED: EdgeState = EdgeState { connected: true };
    pub const BACK_REFERENCE: EdgeState = EdgeState { connected: false };
}
