//! Core types for the graft project tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// NodeId: opaque identifier assigned to a tree node when it is created.
///
/// Ids are random v4 UUIDs, so they stay unique across every tree in the
/// process and are never reused after a node is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        NodeId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
