//! Read-only views of a partition for renderers and reports.

use can_topology::{Point, Zone};
use serde::{Deserialize, Serialize};

use crate::NodeId;

/// One node's zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneAssignment {
    pub id: NodeId,
    pub zone: Zone,
}

/// The `(NodeId, Zone)` list of a partition, in id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub zones: Vec<ZoneAssignment>,
}

impl Snapshot {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneAssignment> {
        self.zones.iter()
    }

    /// The node whose zone contains `point`, by linear scan.
    pub fn owner_of(&self, point: Point) -> Option<NodeId> {
        self.zones
            .iter()
            .find(|assignment| assignment.zone.contains(point))
            .map(|assignment| assignment.id)
    }
}

/// Per-node figures for status reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    pub id: NodeId,
    pub zone: Zone,
    pub area: f64,
    pub keys: usize,
    pub neighbors: usize,
}

/// The answer to a GET.
#[derive(Debug, Clone, PartialEq)]
pub struct GetResult {
    /// Coordinate the key hashed to.
    pub point: Point,
    /// Nodes visited, entry node first and owner last.
    pub path: Vec<NodeId>,
    pub owner: NodeId,
    pub value: String,
}
