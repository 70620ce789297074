//! Error types for the CAN core.

use can_topology::{Point, Zone, ZoneError};
use thiserror::Error;

use crate::node::{format_path, NodeId};

/// Result type for CAN operations.
pub type Result<T> = std::result::Result<T, CanError>;

/// Errors returned by partition, routing and store operations.
///
/// Every failing operation leaves the partition exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanError {
    /// No node with this id exists.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The key is not stored at its owner.
    #[error("key {0:?} not found")]
    KeyNotFound(String),

    /// The last node cannot leave; the space would be uncovered.
    #[error("cannot delete {0}: it is the only node")]
    SoleNode(NodeId),

    /// No neighbor forms a rectangle with the node's zone.
    #[error("cannot delete {0}: no neighbor forms a rectangle with its zone")]
    NoMergeableNeighbor(NodeId),

    /// Routing would revisit a node. Signals a broken partition.
    #[error("routing loop toward {target} via {}", format_path(.path))]
    RoutingLoop { target: Point, path: Vec<NodeId> },

    /// Routing reached a node with no usable neighbor. Signals a broken
    /// partition.
    #[error("routing dead end toward {target} via {}", format_path(.path))]
    RoutingDeadEnd { target: Point, path: Vec<NodeId> },

    /// The point lies outside `[0,1) × [0,1)`.
    #[error("point {0} is outside the coordinate space")]
    PointOutOfBounds(Point),

    /// Text that does not parse as a node id.
    #[error("invalid node id {0:?}")]
    InvalidNodeId(String),

    /// Zone geometry error.
    #[error(transparent)]
    Zone(#[from] ZoneError),
}

impl CanError {
    /// Whether this error reveals a violated partition invariant rather than
    /// a refused request.
    pub fn is_bug(&self) -> bool {
        matches!(self, Self::RoutingLoop { .. } | Self::RoutingDeadEnd { .. })
    }
}

/// A partition invariant that does not hold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("partition has no nodes")]
    Empty,

    #[error("zone {zone} of {id} leaves the coordinate space")]
    OutsideSpace { id: NodeId, zone: Zone },

    #[error("zones of {a} and {b} overlap by {area}")]
    Overlap { a: NodeId, b: NodeId, area: f64 },

    #[error("zones cover area {0}, expected 1")]
    Coverage(f64),

    #[error("neighbors of {id} are [{}], geometry says [{}]", format_path(.actual), format_path(.expected))]
    NeighborMismatch {
        id: NodeId,
        expected: Vec<NodeId>,
        actual: Vec<NodeId>,
    },

    #[error("key {key:?} stored at {node} but hashes to {point}")]
    MisplacedKey {
        key: String,
        node: NodeId,
        point: Point,
    },
}
