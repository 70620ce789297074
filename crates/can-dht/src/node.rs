//! Node identifiers and node state.

use std::collections::BTreeSet;
use std::str::FromStr;

use can_topology::Zone;
use serde::{Deserialize, Serialize};

use crate::{CanError, KeyStore};

/// A node identifier, shown as `N01`, `N02`, ...
///
/// Ids are assigned in increasing order and never reused. Ordering is by
/// sequence number, so `N09 < N10 < N100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeId(pub u32);

impl NodeId {
    /// The node every partition starts with.
    pub const FIRST: Self = Self(1);

    /// The id assigned after this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{:02}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = CanError;

    /// Accepts `N01`, `n1` or `1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('N')
            .or_else(|| trimmed.strip_prefix('n'))
            .unwrap_or(trimmed);
        digits
            .parse()
            .map(Self)
            .map_err(|_| CanError::InvalidNodeId(s.to_string()))
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for NodeId {
    type Error = CanError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Render a routing path as `N01 -> N04 -> N07`.
pub fn format_path(path: &[NodeId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A node in the partition.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) zone: Zone,
    pub(crate) store: KeyStore,
    /// Derived from zone geometry; recomputed after every structural change.
    pub(crate) neighbors: BTreeSet<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, zone: Zone) -> Self {
        Self {
            id,
            zone,
            store: KeyStore::new(),
            neighbors: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    /// Neighbor ids in ascending order.
    pub fn neighbors(&self) -> &BTreeSet<NodeId> {
        &self.neighbors
    }
}
