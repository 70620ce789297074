//! CAN Distributed Hash Table
//!
//! The administrative core of a 2-dimensional Content-Addressable Network.
//! A [`Partition`] owns a set of nodes that jointly and exclusively tile the
//! unit square, each node owning one rectangular zone and the keys that hash
//! into it.
//!
//! # Design
//!
//! Keys are hashed with Blake3 to a coordinate in `[0,1) × [0,1)`. A lookup
//! starts at some node and walks the neighbor graph greedily toward the
//! coordinate until it reaches the zone that contains it. No global index is
//! consulted while routing.
//!
//! # Structural Changes
//!
//! - **Join**: the owner of the join point splits its zone along the longer
//!   side; the joining node takes the half containing the point and the keys
//!   that hash into it.
//! - **Leave**: the leaving node's zone is merged into a neighbor whose union
//!   with it is a rectangle. If no such neighbor exists the leave is refused.
//!
//! The neighbor graph is recomputed from zone geometry after every join or
//! leave.

mod config;
mod entry;
mod error;
mod hash;
mod node;
mod partition;
mod routing;
mod snapshot;

pub use config::PartitionConfig;
pub use entry::{Entry, KeyStore};
pub use error::{CanError, InvariantViolation, Result};
pub use hash::{digest_salted_key, hash_key, hash_salted_key, KeyDigest, DEFAULT_SALT};
pub use node::{format_path, Node, NodeId};
pub use partition::Partition;
pub use routing::Route;
pub use snapshot::{GetResult, NodeStats, Snapshot, ZoneAssignment};

pub use can_topology::{Point, Zone};
