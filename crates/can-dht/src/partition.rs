//! The partition manager.
//!
//! Owns every node of one CAN instance. Joins split a zone, leaves merge one,
//! and both rebuild the neighbor graph from scratch afterwards (O(N^2), fine
//! for tens to low hundreds of nodes).

use std::collections::{BTreeMap, BTreeSet};

use can_topology::{are_adjacent, Point, Zone};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::hash::hash_salted_key;
use crate::routing::{self, Route};
use crate::{
    CanError, Entry, GetResult, InvariantViolation, Node, NodeId, NodeStats, PartitionConfig,
    Result, Snapshot, ZoneAssignment,
};

/// Tolerance for the total-area coverage check.
const AREA_TOLERANCE: f64 = 1e-9;

/// A Content-Addressable Network partition of the unit square.
///
/// Always holds at least one node. Mutations take `&mut self` and reads take
/// `&self`, so wrapping a partition in an `RwLock` gives the required
/// reader/writer discipline in a multi-actor setting.
#[derive(Debug, Clone)]
pub struct Partition {
    config: PartitionConfig,
    nodes: BTreeMap<NodeId, Node>,
    next_id: NodeId,
}

impl Default for Partition {
    fn default() -> Self {
        Self::new(PartitionConfig::default())
    }
}

impl Partition {
    /// Create a partition whose first node owns the whole space.
    pub fn new(config: PartitionConfig) -> Self {
        let first = Node::new(NodeId::FIRST, Zone::UNIT);
        info!(node = %first.id, "partition created");
        Self {
            config,
            nodes: BTreeMap::from([(NodeId::FIRST, first)]),
            next_id: NodeId::FIRST.next(),
        }
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a partition keeps at least one node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Neighbor set of a node.
    pub fn neighbors(&self, id: NodeId) -> Result<&BTreeSet<NodeId>> {
        self.nodes
            .get(&id)
            .map(Node::neighbors)
            .ok_or(CanError::NodeNotFound(id))
    }

    /// Total number of stored keys.
    pub fn key_count(&self) -> usize {
        self.nodes.values().map(|node| node.store.len()).sum()
    }

    /// The coordinate a key hashes to under this partition's salt.
    pub fn hash(&self, key: &str) -> Point {
        hash_salted_key(&self.config.salt, key)
    }

    /// The node whose zone contains `point`, by linear scan of all zones.
    ///
    /// For renderers and checks only; lookups go through [`Self::lookup`].
    pub fn owner_of(&self, point: Point) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.zone.contains(point))
            .map(|node| node.id)
    }

    /// The node whose zone center is nearest to `point`, lowest id on ties.
    ///
    /// Used as the starting node for key lookups.
    pub fn entry_node(&self, point: Point) -> NodeId {
        self.nodes
            .values()
            .map(|node| (node.zone.center().distance(&point), node.id))
            .min_by(|(a, a_id), (b, b_id)| a.total_cmp(b).then(a_id.cmp(b_id)))
            .map(|(_, id)| id)
            .unwrap_or(NodeId::FIRST)
    }

    fn first_node(&self) -> NodeId {
        self.nodes.keys().next().copied().unwrap_or(NodeId::FIRST)
    }

    /// Route to the owner of `point`, starting at `start`.
    pub fn lookup(&self, point: Point, start: NodeId) -> Result<Route> {
        if !point.in_unit_square() {
            return Err(CanError::PointOutOfBounds(point));
        }
        routing::route(&self.nodes, point, start)
    }

    /// Hash a key and route to its owner from the nearest entry node.
    pub fn locate(&self, key: &str) -> Result<Route> {
        let point = self.hash(key);
        self.lookup(point, self.entry_node(point))
    }

    /// Join a new node at `point`.
    ///
    /// The owner of `point` splits its zone along the longer side; the new
    /// node receives the half containing `point` and every key hashing into
    /// that half.
    pub fn add_node(&mut self, point: Point) -> Result<NodeId> {
        let route = self.lookup(point, self.first_node())?;
        let owner_id = route.owner();
        let owner = self
            .nodes
            .get_mut(&owner_id)
            .ok_or(CanError::NodeNotFound(owner_id))?;

        let (keep, split_off) = owner.zone.split_along_longer_side(point)?;

        let id = self.next_id;
        self.next_id = id.next();

        owner.zone = keep;
        let mut node = Node::new(id, split_off);
        node.store = owner.store.take_within(&split_off);

        info!(
            node = %id,
            owner = %owner_id,
            zone = %split_off,
            moved_keys = node.store.len(),
            hops = route.hops(),
            "node joined"
        );

        self.nodes.insert(id, node);
        self.rebuild_neighbors();
        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(id)
    }

    /// Join a new node at a uniformly random point drawn from `rng`.
    pub fn add_random_node<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<NodeId> {
        let point = Point::new(rng.gen::<f64>(), rng.gen::<f64>());
        self.add_node(point)
    }

    /// Remove a node, merging its zone and keys into a neighbor.
    ///
    /// Neighbors are tried in id order; the first whose zone forms a
    /// rectangle with the leaving node's zone survives. Returns the
    /// survivor's id. On failure nothing changes.
    pub fn delete_node(&mut self, id: NodeId) -> Result<NodeId> {
        let victim = self.nodes.get(&id).ok_or(CanError::NodeNotFound(id))?;
        if self.nodes.len() == 1 {
            return Err(CanError::SoleNode(id));
        }

        let candidate = victim
            .neighbors
            .iter()
            .filter_map(|neighbor| self.nodes.get(neighbor))
            .find_map(|neighbor| {
                victim
                    .zone
                    .merge(&neighbor.zone)
                    .ok()
                    .map(|merged| (neighbor.id, merged))
            });
        let Some((survivor_id, merged)) = candidate else {
            warn!(node = %id, "delete refused: no mergeable neighbor");
            return Err(CanError::NoMergeableNeighbor(id));
        };

        let victim = self.nodes.remove(&id).ok_or(CanError::NodeNotFound(id))?;
        let Some(survivor) = self.nodes.get_mut(&survivor_id) else {
            self.nodes.insert(id, victim);
            return Err(CanError::NodeNotFound(survivor_id));
        };

        survivor.zone = merged;
        let moved = survivor.store.absorb(victim.store);

        info!(
            node = %id,
            survivor = %survivor_id,
            zone = %merged,
            moved_keys = moved,
            "node left"
        );

        self.rebuild_neighbors();
        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(survivor_id)
    }

    /// Store a value under `key` at the owner of its coordinate.
    /// Overwrites an existing value. Returns the owner.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<NodeId> {
        let key = key.into();
        let route = self.locate(&key)?;
        let owner_id = route.owner();
        let owner = self
            .nodes
            .get_mut(&owner_id)
            .ok_or(CanError::NodeNotFound(owner_id))?;

        debug!(key = %key, point = %route.point(), owner = %owner_id, hops = route.hops(), "put");
        owner.store.insert(Entry::new(key, value, route.point()));
        Ok(owner_id)
    }

    /// Look up `key`: its coordinate, the routing path, the owner and the
    /// stored value.
    pub fn get(&self, key: &str) -> Result<GetResult> {
        let route = self.locate(key)?;
        let owner = route.owner();
        let point = route.point();
        let value = self
            .nodes
            .get(&owner)
            .and_then(|node| node.store.get(key))
            .map(|entry| entry.value.clone())
            .ok_or_else(|| CanError::KeyNotFound(key.to_string()))?;

        Ok(GetResult {
            point,
            path: route.into_path(),
            owner,
            value,
        })
    }

    /// The current `(NodeId, Zone)` list.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            zones: self
                .nodes
                .values()
                .map(|node| ZoneAssignment {
                    id: node.id,
                    zone: node.zone,
                })
                .collect(),
        }
    }

    /// Per-node area, key and neighbor counts.
    pub fn stats(&self) -> Vec<NodeStats> {
        self.nodes
            .values()
            .map(|node| NodeStats {
                id: node.id,
                zone: node.zone,
                area: node.zone.area(),
                keys: node.store.len(),
                neighbors: node.neighbors.len(),
            })
            .collect()
    }

    /// Geometric adjacency of every node, computed from zones alone.
    fn adjacency(&self) -> BTreeMap<NodeId, BTreeSet<NodeId>> {
        let zones: Vec<(NodeId, Zone)> = self
            .nodes
            .values()
            .map(|node| (node.id, node.zone))
            .collect();
        let mut adjacency: BTreeMap<NodeId, BTreeSet<NodeId>> =
            zones.iter().map(|(id, _)| (*id, BTreeSet::new())).collect();

        for (i, (a, zone_a)) in zones.iter().enumerate() {
            for (b, zone_b) in &zones[i + 1..] {
                if are_adjacent(zone_a, zone_b) {
                    adjacency.entry(*a).or_default().insert(*b);
                    adjacency.entry(*b).or_default().insert(*a);
                }
            }
        }
        adjacency
    }

    fn rebuild_neighbors(&mut self) {
        let mut adjacency = self.adjacency();
        let mut edges = 0;
        for node in self.nodes.values_mut() {
            node.neighbors = adjacency.remove(&node.id).unwrap_or_default();
            edges += node.neighbors.len();
        }
        debug!(nodes = self.nodes.len(), edges = edges / 2, "neighbor graph rebuilt");
    }

    /// Verify coverage, disjointness, neighbor consistency and key
    /// placement.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantViolation> {
        if self.nodes.is_empty() {
            return Err(InvariantViolation::Empty);
        }

        let nodes: Vec<&Node> = self.nodes.values().collect();
        for node in &nodes {
            if !node.zone.is_within(&Zone::UNIT) {
                return Err(InvariantViolation::OutsideSpace {
                    id: node.id,
                    zone: node.zone,
                });
            }
        }

        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                let area = a.zone.overlap_area(&b.zone);
                if area > 0.0 {
                    return Err(InvariantViolation::Overlap {
                        a: a.id,
                        b: b.id,
                        area,
                    });
                }
            }
        }

        let total: f64 = nodes.iter().map(|node| node.zone.area()).sum();
        if (total - 1.0).abs() > AREA_TOLERANCE {
            return Err(InvariantViolation::Coverage(total));
        }

        let adjacency = self.adjacency();
        for node in &nodes {
            let expected = adjacency.get(&node.id).cloned().unwrap_or_default();
            if expected != node.neighbors {
                return Err(InvariantViolation::NeighborMismatch {
                    id: node.id,
                    expected: expected.into_iter().collect(),
                    actual: node.neighbors.iter().copied().collect(),
                });
            }
        }

        for node in &nodes {
            if let Some(entry) = node.store.entries().find(|e| !node.zone.contains(e.point)) {
                return Err(InvariantViolation::MisplacedKey {
                    key: entry.key.clone(),
                    node: node.id,
                    point: entry.point,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zone(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Zone {
        Zone::new(xmin, xmax, ymin, ymax).unwrap()
    }

    /// N01 = left half, N02 = bottom-right strip, N03 = top-right block.
    fn three_nodes() -> Partition {
        let mut can = Partition::default();
        assert_eq!(can.add_node(Point::new(0.5, 0.5)).unwrap(), NodeId(2));
        assert_eq!(can.add_node(Point::new(0.75, 0.25)).unwrap(), NodeId(3));
        can
    }

    #[test]
    fn starts_with_one_node_covering_space() {
        let can = Partition::default();
        assert_eq!(can.len(), 1);
        let snapshot = can.snapshot();
        assert_eq!(snapshot.zones[0].id, NodeId(1));
        assert_eq!(snapshot.zones[0].zone, Zone::UNIT);
        assert!(can.neighbors(NodeId(1)).unwrap().is_empty());
        assert_eq!(can.check_invariants(), Ok(()));
    }

    #[test]
    fn first_join_splits_at_half() {
        let mut can = Partition::default();
        let id = can.add_node(Point::new(0.5, 0.5)).unwrap();

        assert_eq!(id, NodeId(2));
        assert_eq!(can.node(NodeId(1)).unwrap().zone(), &zone(0.0, 0.5, 0.0, 1.0));
        assert_eq!(can.node(NodeId(2)).unwrap().zone(), &zone(0.5, 1.0, 0.0, 1.0));
        assert!(can.neighbors(NodeId(1)).unwrap().contains(&NodeId(2)));
        assert!(can.neighbors(NodeId(2)).unwrap().contains(&NodeId(1)));
    }

    #[test]
    fn join_moves_keys_into_new_half() {
        let mut can = Partition::default();
        let keys: Vec<String> = (0..50).map(|i| format!("key-{i}")).collect();
        for key in &keys {
            can.put(key.as_str(), "v").unwrap();
        }

        let new = can.add_node(Point::new(0.5, 0.5)).unwrap();

        assert_eq!(can.key_count(), keys.len());
        for key in &keys {
            let point = can.hash(key);
            let holder = if point.x >= 0.5 { new } else { NodeId(1) };
            assert!(can.node(holder).unwrap().store().get(key).is_some(), "{key}");
        }
        assert_eq!(can.check_invariants(), Ok(()));
    }

    #[test]
    fn join_rejects_point_outside_space() {
        let mut can = Partition::default();
        assert_eq!(
            can.add_node(Point::new(1.0, 0.5)),
            Err(CanError::PointOutOfBounds(Point::new(1.0, 0.5)))
        );
        assert_eq!(can.len(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut can = three_nodes();
        can.delete_node(NodeId(3)).unwrap();
        let id = can.add_node(Point::new(0.9, 0.9)).unwrap();
        assert_eq!(id, NodeId(4));
    }

    #[test]
    fn delete_merges_into_rectangular_neighbor() {
        let mut can = three_nodes();
        can.put("alpha", "hello").unwrap();
        let keys_before = can.key_count();

        let survivor = can.delete_node(NodeId(2)).unwrap();

        assert_eq!(survivor, NodeId(3));
        assert_eq!(can.len(), 2);
        assert_eq!(can.node(NodeId(3)).unwrap().zone(), &zone(0.5, 1.0, 0.0, 1.0));
        assert_eq!(can.key_count(), keys_before);
        assert_eq!(can.get("alpha").unwrap().value, "hello");
        assert_eq!(can.check_invariants(), Ok(()));
    }

    #[test]
    fn delete_without_mergeable_neighbor_is_refused() {
        let mut can = three_nodes();
        let before = can.snapshot();

        assert_eq!(
            can.delete_node(NodeId(1)),
            Err(CanError::NoMergeableNeighbor(NodeId(1)))
        );
        assert_eq!(can.snapshot(), before);
        assert_eq!(can.check_invariants(), Ok(()));
    }

    #[test]
    fn delete_sole_node_is_refused() {
        let mut can = Partition::default();
        assert_eq!(can.delete_node(NodeId(1)), Err(CanError::SoleNode(NodeId(1))));
        assert_eq!(can.len(), 1);
    }

    #[test]
    fn delete_unknown_node() {
        let mut can = three_nodes();
        assert_eq!(
            can.delete_node(NodeId(42)),
            Err(CanError::NodeNotFound(NodeId(42)))
        );
    }

    #[test]
    fn put_then_get_roundtrip() {
        let mut can = three_nodes();
        let owner = can.put("alpha", "hello").unwrap();
        let got = can.get("alpha").unwrap();

        assert_eq!(got.value, "hello");
        assert_eq!(got.owner, owner);
        assert_eq!(got.point, can.hash("alpha"));
        assert_eq!(can.owner_of(got.point), Some(owner));
        assert_eq!(got.path.last(), Some(&owner));
    }

    #[test]
    fn get_is_idempotent() {
        let mut can = three_nodes();
        can.put("alpha", "hello").unwrap();
        let first = can.get("alpha").unwrap();
        let second = can.get("alpha").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn put_overwrites_value() {
        let mut can = three_nodes();
        can.put("alpha", "one").unwrap();
        can.put("alpha", "two").unwrap();
        assert_eq!(can.get("alpha").unwrap().value, "two");
        assert_eq!(can.key_count(), 1);
    }

    #[test]
    fn get_missing_key() {
        let can = three_nodes();
        assert_eq!(
            can.get("missing"),
            Err(CanError::KeyNotFound("missing".to_string()))
        );
    }

    #[test]
    fn lookup_is_start_independent() {
        let mut can = Partition::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..24 {
            can.add_random_node(&mut rng).unwrap();
        }

        for i in 0..100 {
            let point = can.hash(&format!("probe-{i}"));
            let expected = can.owner_of(point).unwrap();
            for start in can.node_ids() {
                let route = can.lookup(point, start).unwrap();
                assert_eq!(route.owner(), expected);
                assert!(route.hops() < can.len());
            }
        }
    }

    #[test]
    fn random_joins_keep_invariants() {
        let mut can = Partition::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..40 {
            can.add_random_node(&mut rng).unwrap();
            assert_eq!(can.check_invariants(), Ok(()));
        }
        assert_eq!(can.len(), 41);
    }

    #[test]
    fn salt_moves_keys() {
        let a = Partition::new(PartitionConfig::with_salt("one"));
        let b = Partition::new(PartitionConfig::with_salt("two"));
        assert_ne!(a.hash("alpha"), b.hash("alpha"));
    }

    #[test]
    fn stale_neighbor_graph_is_detected() {
        let mut can = three_nodes();
        can.nodes.get_mut(&NodeId(1)).unwrap().neighbors.remove(&NodeId(3));
        assert!(matches!(
            can.check_invariants(),
            Err(InvariantViolation::NeighborMismatch { id, .. }) if id == NodeId(1)
        ));
    }

    #[test]
    fn stats_report_every_node() {
        let mut can = three_nodes();
        can.put("alpha", "hello").unwrap();
        let stats = can.stats();

        assert_eq!(stats.len(), 3);
        let area: f64 = stats.iter().map(|s| s.area).sum();
        assert!((area - 1.0).abs() < 1e-12);
        assert_eq!(stats.iter().map(|s| s.keys).sum::<usize>(), 1);
        assert_eq!(stats[0].neighbors, 2);
    }

    #[test]
    fn entry_node_is_nearest_center() {
        let can = three_nodes();
        assert_eq!(can.entry_node(Point::new(0.1, 0.5)), NodeId(1));
        assert_eq!(can.entry_node(Point::new(0.9, 0.05)), NodeId(2));
        assert_eq!(can.entry_node(Point::new(0.9, 0.9)), NodeId(3));
    }
}
