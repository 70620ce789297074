//! Greedy routing over the neighbor graph.
//!
//! A lookup walks from a start node to the node whose zone contains the
//! target point, using only each visited node's own neighbor set.
//!
//! # Hop Selection
//!
//! Neighbors are ranked by, in order:
//! 1. whether the neighbor's zone contains the target,
//! 2. distance from the target to the neighbor's closed rectangle,
//! 3. distance from the target to the neighbor's zone center,
//! 4. lowest node id.
//!
//! In a valid partition the distance from the target to the current zone
//! strictly decreases until it reaches zero, and from a zone touching the
//! target the owner is at most two hops away, so no node is ever visited
//! twice. A revisit means the neighbor graph disagrees with the zones.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use can_topology::Point;
use tracing::{debug, warn};

use crate::{CanError, Node, NodeId, Result};

/// The outcome of a lookup: every node visited, start to owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    point: Point,
    path: Vec<NodeId>,
    owner: NodeId,
}

impl Route {
    /// The target coordinate.
    pub fn point(&self) -> Point {
        self.point
    }

    /// Visited nodes, starting node first and owner last.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// The node whose zone contains the target.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Number of forwarding steps taken.
    pub fn hops(&self) -> usize {
        self.path.len() - 1
    }

    pub(crate) fn into_path(self) -> Vec<NodeId> {
        self.path
    }
}

/// Ranking key for a candidate next hop. Smaller is better.
struct HopRank {
    misses: bool,
    gap: f64,
    center: f64,
    id: NodeId,
}

impl HopRank {
    fn of(node: &Node, target: Point) -> Self {
        Self {
            misses: !node.zone.contains(target),
            gap: node.zone.distance_to(target),
            center: node.zone.center().distance(&target),
            id: node.id,
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        self.misses
            .cmp(&other.misses)
            .then(self.gap.total_cmp(&other.gap))
            .then(self.center.total_cmp(&other.center))
            .then(self.id.cmp(&other.id))
    }
}

/// Pick the best neighbor of `current` to forward toward `target`.
fn next_hop<'a>(
    nodes: &'a BTreeMap<NodeId, Node>,
    current: &Node,
    target: Point,
) -> Option<&'a Node> {
    current
        .neighbors
        .iter()
        .filter_map(|id| nodes.get(id))
        .map(|node| (HopRank::of(node, target), node))
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, node)| node)
}

/// Route from `start` to the owner of `target`.
pub(crate) fn route(
    nodes: &BTreeMap<NodeId, Node>,
    target: Point,
    start: NodeId,
) -> Result<Route> {
    let mut current = nodes.get(&start).ok_or(CanError::NodeNotFound(start))?;
    let mut path = vec![start];

    loop {
        if current.zone.contains(target) {
            debug!(
                target = %target,
                owner = %current.id,
                hops = path.len() - 1,
                "route complete"
            );
            return Ok(Route {
                point: target,
                owner: current.id,
                path,
            });
        }

        let Some(next) = next_hop(nodes, current, target) else {
            warn!(target = %target, at = %current.id, "routing dead end");
            return Err(CanError::RoutingDeadEnd { target, path });
        };

        if path.contains(&next.id) {
            warn!(target = %target, revisit = %next.id, "routing loop");
            path.push(next.id);
            return Err(CanError::RoutingLoop { target, path });
        }

        debug!(from = %current.id, to = %next.id, "forward");
        path.push(next.id);
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use can_topology::{are_adjacent, Zone};

    /// Build a node map from zones, ids 1.., with neighbors from geometry.
    fn nodes_from(zones: &[Zone]) -> BTreeMap<NodeId, Node> {
        let mut nodes: BTreeMap<NodeId, Node> = zones
            .iter()
            .enumerate()
            .map(|(i, z)| {
                let id = NodeId(i as u32 + 1);
                (id, Node::new(id, *z))
            })
            .collect();
        let ids: Vec<NodeId> = nodes.keys().copied().collect();
        for &a in &ids {
            for &b in &ids {
                if a != b && are_adjacent(&nodes[&a].zone, &nodes[&b].zone) {
                    nodes.get_mut(&a).unwrap().neighbors.insert(b);
                }
            }
        }
        nodes
    }

    fn zone(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Zone {
        Zone::new(xmin, xmax, ymin, ymax).unwrap()
    }

    /// Left half, bottom-right quarter strip, top-right block.
    fn three_zones() -> Vec<Zone> {
        vec![
            zone(0.0, 0.5, 0.0, 1.0),
            zone(0.5, 1.0, 0.0, 0.25),
            zone(0.5, 1.0, 0.25, 1.0),
        ]
    }

    #[test]
    fn start_at_owner_is_zero_hops() {
        let nodes = nodes_from(&three_zones());
        let route = route(&nodes, Point::new(0.1, 0.1), NodeId(1)).unwrap();
        assert_eq!(route.owner(), NodeId(1));
        assert_eq!(route.path(), &[NodeId(1)]);
        assert_eq!(route.hops(), 0);
    }

    #[test]
    fn routes_to_neighbor_owner() {
        let nodes = nodes_from(&three_zones());
        let route = route(&nodes, Point::new(0.75, 0.1), NodeId(1)).unwrap();
        assert_eq!(route.owner(), NodeId(2));
        assert_eq!(route.path(), &[NodeId(1), NodeId(2)]);
    }

    #[test]
    fn owner_preferred_over_nearer_center() {
        // Node 3's center is nearer the target, but node 2 contains it.
        let zones = vec![
            zone(0.0, 0.5, 0.0, 1.0),
            zone(0.5, 1.0, 0.4, 0.6),
            zone(0.5, 0.55, 0.6, 1.0),
            zone(0.55, 1.0, 0.6, 1.0),
            zone(0.5, 1.0, 0.0, 0.4),
        ];
        let nodes = nodes_from(&zones);
        let target = Point::new(0.5, 0.599);
        let near = zones[2].center().distance(&target);
        let owner = zones[1].center().distance(&target);
        assert!(near < owner);

        let route = route(&nodes, target, NodeId(1)).unwrap();
        assert_eq!(route.path(), &[NodeId(1), NodeId(2)]);
    }

    #[test]
    fn equal_candidates_break_ties_by_id() {
        // Quadrants; from bottom-left both bottom-right and top-left are
        // equally far from the target in the top-right.
        let zones = vec![
            zone(0.0, 0.5, 0.0, 0.5),
            zone(0.5, 1.0, 0.0, 0.5),
            zone(0.0, 0.5, 0.5, 1.0),
            zone(0.5, 1.0, 0.5, 1.0),
        ];
        let nodes = nodes_from(&zones);
        let route = route(&nodes, Point::new(0.9, 0.9), NodeId(1)).unwrap();
        assert_eq!(route.path(), &[NodeId(1), NodeId(2), NodeId(4)]);
    }

    #[test]
    fn corner_target_reaches_owner() {
        // Quadrants; target is the shared corner, owned by the top-right.
        let zones = vec![
            zone(0.0, 0.5, 0.0, 0.5),
            zone(0.5, 1.0, 0.0, 0.5),
            zone(0.0, 0.5, 0.5, 1.0),
            zone(0.5, 1.0, 0.5, 1.0),
        ];
        let nodes = nodes_from(&zones);
        let route = route(&nodes, Point::new(0.5, 0.5), NodeId(1)).unwrap();
        assert_eq!(route.owner(), NodeId(4));
        assert_eq!(route.hops(), 2);
    }

    #[test]
    fn stale_graph_loops() {
        let mut nodes = nodes_from(&three_zones());
        nodes.get_mut(&NodeId(1)).unwrap().neighbors = [NodeId(2)].into();
        nodes.get_mut(&NodeId(2)).unwrap().neighbors = [NodeId(1)].into();

        let err = route(&nodes, Point::new(0.75, 0.75), NodeId(1)).unwrap_err();
        assert!(matches!(err, CanError::RoutingLoop { .. }));
        assert!(err.is_bug());
    }

    #[test]
    fn isolated_node_dead_ends() {
        let mut nodes = nodes_from(&three_zones());
        nodes.get_mut(&NodeId(1)).unwrap().neighbors.clear();

        let err = route(&nodes, Point::new(0.75, 0.75), NodeId(1)).unwrap_err();
        assert!(matches!(err, CanError::RoutingDeadEnd { .. }));
    }

    #[test]
    fn unknown_start() {
        let nodes = nodes_from(&three_zones());
        assert_eq!(
            route(&nodes, Point::new(0.5, 0.5), NodeId(9)).unwrap_err(),
            CanError::NodeNotFound(NodeId(9))
        );
    }
}
