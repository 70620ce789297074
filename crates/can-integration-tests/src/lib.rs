//! Shared helpers for cross-crate partition tests.

use std::collections::{BTreeSet, VecDeque};

use can_dht::{NodeId, Partition, Point};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Number of zones containing each cell center of an `n × n` grid, row-major
/// from the bottom-left corner. A healthy partition yields all ones.
pub fn sample_grid(partition: &Partition, n: usize) -> Vec<usize> {
    let snapshot = partition.snapshot();
    let mut counts = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let point = Point::new(
                (col as f64 + 0.5) / n as f64,
                (row as f64 + 0.5) / n as f64,
            );
            counts.push(snapshot.iter().filter(|a| a.zone.contains(point)).count());
        }
    }
    counts
}

/// Whether every node is reachable from every other through neighbor links.
pub fn is_connected(partition: &Partition) -> bool {
    let ids = partition.node_ids();
    let Some(&start) = ids.first() else {
        return true;
    };

    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        let Ok(neighbors) = partition.neighbors(id) else {
            return false;
        };
        for &next in neighbors {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len() == ids.len()
}

/// A partition grown by `joins` random joins from a fixed seed.
pub fn seeded_partition(seed: u64, joins: usize) -> Partition {
    let mut partition = Partition::default();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..joins {
        // A join only fails for a point that cannot split its zone; skip it.
        let _ = partition.add_random_node(&mut rng);
    }
    partition
}

/// Try to delete each node in id order until one leaves. Returns the id
/// that left, or `None` if every node refused.
pub fn delete_any(partition: &mut Partition) -> Option<NodeId> {
    partition
        .node_ids()
        .into_iter()
        .find(|&id| partition.delete_node(id).is_ok())
}
