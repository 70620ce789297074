//! CAN Zone Topology
//!
//! Geometry of a 2-dimensional Content-Addressable Network: the coordinate
//! space is the half-open unit square `[0,1) × [0,1)`, and every node owns
//! one axis-aligned rectangular zone of it.
//!
//! # Partition Geometry
//!
//! Zones are half-open: a zone contains its low edges but not its high
//! edges, so a point on a shared border belongs to exactly one zone.
//!
//! Two zones are neighbors when they share a border segment of positive
//! length. Touching only at a corner does not count.
//!
//! # Structural Operations
//!
//! - **Split**: a zone is cut along its longer side at a join point. The half
//!   containing the join point goes to the joining node.
//! - **Merge**: two zones reunite only if their union is itself a rectangle.
//!
//! All bounds are either 0.0, 1.0, or copies of earlier cut coordinates, so
//! shared edges compare with exact equality.

mod adjacency;
mod error;
mod point;
mod zone;

pub use adjacency::{are_adjacent, can_merge, shared_border};
pub use error::{Result, ZoneError};
pub use point::{Axis, Point};
pub use zone::Zone;

/// Dimensionality of the coordinate space.
pub const DIMENSIONS: usize = 2;

/// Smallest extent either half of a split may have.
///
/// A cut coordinate closer than this to a zone edge is clamped inward so no
/// split ever produces a degenerate zone.
pub const MIN_EXTENT: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_zone_covers_the_space() {
        assert_eq!(Zone::UNIT.area(), 1.0);
        assert!(Zone::UNIT.contains(Point::new(0.0, 0.0)));
        assert!(!Zone::UNIT.contains(Point::new(1.0, 0.5)));
        assert_eq!(DIMENSIONS, Axis::ALL.len());
    }
}
