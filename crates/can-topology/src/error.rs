//! Error types for zone geometry.

use thiserror::Error;

use crate::{Point, Zone};

/// Result type for zone operations.
pub type Result<T> = std::result::Result<T, ZoneError>;

/// Errors raised by zone construction, splitting and merging.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    /// Bounds do not describe a rectangle with positive area.
    #[error("empty zone: x [{xmin}, {xmax}), y [{ymin}, {ymax})")]
    Empty {
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    },

    /// The split point lies outside the zone being split.
    #[error("point {point} is outside zone {zone}")]
    PointOutside { point: Point, zone: Zone },

    /// The zone is too narrow along its longer side to be split again.
    #[error("zone {0} is too small to split")]
    TooSmall(Zone),

    /// The union of the two zones is not a rectangle.
    #[error("zones {0} and {1} do not form a rectangle")]
    NotMergeable(Zone, Zone),
}
