//! Zone adjacency and merging.
//!
//! Two zones are neighbors iff they share a border segment of positive
//! length: exactly adjacent on one axis (one's high bound equals the other's
//! low bound) and overlapping with positive length on the other axis.
//!
//! Two zones can merge iff they are adjacent on one axis and have identical
//! bounds on the other, so their union is again a rectangle.

use crate::{Axis, Result, Zone, ZoneError};

/// Whether two zones touch along `axis` (share a boundary value on it).
fn touch_along(a: &Zone, b: &Zone, axis: Axis) -> bool {
    let (a_lo, a_hi) = a.bounds(axis);
    let (b_lo, b_hi) = b.bounds(axis);
    a_hi == b_lo || b_hi == a_lo
}

/// Length of the overlap of two zones' ranges along `axis`; may be negative.
fn overlap_along(a: &Zone, b: &Zone, axis: Axis) -> f64 {
    let (a_lo, a_hi) = a.bounds(axis);
    let (b_lo, b_hi) = b.bounds(axis);
    a_hi.min(b_hi) - a_lo.max(b_lo)
}

/// Length of the border segment two zones share, or 0.0 if they are not
/// neighbors.
pub fn shared_border(a: &Zone, b: &Zone) -> f64 {
    Axis::ALL
        .iter()
        .filter(|&&axis| touch_along(a, b, axis))
        .map(|&axis| overlap_along(a, b, axis.other()))
        .fold(0.0, f64::max)
}

/// Check if two zones are neighbors.
pub fn are_adjacent(a: &Zone, b: &Zone) -> bool {
    shared_border(a, b) > 0.0
}

/// Check if the union of two zones is a rectangle.
pub fn can_merge(a: &Zone, b: &Zone) -> bool {
    Axis::ALL.iter().any(|&axis| {
        let other = axis.other();
        touch_along(a, b, axis) && a.bounds(other) == b.bounds(other)
    })
}

impl Zone {
    /// See [`are_adjacent`].
    pub fn is_adjacent(&self, other: &Self) -> bool {
        are_adjacent(self, other)
    }

    /// See [`can_merge`].
    pub fn can_merge(&self, other: &Self) -> bool {
        can_merge(self, other)
    }

    /// The union rectangle of two mergeable zones.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        if !can_merge(self, other) {
            return Err(ZoneError::NotMergeable(*self, *other));
        }
        Ok(Self {
            xmin: self.xmin.min(other.xmin),
            xmax: self.xmax.max(other.xmax),
            ymin: self.ymin.min(other.ymin),
            ymax: self.ymax.max(other.ymax),
        })
    }
}
