//! Rectangular zones.
//!
//! A zone is the half-open rectangle `[xmin, xmax) × [ymin, ymax)`. Zones are
//! immutable values: when a node's region changes it receives a new zone.

use crate::{Axis, Point, Result, ZoneError, MIN_EXTENT};

/// An axis-aligned, half-open rectangle owned by exactly one node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub(crate) xmin: f64,
    pub(crate) xmax: f64,
    pub(crate) ymin: f64,
    pub(crate) ymax: f64,
}

impl Zone {
    /// The whole coordinate space.
    pub const UNIT: Self = Self {
        xmin: 0.0,
        xmax: 1.0,
        ymin: 0.0,
        ymax: 1.0,
    };

    /// Create a zone, rejecting bounds without positive area.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self> {
        // Written so NaN bounds are rejected too.
        if !(xmin < xmax && ymin < ymax) {
            return Err(ZoneError::Empty {
                xmin,
                xmax,
                ymin,
                ymax,
            });
        }
        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    pub const fn xmin(&self) -> f64 {
        self.xmin
    }

    pub const fn xmax(&self) -> f64 {
        self.xmax
    }

    pub const fn ymin(&self) -> f64 {
        self.ymin
    }

    pub const fn ymax(&self) -> f64 {
        self.ymax
    }

    /// Low and high bound along an axis.
    pub const fn bounds(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.xmin, self.xmax),
            Axis::Y => (self.ymin, self.ymax),
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Half-open containment: `xmin <= x < xmax` and `ymin <= y < ymax`.
    pub fn contains(&self, point: Point) -> bool {
        self.xmin <= point.x && point.x < self.xmax && self.ymin <= point.y && point.y < self.ymax
    }

    /// Midpoint of the zone.
    pub fn center(&self) -> Point {
        Point::new(
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
        )
    }

    /// Euclidean distance from a point to the closed rectangle.
    ///
    /// Zero for points inside the zone or on its boundary.
    pub fn distance_to(&self, point: Point) -> f64 {
        let dx = (self.xmin - point.x).max(point.x - self.xmax).max(0.0);
        let dy = (self.ymin - point.y).max(point.y - self.ymax).max(0.0);
        dx.hypot(dy)
    }

    /// Area shared by two zones. Zones that only touch share zero area.
    pub fn overlap_area(&self, other: &Self) -> f64 {
        let dx = self.xmax.min(other.xmax) - self.xmin.max(other.xmin);
        let dy = self.ymax.min(other.ymax) - self.ymin.max(other.ymin);
        dx.max(0.0) * dy.max(0.0)
    }

    /// Whether this zone lies inside another (bounds inclusive).
    pub fn is_within(&self, other: &Self) -> bool {
        other.xmin <= self.xmin
            && self.xmax <= other.xmax
            && other.ymin <= self.ymin
            && self.ymax <= other.ymax
    }

    /// The axis with the larger extent. Equal extents prefer `X`.
    pub fn longer_axis(&self) -> Axis {
        if self.width() >= self.height() {
            Axis::X
        } else {
            Axis::Y
        }
    }

    /// Split along the longer side at a join point.
    ///
    /// Returns `(keep, new)`: `new` is the half containing `point`, `keep`
    /// is the other half. The cut is clamped at least [`MIN_EXTENT`] away
    /// from either edge. The two halves exactly tile `self`.
    pub fn split_along_longer_side(&self, point: Point) -> Result<(Self, Self)> {
        if !self.contains(point) {
            return Err(ZoneError::PointOutside { point, zone: *self });
        }

        let axis = self.longer_axis();
        let (lo, hi) = self.bounds(axis);
        let (min_cut, max_cut) = (lo + MIN_EXTENT, hi - MIN_EXTENT);
        if min_cut >= max_cut {
            return Err(ZoneError::TooSmall(*self));
        }
        let cut = point.along(axis).clamp(min_cut, max_cut);

        let (low, high) = self.cut_at(axis, cut);
        if high.contains(point) {
            Ok((low, high))
        } else {
            Ok((high, low))
        }
    }

    /// Cut into low and high halves. Caller guarantees `lo < cut < hi`.
    fn cut_at(&self, axis: Axis, cut: f64) -> (Self, Self) {
        match axis {
            Axis::X => (
                Self { xmax: cut, ..*self },
                Self { xmin: cut, ..*self },
            ),
            Axis::Y => (
                Self { ymax: cut, ..*self },
                Self { ymin: cut, ..*self },
            ),
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}) x [{:.3}, {:.3})",
            self.xmin, self.xmax, self.ymin, self.ymax
        )
    }
}
