//! Units and geometry: DBU↔meter conversion, Manhattan distance, rectangle
//! containment.
//!
//! All public wire-length / separation inputs to the CORE are meters; all
//! internal placement geometry exchanged with NETLIST/STEINER is integer
//! database units (DBU).

use serde::{Deserialize, Serialize};

/// Converts a DBU distance to meters given the technology's DBU-per-micron scale.
pub fn dbu_to_meters(dbu: i64, dbu_per_micron: i32) -> f64 {
    dbu as f64 / (dbu_per_micron as f64 * 1e6)
}

/// Converts a meter distance to DBU given the technology's DBU-per-micron scale.
///
/// Truncates towards zero, matching the source behavior of integer DBU storage.
pub fn meters_to_dbu(meters: f64, dbu_per_micron: i32) -> i64 {
    (meters * dbu_per_micron as f64 * 1e6) as i64
}

/// An integer point in DBU space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate in DBU.
    pub x: i64,
    /// Y coordinate in DBU.
    pub y: i64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance between two points.
    pub fn manhattan(a: Point, b: Point) -> i64 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }

    /// The point at the midpoint along the segment `self -> other`, rounding
    /// each axis towards `other`'s side on ties.
    pub fn lerp(self, other: Point, fraction: f64) -> Point {
        let fraction = fraction.clamp(0.0, 1.0);
        Point {
            x: self.x + ((other.x - self.x) as f64 * fraction).round() as i64,
            y: self.y + ((other.y - self.y) as f64 * fraction).round() as i64,
        }
    }
}

/// An axis-aligned rectangle in DBU space, used for the placement core area.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum X coordinate.
    pub x_min: i64,
    /// Minimum Y coordinate.
    pub y_min: i64,
    /// Maximum X coordinate.
    pub x_max: i64,
    /// Maximum Y coordinate.
    pub y_max: i64,
}

impl Rect {
    /// Creates a new rectangle. Does not validate that min <= max.
    pub fn new(x_min: i64, y_min: i64, x_max: i64, y_max: i64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Returns `true` if the rectangle has zero area on at least one axis.
    pub fn is_degenerate(&self) -> bool {
        self.x_min >= self.x_max || self.y_min >= self.y_max
    }

    /// Returns `true` if `p` lies within the rectangle, inclusive of edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Clamps each coordinate of `p` into the rectangle.
    pub fn closest_point(&self, p: Point) -> Point {
        Point {
            x: p.x.clamp(self.x_min, self.x_max),
            y: p.y.clamp(self.y_min, self.y_max),
        }
    }
}
