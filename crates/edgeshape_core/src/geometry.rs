//! Points and axis-aligned bounding boxes
//!
//! Bounds of quadratic Béziers are exact: each axis is checked for an
//! interior extremum where the derivative vanishes.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Point
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point in document units
///
/// Equality and hashing are exact. The edge format encodes coincident
/// points identically, so no tolerance is needed to join segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    // -0.0 == 0.0, so both must hash alike
    fn key_bits(v: f64) -> u64 {
        if v == 0.0 {
            0
        } else {
            v.to_bits()
        }
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::key_bits(self.x).hash(state);
        Self::key_bits(self.y).hash(state);
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BoundingBox
// ─────────────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// The empty (inverted) box, identity of [`BoundingBox::union`]
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Degenerate box containing a single point
    pub const fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// `None` for the empty box
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Expand to include a point
    pub fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Component-wise union. The empty box is the identity element.
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grow every side by half of `width` (stroke outline)
    pub fn inflate(self, width: f64) -> Self {
        if self.is_empty() {
            return self;
        }
        let half = width / 2.0;
        Self::new(
            self.min_x - half,
            self.min_y - half,
            self.max_x + half,
            self.max_y + half,
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl FromIterator<BoundingBox> for BoundingBox {
    fn from_iter<I: IntoIterator<Item = BoundingBox>>(iter: I) -> Self {
        iter.into_iter().fold(BoundingBox::EMPTY, BoundingBox::union)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line and quadratic Bézier bounds
// ─────────────────────────────────────────────────────────────────────────────

/// Bounding box of the line from `p1` to `p2`
pub fn line_bounds(p1: Point, p2: Point) -> BoundingBox {
    BoundingBox::new(
        p1.x.min(p2.x),
        p1.y.min(p2.y),
        p1.x.max(p2.x),
        p1.y.max(p2.y),
    )
}

/// Evaluate the quadratic Bézier `(p1, control, p3)` at `t`
pub fn quad_point(p1: Point, control: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    Point::new(
        mt * (mt * p1.x + t * control.x) + t * (mt * control.x + t * p3.x),
        mt * (mt * p1.y + t * control.y) + t * (mt * control.y + t * p3.y),
    )
}

/// Parameter where one coordinate of the curve is stationary
///
/// B'(t) = 0 when t = (p1 - p2) / (p1 - 2 p2 + p3). A zero denominator means
/// the coordinate is linear in t and has no interior extremum.
fn critical_t(p1: f64, p2: f64, p3: f64) -> Option<f64> {
    let denom = p1 - 2.0 * p2 + p3;
    if denom == 0.0 {
        return None;
    }
    let t = (p1 - p2) / denom;
    (t > 0.0 && t < 1.0).then_some(t)
}

/// Exact bounding box of the quadratic Bézier `(p1, control, p3)`
pub fn quad_bounds(p1: Point, control: Point, p3: Point) -> BoundingBox {
    // An endpoint stands in for a missing extremum without moving the box
    let tx = critical_t(p1.x, control.x, p3.x)
        .map(|t| quad_point(p1, control, p3, t))
        .unwrap_or(p1);
    let ty = critical_t(p1.y, control.y, p3.y)
        .map(|t| quad_point(p1, control, p3, t))
        .unwrap_or(p1);

    let mut bounds = line_bounds(p1, p3);
    bounds.include_point(tx);
    bounds.include_point(ty);
    bounds
}
