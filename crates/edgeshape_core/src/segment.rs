//! Segments: connected runs of lines and quadratic curves
//!
//! A segment is stored as a point list. The first entry is where the run
//! starts; each following plain point is the destination of a line, and a
//! control point is always followed by the destination of its curve:
//!
//! ```text
//!                C
//!              /   \
//!             |     |
//!    A ----- B       D ----- E       [A, B, ctl(C), D, E]
//! ```
//!
//! Reversing the list traverses the same geometry backwards, with every
//! control point still between its two endpoints: `[E, D, ctl(C), B, A]`.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::EdgeError;
use crate::geometry::{line_bounds, quad_bounds, BoundingBox, Point};

/// One entry of a segment's point list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StoredPoint", into = "StoredPoint")]
pub enum PathPoint {
    /// A start point or the destination of a line or curve
    Point(Point),
    /// Control point of the quadratic curve ending at the next entry
    Control(Point),
}

impl PathPoint {
    pub fn point(&self) -> Point {
        match *self {
            PathPoint::Point(p) | PathPoint::Control(p) => p,
        }
    }

    pub fn is_control(&self) -> bool {
        matches!(self, PathPoint::Control(_))
    }
}

/// JSON spelling of a [`PathPoint`]: `{"point": [x, y], "control": bool}`
#[derive(Clone, Copy, Serialize, Deserialize)]
struct StoredPoint {
    point: Point,
    #[serde(default)]
    control: bool,
}

impl From<StoredPoint> for PathPoint {
    fn from(stored: StoredPoint) -> Self {
        if stored.control {
            PathPoint::Control(stored.point)
        } else {
            PathPoint::Point(stored.point)
        }
    }
}

impl From<PathPoint> for StoredPoint {
    fn from(p: PathPoint) -> Self {
        StoredPoint {
            point: p.point(),
            control: p.is_control(),
        }
    }
}

/// One drawing command of a segment, with its start point resolved
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Piece {
    Line { from: Point, to: Point },
    Quad { from: Point, control: Point, to: Point },
}

impl Piece {
    pub fn bounds(&self) -> BoundingBox {
        match *self {
            Piece::Line { from, to } => line_bounds(from, to),
            Piece::Quad { from, control, to } => quad_bounds(from, control, to),
        }
    }
}

pub(crate) type Entries = SmallVec<[PathPoint; 8]>;

/// An immutable run of connected lines and curves
///
/// Two segments are equal when their point lists are; the bounds follow
/// from the points.
#[derive(Clone, Debug)]
pub struct Segment {
    entries: Entries,
    bounds: BoundingBox,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

impl Segment {
    /// Build a segment from a stored point list, checking its structure
    pub fn from_points(points: &[PathPoint]) -> Result<Self, EdgeError> {
        let invalid = |reason: &str| EdgeError::InvalidPointList(reason.to_string());

        match (points.first(), points.last()) {
            (None, _) => return Err(invalid("empty point list")),
            (Some(PathPoint::Control(_)), _) => {
                return Err(invalid("point list starts with a control point"))
            }
            (_, Some(PathPoint::Control(_))) => {
                return Err(invalid("point list ends with a control point"))
            }
            _ => {}
        }

        let mut builder = SegmentBuilder::new(points[0].point());
        let mut rest = points[1..].iter();
        while let Some(entry) = rest.next() {
            match *entry {
                PathPoint::Point(to) => builder.line_to(to),
                PathPoint::Control(control) => match rest.next() {
                    Some(PathPoint::Point(to)) => builder.quad_to(control, *to),
                    _ => return Err(invalid("control point not followed by its destination")),
                },
            }
        }
        Ok(builder.finish())
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.entries
    }

    /// Where the segment starts
    pub fn source(&self) -> Point {
        self.entries[0].point()
    }

    /// Where the segment ends
    pub fn sink(&self) -> Point {
        self.entries[self.entries.len() - 1].point()
    }

    /// Exact bounding box of the segment's geometry
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Whether the segment draws anything beyond its start point
    pub fn has_pieces(&self) -> bool {
        self.entries.len() > 1
    }

    /// The same geometry traversed backwards
    pub fn reversed(&self) -> Segment {
        let mut entries = self.entries.clone();
        entries.reverse();
        Segment {
            entries,
            bounds: self.bounds,
        }
    }

    /// Iterate the drawing commands of this segment
    pub fn pieces(&self) -> Pieces<'_> {
        Pieces {
            current: self.source(),
            rest: self.entries[1..].iter(),
        }
    }
}

/// Iterator over the [`Piece`]s of a segment
pub struct Pieces<'a> {
    current: Point,
    rest: std::slice::Iter<'a, PathPoint>,
}

impl Iterator for Pieces<'_> {
    type Item = Piece;

    fn next(&mut self) -> Option<Piece> {
        let from = self.current;
        let piece = match *self.rest.next()? {
            PathPoint::Point(to) => Piece::Line { from, to },
            PathPoint::Control(control) => {
                // Segment construction guarantees a destination follows
                let to = self.rest.next()?.point();
                Piece::Quad { from, control, to }
            }
        };
        self.current = match piece {
            Piece::Line { to, .. } | Piece::Quad { to, .. } => to,
        };
        Some(piece)
    }
}

/// Incremental segment construction with running bounds
pub(crate) struct SegmentBuilder {
    entries: Entries,
    bounds: BoundingBox,
    current: Point,
}

impl SegmentBuilder {
    pub fn new(start: Point) -> Self {
        let mut entries = Entries::new();
        entries.push(PathPoint::Point(start));
        Self {
            entries,
            bounds: BoundingBox::from_point(start),
            current: start,
        }
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }

    pub fn line_to(&mut self, to: Point) {
        self.bounds = self.bounds.union(line_bounds(self.current, to));
        self.entries.push(PathPoint::Point(to));
        self.current = to;
    }

    pub fn quad_to(&mut self, control: Point, to: Point) {
        self.bounds = self.bounds.union(quad_bounds(self.current, control, to));
        self.entries.push(PathPoint::Control(control));
        self.entries.push(PathPoint::Point(to));
        self.current = to;
    }

    pub fn finish(self) -> Segment {
        Segment {
            entries: self.entries,
            bounds: self.bounds,
        }
    }
}
