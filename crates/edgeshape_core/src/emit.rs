//! Path emission in SVG `d` syntax
//!
//! Only `M`, `L` and `Q` are produced. A command letter is written once for
//! a run of equal commands, as SVG allows:
//!
//! ```text
//! [A, B, C, ctl(D), E]  ->  "M Ax Ay L Bx By Cx Cy Q Dx Dy Ex Ey"
//! ```

use std::fmt::Write;

use crate::segment::{PathPoint, Segment};

/// Accumulates subpaths into one composite path string
///
/// Every subpath starts with its own `M`, so holes stay inside the same
/// path element and the fill rule can subtract them.
#[derive(Debug, Default)]
pub struct PathWriter {
    out: String,
    last: Option<char>,
}

impl PathWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn command(&mut self, letter: char) {
        if self.last != Some(letter) {
            if !self.out.is_empty() {
                self.out.push(' ');
            }
            self.out.push(letter);
            self.last = Some(letter);
        }
    }

    fn coords(&mut self, x: f64, y: f64) {
        // Writing into a String cannot fail
        let _ = write!(self.out, " {} {}", x, y);
    }

    /// Append one subpath given as a point list
    pub fn subpath(&mut self, points: &[PathPoint]) -> &mut Self {
        let mut iter = points.iter();
        let Some(first) = iter.next() else {
            return self;
        };

        // A new subpath always gets its own M, even after another M
        self.last = None;
        self.command('M');
        let start = first.point();
        self.coords(start.x, start.y);

        while let Some(entry) = iter.next() {
            match *entry {
                PathPoint::Point(p) => {
                    self.command('L');
                    self.coords(p.x, p.y);
                }
                PathPoint::Control(c) => {
                    self.command('Q');
                    self.coords(c.x, c.y);
                    if let Some(dest) = iter.next() {
                        let p = dest.point();
                        self.coords(p.x, p.y);
                    }
                }
            }
        }
        self
    }

    /// Append a chain of segments joined end to start as one subpath
    ///
    /// The source of every segment after the first is the previous sink and
    /// is not repeated.
    pub fn chain<'a>(&mut self, segments: impl IntoIterator<Item = &'a Segment>) -> &mut Self {
        let mut points = Vec::new();
        for segment in segments {
            let skip = usize::from(!points.is_empty());
            points.extend_from_slice(&segment.points()[skip..]);
        }
        self.subpath(&points)
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Emit a single point list as a path string
pub fn point_list_to_path(points: &[PathPoint]) -> String {
    let mut writer = PathWriter::new();
    writer.subpath(points);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::segment::SegmentBuilder;

    fn pt(x: f64, y: f64) -> PathPoint {
        PathPoint::Point(Point::new(x, y))
    }

    #[test]
    fn test_single_line() {
        assert_eq!(point_list_to_path(&[pt(1.0, 2.0), pt(3.0, 4.0)]), "M 1 2 L 3 4");
    }

    #[test]
    fn test_single_curve() {
        let points = [pt(1.0, 2.0), PathPoint::Control(Point::new(5.0, 6.0)), pt(3.0, 4.0)];
        assert_eq!(point_list_to_path(&points), "M 1 2 Q 5 6 3 4");
    }

    #[test]
    fn test_repeated_commands_are_elided() {
        let points = [
            pt(0.0, 0.0),
            pt(1.0, 0.0),
            pt(1.0, 1.0),
            PathPoint::Control(Point::new(0.5, 2.0)),
            pt(0.0, 1.0),
            PathPoint::Control(Point::new(-1.0, 0.5)),
            pt(0.0, 0.0),
            pt(0.5, -0.5),
        ];
        assert_eq!(
            point_list_to_path(&points),
            "M 0 0 L 1 0 1 1 Q 0.5 2 0 1 -1 0.5 0 0 L 0.5 -0.5"
        );
    }

    #[test]
    fn test_subpaths_each_start_with_move() {
        let mut writer = PathWriter::new();
        writer
            .subpath(&[pt(0.0, 0.0), pt(1.0, 0.0)])
            .subpath(&[pt(5.0, 5.0), pt(6.0, 5.0)]);
        assert_eq!(writer.finish(), "M 0 0 L 1 0 M 5 5 L 6 5");
    }

    #[test]
    fn test_chain_drops_junction_points() {
        let mut a = SegmentBuilder::new(Point::new(0.0, 0.0));
        a.line_to(Point::new(1.0, 0.0));
        let mut b = SegmentBuilder::new(Point::new(1.0, 0.0));
        b.line_to(Point::new(0.0, 0.0));
        let (a, b) = (a.finish(), b.finish());

        let mut writer = PathWriter::new();
        writer.chain([&a, &b]);
        assert_eq!(writer.finish(), "M 0 0 L 1 0 0 0");
    }

    #[test]
    fn test_empty_list_writes_nothing() {
        assert!(point_list_to_path(&[]).is_empty());
    }
}
