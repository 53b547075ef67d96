//! Shape assembly: from edge records to one path per style
//!
//! Filled shapes:
//!
//! - A segment with a left fill joins that fill's group as it is.
//! - A segment with a right fill joins that fill's group reversed, so every
//!   filled region lies to the left of its segments.
//! - Each fill group is partitioned into closed cycles (see
//!   [`crate::graph`]), and all cycles of one fill become the subpaths of a
//!   single path. Holes therefore render through the fill rule.
//!
//! Stroked paths need no joining: every segment becomes its own subpath
//! under its stroke style.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::edge::{EdgeRecord, RawEdge};
use crate::emit::PathWriter;
use crate::error::EdgeError;
use crate::geometry::BoundingBox;
use crate::graph::SegmentGraph;
use crate::segment::Segment;
use crate::style::{StyleId, StyleTable, DEFAULT_STROKE_WIDTH};

/// One composite path for one style
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyledPath {
    pub style: StyleId,
    /// SVG path data
    pub path: String,
    /// Geometry bounds; for strokes, grown by the stroke width
    pub bounds: BoundingBox,
}

/// Segments of a fill style that could not be closed into cycles
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageWarning {
    pub style: StyleId,
    pub uncovered: usize,
}

impl fmt::Display for CoverageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fill style {}: {} segment(s) not part of any closed shape",
            self.style, self.uncovered
        )
    }
}

/// Everything produced for one shape
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeOutput {
    pub fills: Vec<StyledPath>,
    pub strokes: Vec<StyledPath>,
    /// Union of every fill and stroke box; `None` when nothing was drawn
    pub bounds: Option<BoundingBox>,
    pub warnings: Vec<CoverageWarning>,
}

impl ShapeOutput {
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty() && self.strokes.is_empty()
    }

    pub fn fill(&self, style: &StyleId) -> Option<&StyledPath> {
        self.fills.iter().find(|p| &p.style == style)
    }

    pub fn stroke(&self, style: &StyleId) -> Option<&StyledPath> {
        self.strokes.iter().find(|p| &p.style == style)
    }
}

/// Which style slot of an edge an id came from
#[derive(Clone, Copy, Debug)]
enum Role {
    FillLeft,
    FillRight,
    Stroke,
}

/// Keep `id` only if the style table knows it for `role`
fn resolve<S: StyleTable + ?Sized>(styles: &S, id: Option<StyleId>, role: Role) -> Option<StyleId> {
    let id = id?;
    let known = match role {
        Role::FillLeft | Role::FillRight => styles.has_fill(&id),
        Role::Stroke => styles.has_stroke(&id),
    };
    if !known {
        debug!(style = %id, ?role, "unknown style reference, ignoring");
        return None;
    }
    Some(id)
}

/// Drop the style references of `edge` that `styles` does not know
pub fn visible_edge<S: StyleTable + ?Sized>(styles: &S, edge: RawEdge) -> RawEdge {
    RawEdge {
        fill_left: resolve(styles, edge.fill_left, Role::FillLeft),
        fill_right: resolve(styles, edge.fill_right, Role::FillRight),
        stroke: resolve(styles, edge.stroke, Role::Stroke),
        segments: edge.segments,
    }
}

/// Collects segments per style and assembles them into paths
///
/// A style group holds each segment once, in first-seen order.
pub struct ShapeAssembler<S> {
    styles: S,
    fills: IndexMap<StyleId, IndexSet<Segment>>,
    strokes: IndexMap<StyleId, IndexSet<Segment>>,
}

impl<S: StyleTable> ShapeAssembler<S> {
    pub fn new(styles: S) -> Self {
        Self {
            styles,
            fills: IndexMap::new(),
            strokes: IndexMap::new(),
        }
    }

    /// Add the segments of one decoded edge record
    pub fn add_edge(&mut self, edge: RawEdge) {
        let edge = visible_edge(&self.styles, edge);
        if !edge.is_visible() {
            return;
        }

        let (fill_left, fill_right) = match (edge.fill_left, edge.fill_right) {
            // Same fill on both sides: the segment separates nothing
            (Some(left), Some(right)) if left == right => {
                debug!(style = %left, "edge has the same fill on both sides, skipping");
                (None, None)
            }
            sides => sides,
        };

        if let Some(id) = fill_left {
            self.fills
                .entry(id)
                .or_default()
                .extend(edge.segments.iter().cloned());
        }
        if let Some(id) = fill_right {
            self.fills
                .entry(id)
                .or_default()
                .extend(edge.segments.iter().map(Segment::reversed));
        }
        if let Some(id) = edge.stroke {
            self.strokes.entry(id).or_default().extend(edge.segments);
        }
    }

    /// Decode and add one edge record
    pub fn add_record(&mut self, record: &EdgeRecord) -> Result<(), EdgeError> {
        let edge = record.parse()?;
        self.add_edge(edge);
        Ok(())
    }

    /// Join every fill into cycles and emit all paths
    pub fn finish(self) -> ShapeOutput {
        let mut output = ShapeOutput::default();
        let mut total = BoundingBox::EMPTY;

        for (style, segments) in self.fills {
            let graph = SegmentGraph::new(segments.into_iter().collect());
            let cover = graph.covering_cycles();

            debug!(
                style = %style,
                segments = graph.len(),
                cycles = cover.cycles.len(),
                "assembled fill"
            );

            if !cover.is_complete() {
                let warning = CoverageWarning {
                    style: style.clone(),
                    uncovered: cover.uncovered.len(),
                };
                warn!("{}", warning);
                output.warnings.push(warning);
            }

            let mut writer = PathWriter::new();
            let mut bounds = BoundingBox::EMPTY;
            for cycle in &cover.cycles {
                writer.chain(cycle.iter().map(|&i| graph.segment(i)));
                bounds = cycle
                    .iter()
                    .map(|&i| graph.segment(i).bounds())
                    .fold(bounds, BoundingBox::union);
            }

            if writer.is_empty() {
                continue;
            }
            total = total.union(bounds);
            output.fills.push(StyledPath {
                style,
                path: writer.finish(),
                bounds,
            });
        }

        for (style, segments) in self.strokes {
            let mut writer = PathWriter::new();
            for segment in &segments {
                writer.subpath(segment.points());
            }
            if writer.is_empty() {
                continue;
            }

            let width = self
                .styles
                .stroke_width(&style)
                .unwrap_or(DEFAULT_STROKE_WIDTH);
            let bounds = segments
                .iter()
                .map(Segment::bounds)
                .collect::<BoundingBox>()
                .inflate(width);

            debug!(style = %style, segments = segments.len(), width, "assembled stroke");

            total = total.union(bounds);
            output.strokes.push(StyledPath {
                style,
                path: writer.finish(),
                bounds,
            });
        }

        output.bounds = total.non_empty();
        output
    }
}

/// Convert the edge records of one shape
///
/// Stops at the first record whose edge string cannot be decoded; the error
/// names the record's position.
pub fn convert<'a, S: StyleTable>(
    records: impl IntoIterator<Item = &'a EdgeRecord>,
    styles: S,
) -> Result<ShapeOutput, EdgeError> {
    let mut assembler = ShapeAssembler::new(styles);
    for (index, record) in records.into_iter().enumerate() {
        assembler
            .add_record(record)
            .map_err(|e| e.in_record(index))?;
    }
    Ok(assembler.finish())
}
