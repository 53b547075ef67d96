//! Shape reconstruction for vector animation edge data
//!
//! Authoring tools store a shape as a bag of edges. Each edge is a compact
//! command string with up to three style references: the fill on its left,
//! the fill on its right, and its stroke. This crate decodes those strings,
//! joins the pieces of every fill into closed outlines, and emits SVG path
//! data with bounding boxes.
//!
//! # Example
//!
//! ```
//! use edgeshape_core::{convert, EdgeRecord, StyleSheet};
//!
//! let records = [
//!     EdgeRecord::new("!0 0|200 0|200 200").with_fill_left("1"),
//!     EdgeRecord::new("!0 0|200 200").with_fill_right("1"),
//! ];
//! let styles = StyleSheet::new().with_fill("1");
//!
//! let output = convert(&records, &styles).unwrap();
//! assert_eq!(output.fills[0].path, "M 0 0 L 10 0 10 10 0 0");
//! ```

pub mod document;
pub mod edge;
pub mod emit;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod number;
pub mod segment;
pub mod shape;
pub mod style;

pub use document::{NormalizedEdge, ShapeDocument, ShapeInput, ShapeSource, StyleValue};
pub use edge::{parse_segments, EdgeRecord, RawEdge};
pub use emit::{point_list_to_path, PathWriter};
pub use error::EdgeError;
pub use geometry::{BoundingBox, Point};
pub use graph::{CycleCover, SegmentGraph};
pub use segment::{PathPoint, Segment};
pub use shape::{convert, CoverageWarning, ShapeAssembler, ShapeOutput, StyledPath};
pub use style::{MaskStyles, StyleId, StyleSheet, StyleTable, DEFAULT_STROKE_WIDTH};
