//! Normalized shape documents
//!
//! A [`ShapeDocument`] is the JSON form of one shape after its edge strings
//! have been decoded: style tables plus one point list per segment. It can
//! be stored, inspected and assembled later without touching the edge
//! format again.
//!
//! ```json
//! {
//!   "mask": false,
//!   "fill_styles": { "1": { "fill": "#FF0000" } },
//!   "stroke_styles": { "2": { "stroke": "#000000", "stroke-width": "2" } },
//!   "shape": [
//!     { "path": [{ "point": [0.0, 0.0], "control": false }, ...],
//!       "fill_left": "1", "stroke": "2" }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::edge::{EdgeRecord, RawEdge};
use crate::error::EdgeError;
use crate::segment::{PathPoint, Segment};
use crate::shape::{visible_edge, ShapeAssembler, ShapeOutput};
use crate::style::{StyleId, StyleTable};

/// Attribute name carrying a stroke's weight
pub const STROKE_WIDTH: &str = "stroke-width";

/// Value of one style attribute
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Text(String),
    Number(f64),
    LinearGradient {
        #[serde(rename = "linearGradient")]
        linear_gradient: Map<String, Value>,
    },
    RadialGradient {
        #[serde(rename = "radialGradient")]
        radial_gradient: Map<String, Value>,
    },
}

impl StyleValue {
    /// Numeric reading of the value, for text or number values
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Text(text) => text.trim().parse().ok(),
            StyleValue::Number(n) => Some(*n),
            StyleValue::LinearGradient { .. } | StyleValue::RadialGradient { .. } => None,
        }
    }

    pub fn is_gradient(&self) -> bool {
        matches!(
            self,
            StyleValue::LinearGradient { .. } | StyleValue::RadialGradient { .. }
        )
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

/// Attributes of one style, in declaration order
pub type Style = IndexMap<String, StyleValue>;

/// Styles of a shape keyed by id
pub type StyleMap = IndexMap<StyleId, Style>;

/// One segment of a normalized shape with its style roles
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEdge {
    pub path: Vec<PathPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_left: Option<StyleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_right: Option<StyleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<StyleId>,
}

/// Style lookup over a pair of style maps
#[derive(Clone, Copy, Debug)]
struct DocumentStyles<'a> {
    mask: bool,
    fills: &'a StyleMap,
    strokes: &'a StyleMap,
}

impl StyleTable for DocumentStyles<'_> {
    fn has_fill(&self, id: &StyleId) -> bool {
        self.mask || self.fills.contains_key(id)
    }

    fn has_stroke(&self, id: &StyleId) -> bool {
        self.mask || self.strokes.contains_key(id)
    }

    fn stroke_width(&self, id: &StyleId) -> Option<f64> {
        self.strokes.get(id)?.get(STROKE_WIDTH)?.as_number()
    }
}

// ============================================================================
// Normalized document
// ============================================================================

/// A decoded shape: style tables plus per-segment point lists
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    /// Render as a mask: every style id counts as present
    #[serde(default)]
    pub mask: bool,
    #[serde(default)]
    pub fill_styles: StyleMap,
    #[serde(default)]
    pub stroke_styles: StyleMap,
    pub shape: Vec<NormalizedEdge>,
}

impl ShapeDocument {
    /// Decode `records` and keep only the style roles the tables know
    ///
    /// Mask documents carry no style tables; their ids are kept as given.
    pub fn normalize<'a>(
        mask: bool,
        fill_styles: StyleMap,
        stroke_styles: StyleMap,
        records: impl IntoIterator<Item = &'a EdgeRecord>,
    ) -> Result<Self, EdgeError> {
        let (fill_styles, stroke_styles) = if mask {
            (StyleMap::new(), StyleMap::new())
        } else {
            (fill_styles, stroke_styles)
        };

        let mut shape = Vec::new();
        {
            let styles = DocumentStyles {
                mask,
                fills: &fill_styles,
                strokes: &stroke_styles,
            };
            for (index, record) in records.into_iter().enumerate() {
                let edge = record.parse().map_err(|e| e.in_record(index))?;
                let edge = visible_edge(&styles, edge);
                if !edge.is_visible() {
                    continue;
                }
                shape.extend(edge.segments.iter().map(|segment| NormalizedEdge {
                    path: segment.points().to_vec(),
                    fill_left: edge.fill_left.clone(),
                    fill_right: edge.fill_right.clone(),
                    stroke: edge.stroke.clone(),
                }));
            }
        }

        Ok(Self {
            mask,
            fill_styles,
            stroke_styles,
            shape,
        })
    }

    fn styles(&self) -> DocumentStyles<'_> {
        DocumentStyles {
            mask: self.mask,
            fills: &self.fill_styles,
            strokes: &self.stroke_styles,
        }
    }

    /// Rebuild segments from the stored point lists and assemble the shape
    ///
    /// A point list that does not describe a segment fails with the index of
    /// its entry in `shape`.
    pub fn assemble(&self) -> Result<ShapeOutput, EdgeError> {
        let mut assembler = ShapeAssembler::new(self.styles());
        for (index, edge) in self.shape.iter().enumerate() {
            let segment = Segment::from_points(&edge.path).map_err(|e| e.in_record(index))?;
            assembler.add_edge(RawEdge {
                segments: vec![segment],
                fill_left: edge.fill_left.clone(),
                fill_right: edge.fill_right.clone(),
                stroke: edge.stroke.clone(),
            });
        }
        Ok(assembler.finish())
    }
}

impl StyleTable for ShapeDocument {
    fn has_fill(&self, id: &StyleId) -> bool {
        self.styles().has_fill(id)
    }

    fn has_stroke(&self, id: &StyleId) -> bool {
        self.styles().has_stroke(id)
    }

    fn stroke_width(&self, id: &StyleId) -> Option<f64> {
        self.styles().stroke_width(id)
    }
}

// ============================================================================
// Raw source
// ============================================================================

/// A shape as exported: style tables plus undecoded edge records
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeSource {
    #[serde(default)]
    pub mask: bool,
    #[serde(default)]
    pub fill_styles: StyleMap,
    #[serde(default)]
    pub stroke_styles: StyleMap,
    pub edges: Vec<EdgeRecord>,
}

impl ShapeSource {
    /// Decode into a [`ShapeDocument`]
    pub fn normalize(&self) -> Result<ShapeDocument, EdgeError> {
        ShapeDocument::normalize(
            self.mask,
            self.fill_styles.clone(),
            self.stroke_styles.clone(),
            &self.edges,
        )
    }

    /// Decode and assemble in one pass
    pub fn convert(&self) -> Result<ShapeOutput, EdgeError> {
        let styles = DocumentStyles {
            mask: self.mask,
            fills: &self.fill_styles,
            strokes: &self.stroke_styles,
        };
        crate::shape::convert(&self.edges, styles)
    }
}

/// Either form of shape input
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeInput {
    Document(ShapeDocument),
    Source(ShapeSource),
}

impl ShapeInput {
    pub fn is_mask(&self) -> bool {
        match self {
            ShapeInput::Document(doc) => doc.mask,
            ShapeInput::Source(source) => source.mask,
        }
    }

    /// Turn on mask mode
    pub fn set_mask(&mut self, mask: bool) {
        match self {
            ShapeInput::Document(doc) => doc.mask = mask,
            ShapeInput::Source(source) => source.mask = mask,
        }
    }

    /// Assemble the shape, whichever form it is in
    pub fn convert(&self) -> Result<ShapeOutput, EdgeError> {
        match self {
            ShapeInput::Document(doc) => doc.assemble(),
            ShapeInput::Source(source) => source.convert(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn source() -> ShapeSource {
        serde_json::from_str(
            r##"{
                "fill_styles": { "1": { "fill": "#FF0000" } },
                "stroke_styles": { "2": { "stroke": "#000000", "stroke-width": "4" } },
                "edges": [
                    { "edges": "!0 0|200 0|200 200|0 200|0 0", "fillStyle0": 1, "strokeStyle": 2 },
                    { "edges": "!0 0|20 20", "fillStyle1": 9 }
                ]
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_style_values() {
        let style: Style = serde_json::from_str(
            r##"{
                "fill": "#FF0000",
                "stroke-width": 2.5,
                "gradient": { "linearGradient": { "x1": 0, "stop": [] } },
                "radial": { "radialGradient": { "r": 10 } }
            }"##,
        )
        .unwrap();

        assert_eq!(style["fill"], StyleValue::from("#FF0000"));
        assert_eq!(style["stroke-width"].as_number(), Some(2.5));
        assert!(matches!(style["gradient"], StyleValue::LinearGradient { .. }));
        assert!(matches!(style["radial"], StyleValue::RadialGradient { .. }));
        assert!(style["radial"].is_gradient());
        assert_eq!(StyleValue::from(" 3 ").as_number(), Some(3.0));
    }

    #[test]
    fn test_normalize_drops_unknown_roles() {
        let doc = source().normalize().unwrap();

        // The second record only names an unknown fill
        assert_eq!(doc.shape.len(), 1);
        let edge = &doc.shape[0];
        assert_eq!(edge.fill_left, Some("1".into()));
        assert_eq!(edge.stroke, Some("2".into()));
        assert_eq!(edge.path.len(), 5);
        assert_eq!(edge.path[1], PathPoint::Point(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_normalized_json_shape() {
        let doc = source().normalize().unwrap();
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["mask"], false);
        assert_eq!(json["stroke_styles"]["2"]["stroke-width"], "4");
        let first = &json["shape"][0];
        assert_eq!(first["fill_left"], "1");
        assert!(first.get("fill_right").is_none());
        assert_eq!(first["path"][0]["point"], serde_json::json!([0.0, 0.0]));
        assert_eq!(first["path"][0]["control"], false);
    }

    #[test]
    fn test_document_and_source_agree() {
        let source = source();
        let doc = source.normalize().unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        let reread: ShapeDocument = serde_json::from_str(&text).unwrap();

        let direct = source.convert().unwrap();
        assert_eq!(reread.assemble().unwrap(), direct);

        let stroke = direct.stroke(&"2".into()).unwrap();
        assert_eq!(stroke.bounds.min_x, -2.0);
        assert_eq!(stroke.bounds.max_x, 12.0);
    }

    #[test]
    fn test_mask_keeps_every_id() {
        let mut source = source();
        source.mask = true;
        let doc = source.normalize().unwrap();

        assert!(doc.fill_styles.is_empty());
        assert_eq!(doc.shape.len(), 2);
        assert!(doc.has_fill(&"9".into()));

        let out = doc.assemble().unwrap();
        assert_eq!(out.fills.len(), 1);
        // The open fill-9 segment cannot close
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_bad_point_list_names_entry() {
        let doc: ShapeDocument = serde_json::from_str(
            r#"{ "shape": [
                { "path": [{ "point": [0, 0] }, { "point": [1, 1] }], "stroke": "1" },
                { "path": [{ "point": [1, 1], "control": true }, { "point": [2, 2] }], "stroke": "1" }
            ] }"#,
        )
        .unwrap();

        match doc.assemble() {
            Err(EdgeError::Record { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected a record error, got {:?}", other),
        }
    }

    #[test]
    fn test_input_accepts_both_forms() {
        let raw = r#"{ "edges": [{ "edges": "!0 0|20 0", "strokeStyle": 1 }] }"#;
        let normalized = r#"{ "mask": true, "shape": [] }"#;

        let input: ShapeInput = serde_json::from_str(raw).unwrap();
        assert!(matches!(input, ShapeInput::Source(_)));
        assert!(!input.is_mask());

        let input: ShapeInput = serde_json::from_str(normalized).unwrap();
        assert!(matches!(input, ShapeInput::Document(_)));
        assert!(input.is_mask());
    }
}
