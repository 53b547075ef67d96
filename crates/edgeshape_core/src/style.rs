//! Style identifiers and the style lookup used during assembly
//!
//! Parsing style attributes is the host's job. The assembler only needs to
//! know which ids exist, and how wide a stroke is so its box can be grown.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Deserializer, Serialize};

/// Stroke weight assumed when a stroke style does not state one
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Opaque fill or stroke style identifier
///
/// Shapes number their styles (`"1"`, `"2"`, ...); integers given by a host
/// are stored as their decimal text so both spellings name the same style.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StyleId(String);

impl StyleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StyleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StyleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u32> for StyleId {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for StyleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Index(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => StyleId(s),
            Raw::Index(n) => StyleId(n.to_string()),
        })
    }
}

/// Lookup of the styles a shape defines
pub trait StyleTable {
    /// Whether `id` names a known fill style
    fn has_fill(&self, id: &StyleId) -> bool;

    /// Whether `id` names a known stroke style
    fn has_stroke(&self, id: &StyleId) -> bool;

    /// Stroke weight of a stroke style, if it states one
    fn stroke_width(&self, id: &StyleId) -> Option<f64>;
}

/// Explicit table of fill ids and stroke ids with optional weights
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    fills: FxHashSet<StyleId>,
    strokes: FxHashMap<StyleId, Option<f64>>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fill(&mut self, id: impl Into<StyleId>) -> &mut Self {
        self.fills.insert(id.into());
        self
    }

    pub fn add_stroke(&mut self, id: impl Into<StyleId>, width: Option<f64>) -> &mut Self {
        self.strokes.insert(id.into(), width);
        self
    }

    pub fn with_fill(mut self, id: impl Into<StyleId>) -> Self {
        self.add_fill(id);
        self
    }

    pub fn with_stroke(mut self, id: impl Into<StyleId>, width: Option<f64>) -> Self {
        self.add_stroke(id, width);
        self
    }
}

impl StyleTable for StyleSheet {
    fn has_fill(&self, id: &StyleId) -> bool {
        self.fills.contains(id)
    }

    fn has_stroke(&self, id: &StyleId) -> bool {
        self.strokes.contains_key(id)
    }

    fn stroke_width(&self, id: &StyleId) -> Option<f64> {
        self.strokes.get(id).copied().flatten()
    }
}

/// Accepts every id; used when a shape is rendered as a mask
///
/// A mask only needs coverage, so every referenced style counts as present.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskStyles;

impl StyleTable for MaskStyles {
    fn has_fill(&self, _id: &StyleId) -> bool {
        true
    }

    fn has_stroke(&self, _id: &StyleId) -> bool {
        true
    }

    fn stroke_width(&self, _id: &StyleId) -> Option<f64> {
        None
    }
}

impl<T: StyleTable + ?Sized> StyleTable for &T {
    fn has_fill(&self, id: &StyleId) -> bool {
        (**self).has_fill(id)
    }

    fn has_stroke(&self, id: &StyleId) -> bool {
        (**self).has_stroke(id)
    }

    fn stroke_width(&self, id: &StyleId) -> Option<f64> {
        (**self).stroke_width(id)
    }
}
