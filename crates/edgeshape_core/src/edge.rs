//! Edge description lexer and parser
//!
//! The `edges` attribute of an edge record is a stream of single character
//! commands followed by coordinates:
//!
//! ```text
//! start  : moveto (moveto | lineto | quadto)*
//! moveto : "!" NUMBER NUMBER select?
//! lineto : ("|" | "/") NUMBER NUMBER
//! quadto : ("[" | "]") NUMBER NUMBER NUMBER NUMBER     (control, destination)
//! select : "S" DIGIT                                   (editor hint, ignored)
//! NUMBER : -?\d+(\.\d+)?  |  #HHHHHH.HH
//! ```
//!
//! Whitespace is ignored everywhere. Every moveto that actually moves ends
//! the current segment, so one edge string can yield several segments.
//! Any other character, including an `S` without its digit, is rejected
//! with its byte offset rather than skipped.
//!
//! # Example
//!
//! ```
//! use edgeshape_core::edge::parse_segments;
//!
//! let segments = parse_segments("!0 0|200 0[400 200 200 400!0 0S2|0 200").unwrap();
//! assert_eq!(segments.len(), 2);
//! ```

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace1, one_of, satisfy},
    combinator::{map, opt, recognize, value},
    error::{context, VerboseError},
    multi::many0,
    sequence::{pair, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::EdgeError;
use crate::geometry::Point;
use crate::number::parse_number;
use crate::segment::{Segment, SegmentBuilder};
use crate::style::StyleId;

/// Lexer result type using VerboseError for diagnostics
type LexResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

// ============================================================================
// Lexer
// ============================================================================

/// A lexical token of the edge format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    MoveTo,
    LineTo,
    QuadTo,
    Number(&'a str),
}

impl Token<'_> {
    fn describe(&self) -> &'static str {
        match self {
            Token::MoveTo => "moveto",
            Token::LineTo => "lineto",
            Token::QuadTo => "quadto",
            Token::Number(_) => "number",
        }
    }
}

/// Skip whitespace and select markers
///
/// A select marker swallows its digit here, so that digit can never be
/// lexed as a coordinate.
fn ignored(input: &str) -> LexResult<()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(char('S'), satisfy(|c: char| c.is_ascii_digit()))),
        ))),
    )(input)
}

/// `#` followed by a hex digit run, a dot, and another run
///
/// The run lengths are validated when the number is decoded.
fn hex_number(input: &str) -> LexResult<&str> {
    let hex = |c: char| c.is_ascii_hexdigit();
    recognize(tuple((char('#'), take_while1(hex), char('.'), take_while1(hex))))(input)
}

/// `-?\d+(\.\d+)?`
fn decimal_number(input: &str) -> LexResult<&str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

fn token(input: &str) -> LexResult<Token<'_>> {
    context(
        "edge token",
        alt((
            value(Token::MoveTo, char('!')),
            value(Token::LineTo, one_of("|/")),
            value(Token::QuadTo, one_of("[]")),
            map(alt((hex_number, decimal_number)), Token::Number),
        )),
    )(input)
}

/// Iterator over the tokens of an edge string, with byte offsets
pub struct Tokens<'a> {
    input: &'a str,
    rest: &'a str,
    failed: bool,
}

impl<'a> Tokens<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            rest: input,
            failed: false,
        }
    }

    fn offset(&self) -> usize {
        self.input.len() - self.rest.len()
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<(usize, Token<'a>), EdgeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        // `ignored` cannot fail: many0 accepts zero repetitions
        if let Ok((rest, ())) = ignored(self.rest) {
            self.rest = rest;
        }
        if self.rest.is_empty() {
            return None;
        }

        let offset = self.offset();
        match token(self.rest) {
            Ok((rest, tok)) => {
                self.rest = rest;
                Some(Ok((offset, tok)))
            }
            Err(_) => {
                self.failed = true;
                let found = self.rest.chars().next().unwrap_or_default();
                Some(Err(EdgeError::invalid(
                    offset,
                    format!("unexpected character {:?}", found),
                )))
            }
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Forward-only iterator over the segments of an edge string
///
/// Yields each segment as soon as the moveto ending it (or the end of the
/// input) is read. After an error the iterator is exhausted.
pub struct Segments<'a> {
    tokens: Tokens<'a>,
    active: Option<SegmentBuilder>,
    done: bool,
}

impl<'a> Segments<'a> {
    pub fn new(edges: &'a str) -> Self {
        Self {
            tokens: Tokens::new(edges),
            active: None,
            done: false,
        }
    }

    fn read_number(&mut self, command: Token<'_>) -> Result<f64, EdgeError> {
        match self.tokens.next() {
            Some(Ok((_, Token::Number(n)))) => parse_number(n),
            Some(Ok((offset, other))) => Err(EdgeError::invalid(
                offset,
                format!(
                    "expected a coordinate for {}, found {}",
                    command.describe(),
                    other.describe()
                ),
            )),
            Some(Err(e)) => Err(e),
            None => Err(EdgeError::invalid(
                self.tokens.offset(),
                format!("truncated {} command", command.describe()),
            )),
        }
    }

    fn read_point(&mut self, command: Token<'_>) -> Result<Point, EdgeError> {
        let x = self.read_number(command)?;
        let y = self.read_number(command)?;
        Ok(Point::new(x, y))
    }

    /// Read the mandatory leading moveto
    fn start(&mut self) -> Result<SegmentBuilder, EdgeError> {
        match self.tokens.next() {
            Some(Ok((_, Token::MoveTo))) => {
                let start = self.read_point(Token::MoveTo)?;
                Ok(SegmentBuilder::new(start))
            }
            Some(Ok((offset, other))) => Err(EdgeError::invalid(
                offset,
                format!("edge description must start with moveto, found {}", other.describe()),
            )),
            Some(Err(e)) => Err(e),
            None => Err(EdgeError::invalid(0, "empty edge description")),
        }
    }

    /// Run commands until a segment completes or the input ends
    fn advance(&mut self) -> Result<Option<Segment>, EdgeError> {
        let mut active = match self.active.take() {
            Some(builder) => builder,
            None => self.start()?,
        };

        loop {
            let (offset, command) = match self.tokens.next() {
                Some(result) => result?,
                None => {
                    self.done = true;
                    return Ok((!active.is_empty()).then(|| active.finish()));
                }
            };

            match command {
                Token::MoveTo => {
                    let to = self.read_point(command)?;
                    // A moveto to the current point is an editor artifact
                    if to != active.current() {
                        let finished = std::mem::replace(&mut active, SegmentBuilder::new(to));
                        if !finished.is_empty() {
                            self.active = Some(active);
                            return Ok(Some(finished.finish()));
                        }
                    }
                }
                Token::LineTo => {
                    let to = self.read_point(command)?;
                    active.line_to(to);
                }
                Token::QuadTo => {
                    let control = self.read_point(command)?;
                    let to = self.read_point(command)?;
                    active.quad_to(control, to);
                }
                Token::Number(_) => {
                    return Err(EdgeError::invalid(
                        offset,
                        "expected a command, found a coordinate",
                    ));
                }
            }
        }
    }
}

impl Iterator for Segments<'_> {
    type Item = Result<Segment, EdgeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(segment)) => Some(Ok(segment)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Parse an edge string into all of its segments
pub fn parse_segments(edges: &str) -> Result<Vec<Segment>, EdgeError> {
    Segments::new(edges).collect()
}

// ============================================================================
// Edge records
// ============================================================================

/// One edge record as found in a shape: the raw edge string and its styles
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub edges: String,
    /// Fill style on the left of the direction of travel
    #[serde(rename = "fillStyle0", alias = "fill_left", default)]
    pub fill_left: Option<StyleId>,
    /// Fill style on the right of the direction of travel
    #[serde(rename = "fillStyle1", alias = "fill_right", default)]
    pub fill_right: Option<StyleId>,
    #[serde(rename = "strokeStyle", alias = "stroke", default)]
    pub stroke: Option<StyleId>,
}

impl EdgeRecord {
    pub fn new(edges: impl Into<String>) -> Self {
        Self {
            edges: edges.into(),
            ..Default::default()
        }
    }

    pub fn with_fill_left(mut self, id: impl Into<StyleId>) -> Self {
        self.fill_left = Some(id.into());
        self
    }

    pub fn with_fill_right(mut self, id: impl Into<StyleId>) -> Self {
        self.fill_right = Some(id.into());
        self
    }

    pub fn with_stroke(mut self, id: impl Into<StyleId>) -> Self {
        self.stroke = Some(id.into());
        self
    }

    /// Decode the edge string of this record
    pub fn parse(&self) -> Result<RawEdge, EdgeError> {
        Ok(RawEdge {
            segments: parse_segments(&self.edges)?,
            fill_left: self.fill_left.clone(),
            fill_right: self.fill_right.clone(),
            stroke: self.stroke.clone(),
        })
    }
}

/// A decoded edge record: its segments plus up to three style associations
#[derive(Clone, Debug, PartialEq)]
pub struct RawEdge {
    pub segments: Vec<Segment>,
    pub fill_left: Option<StyleId>,
    pub fill_right: Option<StyleId>,
    pub stroke: Option<StyleId>,
}

impl RawEdge {
    /// Whether any style role is still assigned
    pub fn is_visible(&self) -> bool {
        self.fill_left.is_some() || self.fill_right.is_some() || self.stroke.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::PathPoint;

    fn pt(x: f64, y: f64) -> PathPoint {
        PathPoint::Point(Point::new(x, y))
    }

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokens::new(input).map(|t| t.unwrap().1).collect()
    }

    #[test]
    fn test_lex_commands_and_numbers() {
        assert_eq!(
            tokens("!10 -20 |#1F.80/3.5 [1 2 3 4]5 6 7 8"),
            vec![
                Token::MoveTo,
                Token::Number("10"),
                Token::Number("-20"),
                Token::LineTo,
                Token::Number("#1F.80"),
                Token::LineTo,
                Token::Number("3.5"),
                Token::QuadTo,
                Token::Number("1"),
                Token::Number("2"),
                Token::Number("3"),
                Token::Number("4"),
                Token::QuadTo,
                Token::Number("5"),
                Token::Number("6"),
                Token::Number("7"),
                Token::Number("8"),
            ]
        );
    }

    #[test]
    fn test_lex_skips_select_digit() {
        assert_eq!(
            tokens("!0 0S2|20 20"),
            vec![
                Token::MoveTo,
                Token::Number("0"),
                Token::Number("0"),
                Token::LineTo,
                Token::Number("20"),
                Token::Number("20"),
            ]
        );
    }

    #[test]
    fn test_lex_rejects_stray_character() {
        let result: Result<Vec<_>, _> = Tokens::new("!0 0 x").collect();
        assert_eq!(
            result,
            Err(EdgeError::InvalidEdgeFormat {
                offset: 5,
                reason: "unexpected character 'x'".to_string(),
            })
        );
    }

    #[test]
    fn test_lex_rejects_select_without_digit() {
        assert_eq!(
            parse_segments("!0 0S|20 20"),
            Err(EdgeError::InvalidEdgeFormat {
                offset: 4,
                reason: "unexpected character 'S'".to_string(),
            })
        );
    }

    #[test]
    fn test_closed_square() {
        let segments = parse_segments("!0 0|200 0|200 200|0 200|0 0").unwrap();
        assert_eq!(segments.len(), 1);
        let s = &segments[0];
        assert_eq!(s.source(), s.sink());
        assert_eq!(
            s.points(),
            &[pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0), pt(0.0, 0.0)]
        );
    }

    #[test]
    fn test_trailing_moveto_adds_no_segment() {
        let segments = parse_segments("!0 0|10 0|10 10|0 10!0 0").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].points().len(), 4);
    }

    #[test]
    fn test_moveto_in_place_is_ignored() {
        let segments = parse_segments("!0 0|20 0!20 0|20 20").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].points(), &[pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)]);
    }

    #[test]
    fn test_moveto_splits_segments() {
        let segments = parse_segments("!0 0|20 0!40 40|60 40").unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].source(), Point::new(2.0, 2.0));
        assert_eq!(segments[1].sink(), Point::new(3.0, 2.0));
    }

    #[test]
    fn test_quadto_marks_control() {
        let segments = parse_segments("!0 0[100 200 200 0").unwrap();
        assert_eq!(
            segments[0].points(),
            &[
                pt(0.0, 0.0),
                PathPoint::Control(Point::new(5.0, 10.0)),
                pt(10.0, 0.0)
            ]
        );
        assert!((segments[0].bounds().max_y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_segments_are_lazy() {
        let mut iter = Segments::new("!0 0|20 0!40 40|60 40!0 0|");
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_must_start_with_moveto() {
        assert!(matches!(
            parse_segments("|0 0"),
            Err(EdgeError::InvalidEdgeFormat { offset: 0, .. })
        ));
        assert!(matches!(
            parse_segments("   "),
            Err(EdgeError::InvalidEdgeFormat { .. })
        ));
    }

    #[test]
    fn test_truncated_command() {
        assert!(matches!(
            parse_segments("!0 0|10"),
            Err(EdgeError::InvalidEdgeFormat { .. })
        ));
        assert!(matches!(
            parse_segments("!0 0[10 10 20"),
            Err(EdgeError::InvalidEdgeFormat { .. })
        ));
        assert!(matches!(
            parse_segments("!0 0|10 10 20"),
            Err(EdgeError::InvalidEdgeFormat { .. })
        ));
    }

    #[test]
    fn test_malformed_hex_propagates() {
        assert_eq!(
            parse_segments("!#1234567.00 0|0 0"),
            Err(EdgeError::MalformedNumber {
                token: "#1234567.00".to_string()
            })
        );
    }

    #[test]
    fn test_record_parse_keeps_styles() {
        let raw = EdgeRecord::new("!0 0|20 0")
            .with_fill_left("1")
            .with_stroke(3u32)
            .parse()
            .unwrap();
        assert_eq!(raw.segments.len(), 1);
        assert_eq!(raw.fill_left, Some(StyleId::from("1")));
        assert_eq!(raw.fill_right, None);
        assert_eq!(raw.stroke, Some(StyleId::from("3")));
    }

    #[test]
    fn test_record_json_names() {
        let record: EdgeRecord = serde_json::from_str(
            r#"{"edges": "!0 0|20 0", "fillStyle1": 2, "strokeStyle": "1"}"#,
        )
        .unwrap();
        assert_eq!(record.fill_left, None);
        assert_eq!(record.fill_right, Some(StyleId::from("2")));
        assert_eq!(record.stroke, Some(StyleId::from("1")));
    }
}
