//! Edge decoding error types

use thiserror::Error;

/// Errors that can occur while decoding an edge description
///
/// Any of these aborts the conversion of the offending edge record. Data
/// quality problems that still allow output (uncovered segments, unknown
/// style references) are not errors, see [`crate::CoverageWarning`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EdgeError {
    /// A numeric token matched neither the decimal nor the hex grammar
    #[error("malformed number: {token:?}")]
    MalformedNumber { token: String },

    /// The edge string violates the command grammar
    #[error("invalid edge format at byte {offset}: {reason}")]
    InvalidEdgeFormat { offset: usize, reason: String },

    /// A stored point list does not describe a segment
    #[error("invalid point list: {0}")]
    InvalidPointList(String),

    /// A record in a batch failed to decode
    #[error("edge record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<EdgeError>,
    },
}

impl EdgeError {
    pub(crate) fn malformed(token: &str) -> Self {
        EdgeError::MalformedNumber {
            token: token.to_string(),
        }
    }

    pub(crate) fn invalid(offset: usize, reason: impl Into<String>) -> Self {
        EdgeError::InvalidEdgeFormat {
            offset,
            reason: reason.into(),
        }
    }

    /// Attach the index of the record that produced this error
    pub fn in_record(self, index: usize) -> Self {
        EdgeError::Record {
            index,
            source: Box::new(self),
        }
    }
}
