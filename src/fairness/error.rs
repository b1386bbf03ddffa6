//! Error types for the fairness threshold engine.

use thiserror::Error;

/// Errors raised while validating engine inputs or searching for thresholds.
#[derive(Debug, Error, PartialEq)]
pub enum FairnessError {
    /// A group passed to the engine has no examples.
    #[error("group {group} is empty; both groups need at least one example")]
    EmptyGroup { group: char },

    /// A curve was requested for zero scores.
    #[error("no scores given; a ROC curve needs at least one example")]
    EmptyInput,

    /// Parallel vectors disagree in length.
    #[error("length mismatch: {what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A label outside {0, 1}.
    #[error("label at index {index} is {value}; labels must be 0 or 1")]
    NonBinaryLabel { index: usize, value: u8 },

    /// The protected attribute holds something other than 0 or 1.
    #[error("protected attribute value {value} at row {index} is not 0 or 1")]
    NonBinaryGroup { index: usize, value: f64 },

    /// NaN or infinite decision score.
    #[error("score at index {index} is not finite ({value})")]
    NonFiniteScore { index: usize, value: f64 },

    /// The operating-point grid needs both end points.
    #[error("grid must have at least 2 points, got {0}")]
    GridTooSmall(usize),
}
