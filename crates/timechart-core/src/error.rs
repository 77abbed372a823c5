// File: crates/timechart-core/src/error.rs
// Summary: Data model errors raised when a chart dataset is malformed.

use thiserror::Error;

/// Malformed chart input. Raised synchronously by [`crate::Chart::new`] and
/// re-checked by `set_chart`; a failing chart is never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataModelError {
    /// A chart needs at least two x values to span a drawable range.
    #[error("chart must contain at least 2 x values, got {count}")]
    TooFewPoints { count: usize },

    #[error("source `{source_name}` has {actual} values, expected {expected}")]
    LengthMismatch {
        source_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("x values must be strictly increasing (violated at index {index})")]
    NotIncreasing { index: usize },
}
