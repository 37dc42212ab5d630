//! Error types for partitioning, Fit Model queries, and distance accumulation.

use crate::accumulate::Group;
use crate::matrix::Shape;

/// Errors from matrix construction, partitioning, and SBD computation.
#[derive(Debug, thiserror::Error)]
pub enum SbdError {
    /// Returned when a group count or matrix dimension is zero.
    #[error("{name} must be at least 1")]
    ZeroDimension {
        /// Name of the offending dimension.
        name: &'static str,
    },

    /// Returned when a buffer holds fewer values than its declared dimensions need.
    #[error("buffer holds {got} values, dimensions require {expected}")]
    InvalidDimensions {
        /// Number of values required by the dimensions.
        expected: usize,
        /// Number of values actually supplied.
        got: usize,
    },

    /// Returned when `rows * cols` does not fit in `usize`.
    #[error("matrix of {rows} rows and {cols} columns overflows usize")]
    DimensionOverflow {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// Returned when a matrix shape differs from the one the partition describes.
    #[error("matrix is {got}, partition expects {expected}")]
    ShapeMismatch {
        /// Shape implied by the partition.
        expected: Shape,
        /// Shape of the supplied matrix.
        got: Shape,
    },

    /// Wraps a Fit Model failure for one of the two groups.
    #[error("fit model for {group} group failed")]
    Fit {
        /// Group whose model failed.
        group: Group,
        /// The underlying model error.
        #[source]
        source: FitError,
    },

    /// Returned when a group term evaluates to NaN or infinity.
    #[error("{group} group term is not finite: {value}")]
    NonFiniteTerm {
        /// Group whose term is not finite.
        group: Group,
        /// The offending value.
        value: f64,
    },

    /// Returned when both group terms are finite but their sum is not.
    #[error("distance is not finite: {first_term} + {second_term} overflows")]
    NonFiniteDistance {
        /// Group 1 term.
        first_term: f64,
        /// Group 2 term.
        second_term: f64,
    },
}

/// Errors raised by a Fit Model while training or answering queries.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    /// Returned when an input matrix contains NaN or infinity.
    #[error("non-finite value at row {row}, column {col}")]
    NonFiniteValue {
        /// Row of the first non-finite value.
        row: usize,
        /// Column of the first non-finite value.
        col: usize,
    },

    /// Returned when the model cannot be fitted for a row.
    #[error("singular fit at row {row}: {reason}")]
    SingularFit {
        /// Row that could not be fitted.
        row: usize,
        /// Human-readable cause.
        reason: String,
    },

    /// Returned when a caller-supplied output buffer has the wrong shape.
    #[error("output buffer is {got}, model produces {expected}")]
    OutputShape {
        /// Shape of the bound matrix.
        expected: Shape,
        /// Shape of the supplied buffer.
        got: Shape,
    },

    /// Returned when a prediction input has a different row count than the bound matrix.
    #[error("prediction input has {got} rows, model is bound to {expected}")]
    RowCountMismatch {
        /// Row count of the bound matrix.
        expected: usize,
        /// Row count of the prediction input.
        got: usize,
    },
}
