//! Configuration errors for ball-probability models.

/// Errors from validating a [`BallFitConfig`](crate::BallFitConfig) parameter.
#[derive(Debug, thiserror::Error)]
pub enum BallFitError {
    /// Returned when a fixed bandwidth is zero, negative, NaN, or infinite.
    #[error("bandwidth must be positive and finite, got {value}")]
    InvalidBandwidth {
        /// The rejected bandwidth.
        value: f64,
    },
}
