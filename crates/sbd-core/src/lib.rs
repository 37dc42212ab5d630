//! Shape-based distance between two groups of observations.
//!
//! Pure math library, zero I/O. Splits one flattened
//! `(n1 + n2) x (n1_total + n2_total)` matrix into four blocks, binds a Fit
//! Model to each group's own block, and sums each group's mean squared
//! difference between fitted and cross-predicted matrices.
//!
//! The Fit Model itself is a collaborator: anything implementing
//! [`FitModelFactory`] can be plugged in.

mod accumulate;
mod distance;
mod error;
mod matrix;
mod model;
mod partition;

pub use accumulate::{Group, distance, distance_flat};
pub use distance::{SbdResult, ShapeDistance};
pub use error::{FitError, SbdError};
pub use matrix::{Matrix, MatrixView, Shape};
pub use model::{
    FitModel, FitModelFactory, FittedModel, ModelGuard, ensure_output_shape, ensure_row_count,
};
pub use partition::{Blocks, Partition};
