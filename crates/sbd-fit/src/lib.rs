//! Ball-probability Fit Models for the shape-based distance.
//!
//! Each model is bound to one group's own block of a distance matrix. For
//! every reference point (row) and own observation (column) it estimates
//! the probability mass inside the ball around the reference point that
//! reaches the observation: under the own sample when asked for fitted
//! values, under a new sample when asked to predict. Estimators are the
//! empirical fraction and a logistic-kernel smoothed fraction.

mod config;
mod ecdf;
mod error;
mod logistic;
mod model;

pub use config::{BallFitConfig, Bandwidth, Estimator, FixedBandwidth};
pub use error::BallFitError;
pub use model::{BallFit, TrainedBallFit};
