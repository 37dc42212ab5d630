//! Configuration builder for ball-probability Fit Models.

use std::fmt;

use sbd_core::{FitError, FitModelFactory, Matrix};

use crate::error::BallFitError;
use crate::model::BallFit;

/// A validated, strictly positive kernel bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBandwidth(f64);

impl FixedBandwidth {
    /// Return the bandwidth value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// How the logistic estimator chooses its per-row bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bandwidth {
    /// Silverman's rule of thumb, resolved per row at training time.
    Silverman,
    /// One bandwidth for every row.
    Fixed(FixedBandwidth),
}

impl Bandwidth {
    /// Create a fixed bandwidth.
    ///
    /// # Errors
    ///
    /// Returns [`BallFitError::InvalidBandwidth`] unless `value` is positive and finite.
    pub fn fixed(value: f64) -> Result<Self, BallFitError> {
        if !(value > 0.0 && value.is_finite()) {
            return Err(BallFitError::InvalidBandwidth { value });
        }
        Ok(Self::Fixed(FixedBandwidth(value)))
    }
}

/// Estimator for the probability mass a sample puts inside a ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimator {
    /// Fraction of observations within the radius.
    Empirical,
    /// Logistic-kernel smoothed fraction of observations within the radius.
    Logistic {
        /// Kernel bandwidth selection.
        bandwidth: Bandwidth,
    },
}

impl Estimator {
    /// Return the estimator's short name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empirical => "empirical",
            Self::Logistic { .. } => "logistic",
        }
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for ball-probability Fit Models.
///
/// Construct via [`BallFitConfig::new`], then chain `with_*` methods. The
/// config is the [`FitModelFactory`] handed to
/// [`sbd_core::distance`].
///
/// # Defaults
///
/// | Parameter   | Default     |
/// |-------------|-------------|
/// | `estimator` | `Empirical` |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallFitConfig {
    pub(crate) estimator: Estimator,
}

impl BallFitConfig {
    /// Create a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            estimator: Estimator::Empirical,
        }
    }

    /// Set the ball-probability estimator.
    #[must_use]
    pub fn with_estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Return the ball-probability estimator.
    #[must_use]
    pub fn estimator(&self) -> Estimator {
        self.estimator
    }
}

impl Default for BallFitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FitModelFactory for BallFitConfig {
    type Model = BallFit;

    fn construct(&self, own: Matrix) -> Result<BallFit, FitError> {
        Ok(BallFit::new(own, self.estimator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empirical() {
        assert_eq!(BallFitConfig::new().estimator(), Estimator::Empirical);
        assert_eq!(BallFitConfig::default(), BallFitConfig::new());
    }

    #[test]
    fn with_estimator_sets_field() {
        let config = BallFitConfig::new().with_estimator(Estimator::Logistic {
            bandwidth: Bandwidth::Silverman,
        });
        assert_eq!(config.estimator().name(), "logistic");
    }

    #[test]
    fn fixed_bandwidth_validation() {
        assert!(Bandwidth::fixed(0.5).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Bandwidth::fixed(bad),
                Err(BallFitError::InvalidBandwidth { .. })
            ));
        }
    }

    #[test]
    fn fixed_bandwidth_value() {
        let Bandwidth::Fixed(h) = Bandwidth::fixed(0.25).unwrap() else {
            panic!("expected fixed bandwidth");
        };
        assert_eq!(h.value(), 0.25);
    }

    #[test]
    fn estimator_display() {
        assert_eq!(Estimator::Empirical.to_string(), "empirical");
    }
}
