//! Shape-based distance value and per-group breakdown.

use std::cmp::Ordering;
use std::fmt;

use crate::error::SbdError;

/// A non-negative shape-based distance.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ShapeDistance(f64);

impl ShapeDistance {
    pub(crate) fn new(value: f64) -> Self {
        debug_assert!(value >= 0.0, "shape distance must be non-negative, got {value}");
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for ShapeDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Outcome of one distance computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SbdResult {
    /// `first_term + second_term`.
    pub distance: ShapeDistance,
    /// Mean squared fitted-vs-predicted difference for group 1.
    pub first_term: f64,
    /// Mean squared fitted-vs-predicted difference for group 2.
    pub second_term: f64,
}

impl SbdResult {
    /// Sum two finite, non-negative group terms.
    ///
    /// Returns [`SbdError::NonFiniteDistance`] if the sum overflows.
    pub(crate) fn from_terms(first_term: f64, second_term: f64) -> Result<Self, SbdError> {
        let total = first_term + second_term;
        if !total.is_finite() {
            return Err(SbdError::NonFiniteDistance {
                first_term,
                second_term,
            });
        }
        Ok(Self {
            distance: ShapeDistance::new(total),
            first_term,
            second_term,
        })
    }
}
