//! Ball-probability Fit Model.
//!
//! Row `i` of the bound block holds the distances from reference point `i`
//! to the group's own observations, so each entry `own[i][j]` is the radius
//! of a ball around point `i` that reaches observation `j`. The fitted value
//! is the mass the own sample puts inside that ball; a prediction is the mass
//! a new sample (the same reference points against other observations) puts
//! inside the same ball.

use sbd_core::{
    FitError, FitModel, FittedModel, Matrix, MatrixView, Shape, ensure_output_shape,
    ensure_row_count,
};
use tracing::{debug, instrument};

use crate::config::{Bandwidth, Estimator};
use crate::{ecdf, logistic};

/// A ball-probability model bound to its own block, not yet trained.
#[derive(Debug, Clone)]
pub struct BallFit {
    own: Matrix,
    estimator: Estimator,
}

impl BallFit {
    pub(crate) fn new(own: Matrix, estimator: Estimator) -> Self {
        Self { own, estimator }
    }
}

/// Per-row parameters learned at training time.
#[derive(Debug, Clone)]
enum RowFit {
    Empirical { sorted: Vec<f64> },
    Logistic { scale: f64 },
}

/// A trained ball-probability model.
#[derive(Debug, Clone)]
pub struct TrainedBallFit {
    own: Matrix,
    rows: Vec<RowFit>,
}

impl FitModel for BallFit {
    type Fitted = TrainedBallFit;

    #[instrument(skip(self), fields(shape = %self.own.shape(), estimator = %self.estimator))]
    fn train(self) -> Result<TrainedBallFit, FitError> {
        check_finite(self.own.as_view())?;
        let rows = self
            .own
            .iter_rows()
            .enumerate()
            .map(|(row, values)| fit_row(self.estimator, row, values))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(n_rows = rows.len(), "ball fit trained");
        Ok(TrainedBallFit {
            own: self.own,
            rows,
        })
    }
}

fn fit_row(estimator: Estimator, row: usize, values: &[f64]) -> Result<RowFit, FitError> {
    match estimator {
        Estimator::Empirical => Ok(RowFit::Empirical {
            sorted: ecdf::sorted(values),
        }),
        Estimator::Logistic { bandwidth } => {
            let h = match bandwidth {
                Bandwidth::Fixed(h) => h.value(),
                Bandwidth::Silverman => {
                    logistic::silverman_bandwidth(values).ok_or_else(|| FitError::SingularFit {
                        row,
                        reason: "distances have zero spread, bandwidth is undefined".to_string(),
                    })?
                }
            };
            Ok(RowFit::Logistic {
                scale: logistic::logistic_scale(h),
            })
        }
    }
}

/// Return an error for the first NaN or infinite entry.
fn check_finite(view: MatrixView<'_>) -> Result<(), FitError> {
    for (row, values) in view.iter_rows().enumerate() {
        if let Some(col) = values.iter().position(|v| !v.is_finite()) {
            return Err(FitError::NonFiniteValue { row, col });
        }
    }
    Ok(())
}

impl FittedModel for TrainedBallFit {
    fn shape(&self) -> Shape {
        self.own.shape()
    }

    fn fitted_into(&self, out: &mut Matrix) -> Result<(), FitError> {
        debug_assert!(!self.is_released(), "fitted_into called after release");
        ensure_output_shape(self.shape(), out)?;
        for (row, fit) in self.rows.iter().enumerate() {
            let own = self.own.row(row);
            let target = out.row_mut(row);
            match fit {
                RowFit::Empirical { sorted } => {
                    for (slot, &radius) in target.iter_mut().zip(own) {
                        *slot = ecdf::mass_within(sorted, radius);
                    }
                }
                RowFit::Logistic { scale } => {
                    for (slot, &radius) in target.iter_mut().zip(own) {
                        *slot = logistic::mass_within(own, radius, *scale);
                    }
                }
            }
        }
        Ok(())
    }

    fn predict_into(&self, out: &mut Matrix, new: MatrixView<'_>) -> Result<(), FitError> {
        debug_assert!(!self.is_released(), "predict_into called after release");
        ensure_output_shape(self.shape(), out)?;
        ensure_row_count(self.own.rows(), new)?;
        check_finite(new)?;
        for (row, fit) in self.rows.iter().enumerate() {
            let own = self.own.row(row);
            let other = new.row(row);
            let target = out.row_mut(row);
            match fit {
                RowFit::Empirical { .. } => {
                    let sorted = ecdf::sorted(other);
                    for (slot, &radius) in target.iter_mut().zip(own) {
                        *slot = ecdf::mass_within(&sorted, radius);
                    }
                }
                RowFit::Logistic { scale } => {
                    for (slot, &radius) in target.iter_mut().zip(own) {
                        *slot = logistic::mass_within(other, radius, *scale);
                    }
                }
            }
        }
        Ok(())
    }

    fn release_internal(&mut self) {
        self.rows = Vec::new();
    }
}

impl TrainedBallFit {
    /// Return true once [`FittedModel::release_internal`] has run.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.rows.is_empty()
    }
}
