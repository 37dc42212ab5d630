//! Distance Accumulator: drive two Fit Models and reduce their outputs to one scalar.

use std::fmt;

use tracing::{debug, info, instrument};

use crate::distance::SbdResult;
use crate::error::{FitError, SbdError};
use crate::matrix::Matrix;
use crate::model::{FitModel, FitModelFactory, FittedModel, ModelGuard};
use crate::partition::{Blocks, Partition};

/// One of the two groups being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// Rows `[0, n1)`, own columns `[0, n1_total)`.
    First,
    /// Rows `[n1, n1 + n2)`, own columns `[n1_total, num)`.
    Second,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Second => f.write_str("second"),
        }
    }
}

impl Group {
    fn wrap(self) -> impl FnOnce(FitError) -> SbdError {
        move |source| SbdError::Fit {
            group: self,
            source,
        }
    }
}

/// Partition a flattened matrix and compute the shape-based distance.
///
/// # Errors
///
/// Everything [`Partition::split`] and [`distance`] return.
pub fn distance_flat<F: FitModelFactory>(
    x: &[f64],
    partition: &Partition,
    factory: &F,
) -> Result<SbdResult, SbdError> {
    let blocks = partition.split(x)?;
    distance(blocks, factory)
}

/// Compute the shape-based distance between the two groups of `blocks`.
///
/// Model A is bound to `xx` and model B to `yy`. The result is
/// `mean((pxx - pxy)^2) + mean((pyy - pyx)^2)`, where `pxx`/`pyy` are the
/// fitted matrices and `pxy`/`pyx` the predictions for the cross blocks,
/// all shaped like the owning model's block.
///
/// Models are released and all buffers freed on every return path.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SbdError::Fit`] | a model fails to construct, train, or answer a query |
/// | [`SbdError::NonFiniteTerm`] | a group term is NaN or infinite |
/// | [`SbdError::NonFiniteDistance`] | the sum of the two terms overflows |
#[instrument(skip_all, fields(first = %blocks.xx.shape(), second = %blocks.yy.shape()))]
pub fn distance<F: FitModelFactory>(blocks: Blocks, factory: &F) -> Result<SbdResult, SbdError> {
    let Blocks { xx, xy, yx, yy } = blocks;

    let model_x = factory.construct(xx).map_err(Group::First.wrap())?;
    let model_y = factory.construct(yy).map_err(Group::Second.wrap())?;

    let fitted_x = ModelGuard::new(model_x.train().map_err(Group::First.wrap())?);
    let fitted_y = ModelGuard::new(model_y.train().map_err(Group::Second.wrap())?);
    debug!("both models trained");

    let mut pxx = Matrix::zeros(fitted_x.shape());
    let mut pyy = Matrix::zeros(fitted_y.shape());
    fitted_x.fitted_into(&mut pxx).map_err(Group::First.wrap())?;
    fitted_y.fitted_into(&mut pyy).map_err(Group::Second.wrap())?;

    let mut pxy = Matrix::zeros(fitted_x.shape());
    let mut pyx = Matrix::zeros(fitted_y.shape());
    fitted_x
        .predict_into(&mut pxy, xy.as_view())
        .map_err(Group::First.wrap())?;
    fitted_y
        .predict_into(&mut pyx, yx.as_view())
        .map_err(Group::Second.wrap())?;

    let first_term = finite_term(Group::First, mean_squared_difference(&pxx, &pxy))?;
    let second_term = finite_term(Group::Second, mean_squared_difference(&pyy, &pyx))?;

    let result = SbdResult::from_terms(first_term, second_term)?;
    info!(
        distance = result.distance.value(),
        first_term,
        second_term,
        "shape-based distance computed"
    );
    Ok(result)
}

/// Mean of the squared element-wise differences of two equally shaped matrices.
///
/// Each square is scaled by `1 / n` before summing, so the running sum
/// cannot overflow ahead of the mean.
fn mean_squared_difference(fitted: &Matrix, predicted: &Matrix) -> f64 {
    debug_assert_eq!(fitted.shape(), predicted.shape());
    let n = fitted.rows() as f64 * fitted.cols() as f64;
    fitted
        .as_slice()
        .iter()
        .zip(predicted.as_slice())
        .map(|(f, p)| {
            let d = f - p;
            d * d / n
        })
        .sum()
}

fn finite_term(group: Group, value: f64) -> Result<f64, SbdError> {
    if !value.is_finite() {
        return Err(SbdError::NonFiniteTerm { group, value });
    }
    debug!(%group, term = value, "group term computed");
    Ok(value)
}
