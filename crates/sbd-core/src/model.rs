//! Fit Model contract used by the distance accumulator.
//!
//! A model is bound to one group's own block at construction, trained once,
//! then queried for its fitted matrix and for predictions on the other
//! group's cross block. Training consumes the untrained model, so a query
//! before training does not type-check.

use std::ops::{Deref, DerefMut};

use crate::error::FitError;
use crate::matrix::{Matrix, MatrixView, Shape};

/// Builds untrained Fit Models bound to a group's own block.
pub trait FitModelFactory {
    /// Untrained model produced by this factory.
    type Model: FitModel;

    /// Bind a new model to `own`. The model takes ownership of the block.
    ///
    /// # Errors
    ///
    /// Returns a [`FitError`] if the block is unusable for this model family.
    fn construct(&self, own: Matrix) -> Result<Self::Model, FitError>;
}

/// A Fit Model bound to its training block but not yet trained.
pub trait FitModel: Sized {
    /// The trained model.
    type Fitted: FittedModel;

    /// Fit the model parameters from the bound block.
    ///
    /// # Errors
    ///
    /// Returns a [`FitError`] if the block cannot be fitted.
    fn train(self) -> Result<Self::Fitted, FitError>;
}

/// A trained Fit Model that answers fitted and predicted queries.
pub trait FittedModel {
    /// Shape of the bound block, and of every output buffer.
    fn shape(&self) -> Shape;

    /// Write the model's reconstruction of its own block into `out`.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::OutputShape`] if `out` is not [`FittedModel::shape`].
    fn fitted_into(&self, out: &mut Matrix) -> Result<(), FitError>;

    /// Write the model's prediction for `new` into `out`.
    ///
    /// `new` has the bound block's row count and any column count; `out`
    /// always has the bound block's shape.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`FitError::OutputShape`] | `out` is not [`FittedModel::shape`] |
    /// | [`FitError::RowCountMismatch`] | `new.rows()` differs from the bound block |
    fn predict_into(&self, out: &mut Matrix, new: MatrixView<'_>) -> Result<(), FitError>;

    /// Free model-internal working memory. The model is not queried afterwards.
    fn release_internal(&mut self) {}
}

/// Check that a caller-supplied output buffer has the model's shape.
///
/// # Errors
///
/// Returns [`FitError::OutputShape`] on mismatch.
pub fn ensure_output_shape(expected: Shape, out: &Matrix) -> Result<(), FitError> {
    if out.shape() != expected {
        return Err(FitError::OutputShape {
            expected,
            got: out.shape(),
        });
    }
    Ok(())
}

/// Check that a prediction input has the bound block's row count.
///
/// # Errors
///
/// Returns [`FitError::RowCountMismatch`] on mismatch.
pub fn ensure_row_count(expected: usize, new: MatrixView<'_>) -> Result<(), FitError> {
    if new.rows() != expected {
        return Err(FitError::RowCountMismatch {
            expected,
            got: new.rows(),
        });
    }
    Ok(())
}

/// Owns a trained model and releases it when dropped.
///
/// Drop runs [`FittedModel::release_internal`] and then drops the model, on
/// every exit path of the enclosing scope.
#[derive(Debug)]
pub struct ModelGuard<M: FittedModel> {
    model: M,
}

impl<M: FittedModel> ModelGuard<M> {
    /// Take ownership of a trained model.
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

impl<M: FittedModel> Deref for ModelGuard<M> {
    type Target = M;

    fn deref(&self) -> &Self::Target {
        &self.model
    }
}

impl<M: FittedModel> DerefMut for ModelGuard<M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.model
    }
}

impl<M: FittedModel> Drop for ModelGuard<M> {
    fn drop(&mut self) {
        self.model.release_internal();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct Counting {
        shape: Shape,
        releases: Rc<Cell<usize>>,
    }

    impl FittedModel for Counting {
        fn shape(&self) -> Shape {
            self.shape
        }

        fn fitted_into(&self, out: &mut Matrix) -> Result<(), FitError> {
            ensure_output_shape(self.shape, out)
        }

        fn predict_into(&self, out: &mut Matrix, new: MatrixView<'_>) -> Result<(), FitError> {
            ensure_output_shape(self.shape, out)?;
            ensure_row_count(self.shape.rows, new)
        }

        fn release_internal(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    #[test]
    fn guard_releases_once_on_drop() {
        let releases = Rc::new(Cell::new(0));
        {
            let guard = ModelGuard::new(Counting {
                shape: Shape::new(1, 1),
                releases: Rc::clone(&releases),
            });
            assert_eq!(guard.shape(), Shape::new(1, 1));
            assert_eq!(releases.get(), 0);
        }
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn output_shape_checked() {
        let out = Matrix::zeros(Shape::new(2, 3));
        let result = ensure_output_shape(Shape::new(2, 2), &out);
        assert!(matches!(
            result,
            Err(FitError::OutputShape {
                expected: Shape { rows: 2, cols: 2 },
                got: Shape { rows: 2, cols: 3 },
            })
        ));
    }

    #[test]
    fn row_count_checked() {
        let data = [0.0; 6];
        let new = MatrixView::new(&data, 3, 2).unwrap();
        let result = ensure_row_count(2, new);
        assert!(matches!(
            result,
            Err(FitError::RowCountMismatch { expected: 2, got: 3 })
        ));
    }
}
