//! Deterministic Fit Model stubs shared by the integration tests.

#![allow(dead_code)]

use sbd_core::{
    FitError, FitModel, FitModelFactory, FittedModel, Matrix, MatrixView, Partition, Shape,
    ensure_output_shape, ensure_row_count,
};

/// How a stub answers `predict_into`.
#[derive(Debug, Clone, Copy)]
pub enum Predict {
    /// Copy the new block through unchanged (shapes must agree).
    PassThrough,
    /// Ignore the new block and return the bound block: a perfect self-predictor.
    OwnBlock,
    /// Fill each output row with the mean of the matching new row.
    RowMean,
}

/// Factory for [`Stub`] models. Fitted values are always the bound block.
#[derive(Debug, Clone, Copy)]
pub struct StubFactory(pub Predict);

pub struct Stub {
    own: Matrix,
    predict: Predict,
}

impl FitModelFactory for StubFactory {
    type Model = Stub;

    fn construct(&self, own: Matrix) -> Result<Stub, FitError> {
        Ok(Stub {
            own,
            predict: self.0,
        })
    }
}

impl FitModel for Stub {
    type Fitted = Stub;

    fn train(self) -> Result<Stub, FitError> {
        Ok(self)
    }
}

impl FittedModel for Stub {
    fn shape(&self) -> Shape {
        self.own.shape()
    }

    fn fitted_into(&self, out: &mut Matrix) -> Result<(), FitError> {
        ensure_output_shape(self.shape(), out)?;
        *out = self.own.clone();
        Ok(())
    }

    fn predict_into(&self, out: &mut Matrix, new: MatrixView<'_>) -> Result<(), FitError> {
        ensure_output_shape(self.shape(), out)?;
        ensure_row_count(self.own.rows(), new)?;
        match self.predict {
            Predict::PassThrough => {
                if new.shape() != out.shape() {
                    return Err(FitError::OutputShape {
                        expected: out.shape(),
                        got: new.shape(),
                    });
                }
                *out = new.to_owned();
            }
            Predict::OwnBlock => *out = self.own.clone(),
            Predict::RowMean => {
                for (row, values) in new.iter_rows().enumerate() {
                    let mean = values.iter().sum::<f64>() / values.len() as f64;
                    out.row_mut(row).fill(mean);
                }
            }
        }
        Ok(())
    }
}

/// Reorder a flattened matrix so that group 2's rows and columns come first.
pub fn swap_groups(x: &[f64], partition: &Partition) -> Vec<f64> {
    let shape = partition.shape().expect("valid partition");
    let rows: Vec<usize> = (partition.n1()..shape.rows).chain(0..partition.n1()).collect();
    let cols: Vec<usize> = (partition.n1_total()..shape.cols)
        .chain(0..partition.n1_total())
        .collect();
    rows.iter()
        .flat_map(|&r| cols.iter().map(move |&c| x[r * shape.cols + c]))
        .collect()
}
