//! Matrix Partitioner: split one flattened matrix into the four group blocks.

use tracing::{debug, instrument};

use crate::error::SbdError;
use crate::matrix::{Matrix, MatrixView, Shape};

/// Row and column split of the input matrix into two groups.
///
/// Rows `[0, n1)` belong to group 1 and rows `[n1, n1 + n2)` to group 2.
/// Columns `[0, n1_total)` are group 1's own columns and
/// `[n1_total, n1_total + n2_total)` are group 2's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    n1: usize,
    n1_total: usize,
    n2: usize,
    n2_total: usize,
}

impl Partition {
    /// Create a partition from the four group counts.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SbdError::ZeroDimension`] | any count is zero |
    /// | [`SbdError::DimensionOverflow`] | the full matrix size overflows `usize` |
    pub fn new(n1: usize, n1_total: usize, n2: usize, n2_total: usize) -> Result<Self, SbdError> {
        for (name, value) in [
            ("n1", n1),
            ("n1_total", n1_total),
            ("n2", n2),
            ("n2_total", n2_total),
        ] {
            if value == 0 {
                return Err(SbdError::ZeroDimension { name });
            }
        }
        let partition = Self {
            n1,
            n1_total,
            n2,
            n2_total,
        };
        partition.required_len()?;
        Ok(partition)
    }

    /// Return the group 1 row count.
    #[must_use]
    pub fn n1(&self) -> usize {
        self.n1
    }

    /// Return the group 1 own-column count.
    #[must_use]
    pub fn n1_total(&self) -> usize {
        self.n1_total
    }

    /// Return the group 2 row count.
    #[must_use]
    pub fn n2(&self) -> usize {
        self.n2
    }

    /// Return the group 2 own-column count.
    #[must_use]
    pub fn n2_total(&self) -> usize {
        self.n2_total
    }

    /// Return the full matrix shape, `(n1 + n2) x (n1_total + n2_total)`.
    ///
    /// # Errors
    ///
    /// Returns [`SbdError::DimensionOverflow`] if a sum overflows.
    pub fn shape(&self) -> Result<Shape, SbdError> {
        let overflow = SbdError::DimensionOverflow {
            rows: self.n1.saturating_add(self.n2),
            cols: self.n1_total.saturating_add(self.n2_total),
        };
        match (
            self.n1.checked_add(self.n2),
            self.n1_total.checked_add(self.n2_total),
        ) {
            (Some(rows), Some(cols)) => Ok(Shape::new(rows, cols)),
            _ => Err(overflow),
        }
    }

    /// Return the number of values the flattened matrix must hold.
    ///
    /// # Errors
    ///
    /// Returns [`SbdError::DimensionOverflow`] if the size overflows `usize`.
    pub fn required_len(&self) -> Result<usize, SbdError> {
        let shape = self.shape()?;
        shape.checked_len().ok_or(SbdError::DimensionOverflow {
            rows: shape.rows,
            cols: shape.cols,
        })
    }

    /// Return the partition with group 1 and group 2 exchanged.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            n1: self.n2,
            n1_total: self.n2_total,
            n2: self.n1,
            n2_total: self.n1_total,
        }
    }

    /// Split a flattened row-major buffer into the four blocks.
    ///
    /// Values past [`Partition::required_len`] are ignored.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SbdError::InvalidDimensions`] | `x` is shorter than `required_len()` |
    /// | [`SbdError::DimensionOverflow`] | the full matrix size overflows `usize` |
    #[instrument(skip(self, x), fields(len = x.len(), n1 = self.n1, n2 = self.n2))]
    pub fn split(&self, x: &[f64]) -> Result<Blocks, SbdError> {
        let shape = self.shape()?;
        let view = MatrixView::from_prefix(x, shape.rows, shape.cols)?;
        Ok(self.split_unchecked(view))
    }

    /// Split a matrix view whose shape must match the partition exactly.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SbdError::ShapeMismatch`] | `view.shape()` differs from [`Partition::shape`] |
    /// | [`SbdError::DimensionOverflow`] | the full matrix size overflows `usize` |
    pub fn split_view(&self, view: MatrixView<'_>) -> Result<Blocks, SbdError> {
        let expected = self.shape()?;
        if view.shape() != expected {
            return Err(SbdError::ShapeMismatch {
                expected,
                got: view.shape(),
            });
        }
        Ok(self.split_unchecked(view))
    }

    fn split_unchecked(&self, view: MatrixView<'_>) -> Blocks {
        let rows = view.rows();
        let cols = view.cols();
        let blocks = Blocks {
            xx: view.block(0..self.n1, 0..self.n1_total),
            xy: view.block(0..self.n1, self.n1_total..cols),
            yx: view.block(self.n1..rows, 0..self.n1_total),
            yy: view.block(self.n1..rows, self.n1_total..cols),
        };
        debug!(
            xx = %blocks.xx.shape(),
            xy = %blocks.xy.shape(),
            yx = %blocks.yx.shape(),
            yy = %blocks.yy.shape(),
            "matrix partitioned"
        );
        blocks
    }
}

/// The four sub-matrices of a partitioned input.
///
/// `xx` and `yy` are each group's own block; `xy` and `yx` are the
/// cross blocks (a group's rows against the other group's columns).
#[derive(Debug, Clone, PartialEq)]
pub struct Blocks {
    /// Group 1 rows, group 1 columns.
    pub xx: Matrix,
    /// Group 1 rows, group 2 columns.
    pub xy: Matrix,
    /// Group 2 rows, group 1 columns.
    pub yx: Matrix,
    /// Group 2 rows, group 2 columns.
    pub yy: Matrix,
}

impl Blocks {
    /// Return the partition these blocks were cut with.
    #[must_use]
    pub fn partition(&self) -> Partition {
        Partition {
            n1: self.xx.rows(),
            n1_total: self.xx.cols(),
            n2: self.yy.rows(),
            n2_total: self.yy.cols(),
        }
    }

    /// Reassemble the full matrix. Inverse of [`Partition::split`].
    ///
    /// # Errors
    ///
    /// Returns [`SbdError::InvalidDimensions`] when the blocks do not tile a
    /// rectangle (row counts of `xx`/`xy` or `yx`/`yy`, or column counts of
    /// `xx`/`yx` or `xy`/`yy`, disagree).
    pub fn assemble(&self) -> Result<Matrix, SbdError> {
        let tiles = self.xx.rows() == self.xy.rows()
            && self.yx.rows() == self.yy.rows()
            && self.xx.cols() == self.yx.cols()
            && self.xy.cols() == self.yy.cols();
        let rows = self.xx.rows() + self.yy.rows();
        let cols = self.xx.cols() + self.yy.cols();
        if !tiles {
            let got = [&self.xx, &self.xy, &self.yx, &self.yy]
                .iter()
                .map(|m| m.as_slice().len())
                .sum();
            return Err(SbdError::InvalidDimensions {
                expected: rows * cols,
                got,
            });
        }
        let mut data = Vec::with_capacity(rows * cols);
        for (left, right) in self.xx.iter_rows().zip(self.xy.iter_rows()) {
            data.extend_from_slice(left);
            data.extend_from_slice(right);
        }
        for (left, right) in self.yx.iter_rows().zip(self.yy.iter_rows()) {
            data.extend_from_slice(left);
            data.extend_from_slice(right);
        }
        Matrix::from_vec(rows, cols, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x5 matrix with value `10 * row + col`.
    fn grid() -> Vec<f64> {
        (0..3)
            .flat_map(|r| (0..5).map(move |c| (10 * r + c) as f64))
            .collect()
    }

    #[test]
    fn rejects_zero_counts() {
        assert!(matches!(
            Partition::new(0, 1, 1, 1),
            Err(SbdError::ZeroDimension { name: "n1" })
        ));
        assert!(matches!(
            Partition::new(1, 1, 1, 0),
            Err(SbdError::ZeroDimension { name: "n2_total" })
        ));
    }

    #[test]
    fn rejects_overflowing_counts() {
        let result = Partition::new(usize::MAX, 1, 1, 1);
        assert!(matches!(result, Err(SbdError::DimensionOverflow { .. })));
    }

    #[test]
    fn blocks_follow_offsets() {
        let p = Partition::new(1, 2, 2, 3).unwrap();
        let b = p.split(&grid()).unwrap();
        assert_eq!(b.xx.as_slice(), &[0.0, 1.0]);
        assert_eq!(b.xy.as_slice(), &[2.0, 3.0, 4.0]);
        assert_eq!(b.yx.as_slice(), &[10.0, 11.0, 20.0, 21.0]);
        assert_eq!(b.yy.as_slice(), &[12.0, 13.0, 14.0, 22.0, 23.0, 24.0]);
    }

    #[test]
    fn block_shapes() {
        let p = Partition::new(1, 2, 2, 3).unwrap();
        let b = p.split(&grid()).unwrap();
        assert_eq!(b.xx.shape(), Shape::new(1, 2));
        assert_eq!(b.xy.shape(), Shape::new(1, 3));
        assert_eq!(b.yx.shape(), Shape::new(2, 2));
        assert_eq!(b.yy.shape(), Shape::new(2, 3));
        assert_eq!(b.partition(), p);
    }

    #[test]
    fn short_buffer_is_invalid_dimensions() {
        let p = Partition::new(1, 2, 2, 3).unwrap();
        let data = grid();
        let result = p.split(&data[..14]);
        assert!(matches!(
            result,
            Err(SbdError::InvalidDimensions { expected: 15, got: 14 })
        ));
    }

    #[test]
    fn split_view_requires_exact_shape() {
        let p = Partition::new(1, 2, 2, 2).unwrap();
        let data = grid();
        let view = MatrixView::new(&data, 3, 5).unwrap();
        let result = p.split_view(view);
        assert!(matches!(
            result,
            Err(SbdError::ShapeMismatch {
                expected: Shape { rows: 3, cols: 4 },
                got: Shape { rows: 3, cols: 5 },
            })
        ));
    }

    #[test]
    fn assemble_restores_input() {
        let p = Partition::new(2, 4, 1, 1).unwrap();
        let data = grid();
        let b = p.split(&data).unwrap();
        assert_eq!(b.assemble().unwrap().as_slice(), data.as_slice());
    }

    #[test]
    fn assemble_rejects_ragged_blocks() {
        let p = Partition::new(1, 2, 2, 3).unwrap();
        let mut b = p.split(&grid()).unwrap();
        b.xy = b.yy.clone();
        assert!(matches!(
            b.assemble(),
            Err(SbdError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn swapped_exchanges_groups() {
        let p = Partition::new(1, 2, 3, 4).unwrap();
        let s = p.swapped();
        assert_eq!((s.n1(), s.n1_total(), s.n2(), s.n2_total()), (3, 4, 1, 2));
        assert_eq!(s.swapped(), p);
    }
}
