//! Dense row-major matrices: an owned container and a borrowed view.

use std::fmt;
use std::ops::{Index, IndexMut, Range};

use crate::error::SbdError;

/// Row and column counts of a dense matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl Shape {
    /// Create a shape from row and column counts.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Return the number of elements, or `None` on overflow.
    #[must_use]
    pub fn checked_len(self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    fn validated_len(self) -> Result<usize, SbdError> {
        if self.rows == 0 {
            return Err(SbdError::ZeroDimension { name: "rows" });
        }
        if self.cols == 0 {
            return Err(SbdError::ZeroDimension { name: "cols" });
        }
        self.checked_len().ok_or(SbdError::DimensionOverflow {
            rows: self.rows,
            cols: self.cols,
        })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Owned, row-major matrix with at least one row and one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    shape: Shape,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SbdError::ZeroDimension`] | `rows` or `cols` is zero |
    /// | [`SbdError::DimensionOverflow`] | `rows * cols` overflows |
    /// | [`SbdError::InvalidDimensions`] | `data.len() != rows * cols` |
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, SbdError> {
        let shape = Shape::new(rows, cols);
        let expected = shape.validated_len()?;
        if data.len() != expected {
            return Err(SbdError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Create a matrix from a list of equally long rows.
    ///
    /// # Errors
    ///
    /// Same as [`Matrix::from_vec`]; a ragged row reports
    /// [`SbdError::InvalidDimensions`] for the flattened length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SbdError> {
        let cols = rows.first().map_or(0, Vec::len);
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_vec(rows.len(), cols, data)
    }

    /// Create a zero-filled matrix, used as an output buffer for Fit Model queries.
    ///
    /// Shapes are taken from already-validated matrices, so both dimensions
    /// are non-zero and the length fits in memory.
    pub(crate) fn zeros(shape: Shape) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.rows * shape.cols],
        }
    }

    /// Return the shape.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Return the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    /// Return the number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Return the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    /// Return row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        self.as_view().row(row)
    }

    /// Return row `row` as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let cols = self.shape.cols;
        &mut self.data[row * cols..(row + 1) * cols]
    }

    /// Iterate over the rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.shape.cols)
    }

    /// Return the row-major data.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Borrow this matrix as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView {
            shape: self.shape,
            data: &self.data,
        }
    }

    /// Return the rows as nested vectors.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(row < self.shape.rows, "row {row} out of bounds for {}", self.shape);
        assert!(col < self.shape.cols, "column {col} out of bounds for {}", self.shape);
        &self.data[row * self.shape.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(row < self.shape.rows, "row {row} out of bounds for {}", self.shape);
        assert!(col < self.shape.cols, "column {col} out of bounds for {}", self.shape);
        &mut self.data[row * self.shape.cols + col]
    }
}

/// Borrowed, row-major view into a matrix. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    shape: Shape,
    data: &'a [f64],
}

impl<'a> MatrixView<'a> {
    /// Create a view over exactly `rows * cols` row-major values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SbdError::ZeroDimension`] | `rows` or `cols` is zero |
    /// | [`SbdError::DimensionOverflow`] | `rows * cols` overflows |
    /// | [`SbdError::InvalidDimensions`] | `data.len() != rows * cols` |
    pub fn new(data: &'a [f64], rows: usize, cols: usize) -> Result<Self, SbdError> {
        let shape = Shape::new(rows, cols);
        let expected = shape.validated_len()?;
        if data.len() != expected {
            return Err(SbdError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Create a view over the leading `rows * cols` values of `data`.
    ///
    /// Trailing values are ignored.
    ///
    /// # Errors
    ///
    /// As [`MatrixView::new`], except that [`SbdError::InvalidDimensions`] is
    /// only returned when `data` is shorter than `rows * cols`.
    pub fn from_prefix(data: &'a [f64], rows: usize, cols: usize) -> Result<Self, SbdError> {
        let expected = Shape::new(rows, cols).validated_len()?;
        if data.len() < expected {
            return Err(SbdError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }
        Self::new(&data[..expected], rows, cols)
    }

    /// Return the shape.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Return the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    /// Return the number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Return the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(col < self.shape.cols, "column {col} out of bounds for {}", self.shape);
        self.row(row)[col]
    }

    /// Return row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &'a [f64] {
        assert!(row < self.shape.rows, "row {row} out of bounds for {}", self.shape);
        let cols = self.shape.cols;
        &self.data[row * cols..(row + 1) * cols]
    }

    /// Iterate over the rows.
    pub fn iter_rows(self) -> impl Iterator<Item = &'a [f64]> {
        self.data.chunks_exact(self.shape.cols)
    }

    /// Return the underlying row-major slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Copy the rectangular window `rows x cols` into a new matrix.
    ///
    /// Elements are read at flat index `row * self.cols() + col`.
    ///
    /// # Panics
    ///
    /// Panics if a range is empty or extends past the view.
    #[must_use]
    pub fn block(&self, rows: Range<usize>, cols: Range<usize>) -> Matrix {
        assert!(
            rows.start < rows.end && rows.end <= self.shape.rows,
            "row range {rows:?} invalid for {}",
            self.shape
        );
        assert!(
            cols.start < cols.end && cols.end <= self.shape.cols,
            "column range {cols:?} invalid for {}",
            self.shape
        );
        let shape = Shape::new(rows.len(), cols.len());
        let mut data = Vec::with_capacity(shape.rows * shape.cols);
        for row in rows {
            data.extend_from_slice(&self.row(row)[cols.clone()]);
        }
        Matrix { shape, data }
    }

    /// Copy the view into an owned matrix.
    #[must_use]
    pub fn to_owned(&self) -> Matrix {
        Matrix {
            shape: self.shape,
            data: self.data.to_vec(),
        }
    }
}
