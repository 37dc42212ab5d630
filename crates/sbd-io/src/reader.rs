//! CSV matrix reader with full input validation.

use std::path::{Path, PathBuf};

use sbd_core::Matrix;
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads a dense numeric matrix from a CSV file.
///
/// Expected CSV format:
/// - One matrix row per CSV record, every cell a finite float
/// - No label column; an optional header row is skipped when enabled
/// - All rows have the same number of cells
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows, or rows with zero cells |
/// | [`IoError::InconsistentRowLength`] | Row has a different cell count than the first row |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
pub struct MatrixReader {
    path: PathBuf,
    has_header: bool,
}

impl MatrixReader {
    /// Create a new reader for the given CSV file path. No header by default.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            has_header: false,
        }
    }

    /// Skip the first record as a header row.
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Read and validate the CSV file, returning the matrix.
    #[instrument(skip(self), fields(path = %self.path.display(), header = self.has_header))]
    pub fn read(&self) -> Result<Matrix, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets ragged rows through so that InconsistentRowLength
        // fires instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut data = Vec::new();
        let mut expected_cols = None;
        let mut n_rows = 0usize;

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            let expected = *expected_cols.get_or_insert(record.len());
            if record.len() != expected {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected,
                    got: record.len(),
                });
            }

            for (col_index, raw) in record.iter().enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: raw.to_string(),
                    })?;
                data.push(value);
            }
            n_rows += 1;
        }

        let cols = expected_cols.unwrap_or(0);
        debug!(n_rows, cols, "CSV records parsed");

        // A blank CSV or a header-only file both end up here.
        let matrix = Matrix::from_vec(n_rows, cols, data).map_err(|_| IoError::EmptyDataset {
            path: self.path.clone(),
        })?;

        info!(shape = %matrix.shape(), "matrix loaded");
        Ok(matrix)
    }
}
