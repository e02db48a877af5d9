//! Sparse matrix assembly buffer.
//!
//! Global operators are accumulated as (row, col, value) triplets and
//! converted to CSR once complete; duplicate coordinates are summed
//! during the conversion, which is exactly the `+=` scatter-add
//! semantics element assembly needs.

use nalgebra_sparse::csr::CsrMatrix as NalgebraCsr;

/// Compressed Sparse Row matrix, the output format of every assembled
/// operator.
pub type CsrMatrix = NalgebraCsr<f64>;

/// Builder for assembling a sparse matrix from triplets (COO format).
pub struct TripletMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl TripletMatrix {
    /// Create a new triplet buffer.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self::with_capacity(n_rows, n_cols, 0)
    }

    /// Create with estimated non-zero capacity.
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::with_capacity(nnz_estimate),
            cols: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Add a value at (row, col). Duplicates are summed on conversion.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.n_rows, "row index out of bounds");
        debug_assert!(col < self.n_cols, "col index out of bounds");

        if value.abs() > f64::EPSILON {
            self.rows.push(row);
            self.cols.push(col);
            self.values.push(value);
        }
    }

    /// Scatter a dense block at the given global row/column indices.
    ///
    /// This is the core finite-element operation: `block[(i, j)]`
    /// accumulates into `(rows[i], cols[j])`.
    pub fn add_block(&mut self, rows: &[usize], cols: &[usize], block: &nalgebra::DMatrix<f64>) {
        debug_assert_eq!(block.nrows(), rows.len());
        debug_assert_eq!(block.ncols(), cols.len());

        for (i, &row) in rows.iter().enumerate() {
            for (j, &col) in cols.iter().enumerate() {
                self.add(row, col, block[(i, j)]);
            }
        }
    }

    /// Number of stored triplets.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Convert to CSR, summing duplicate entries.
    pub fn to_csr(self) -> CsrMatrix {
        use nalgebra_sparse::coo::CooMatrix;

        let coo = CooMatrix::try_from_triplets(
            self.n_rows,
            self.n_cols,
            self.rows,
            self.cols,
            self.values,
        )
        .expect("triplet indices validated on insertion");

        CsrMatrix::from(&coo)
    }
}
