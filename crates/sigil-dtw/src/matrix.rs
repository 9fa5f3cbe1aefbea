//! Accumulated cost matrix produced by a full DTW alignment.

use std::ops::Index;

use crate::distance::DtwDistance;

/// Dense `(n+1) × (m+1)` table of accumulated alignment cost.
///
/// Row 0 and column 0 are sentinels: `[0][0]` is zero and every other
/// sentinel cell is `+∞`. Cell `[row][col]` with `row, col ≥ 1` holds the
/// cheapest cost of aligning the first `row` source points with the first
/// `col` target points.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Allocate a sentinel-initialised matrix for sequences of length `n` and `m`.
    pub(crate) fn with_sentinels(n: usize, m: usize) -> Self {
        let rows = n + 1;
        let cols = m + 1;
        let mut data = vec![f64::INFINITY; rows * cols];
        data[0] = 0.0;
        Self { rows, cols, data }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Return the number of rows (`n + 1`).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns (`m + 1`).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the accumulated cost at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row > n` or `col > m`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows, "row index {row} out of bounds for {} rows", self.rows);
        assert!(col < self.cols, "column index {col} out of bounds for {} columns", self.cols);
        self.data[row * self.cols + col]
    }

    /// Return the terminal cell `[n][m]` as a distance.
    #[must_use]
    pub fn terminal(&self) -> DtwDistance {
        DtwDistance::new(self.data[self.data.len() - 1])
    }

    /// Return row `row` as a slice of `m + 1` values.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

impl Index<(usize, usize)> for CostMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(row < self.rows, "row index {row} out of bounds for {} rows", self.rows);
        assert!(col < self.cols, "column index {col} out of bounds for {} columns", self.cols);
        &self.data[row * self.cols + col]
    }
}
