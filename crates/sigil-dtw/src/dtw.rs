//! DTW alignment with warping-path recovery.

use std::fmt;

use tracing::instrument;

use crate::distance::DtwDistance;
use crate::matrix::CostMatrix;
use crate::path::{WarpingPath, WarpingStep};

/// Exhaustive global DTW over a caller-supplied per-step cost.
///
/// The cost function receives `(source element, target element, source index)`
/// and must return a finite, non-negative value. The source index lets callers
/// weight steps by template position (see [`ls_dtw_distance`](crate::ls_dtw_distance)).
#[derive(Clone, Copy)]
pub struct Dtw<F> {
    cost: F,
}

impl<F> fmt::Debug for Dtw<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dtw").finish_non_exhaustive()
    }
}

impl<F> Dtw<F> {
    /// Create an aligner around a per-step cost function.
    #[must_use]
    pub fn new(cost: F) -> Self {
        Self { cost }
    }

    /// Align `source` with `target`, keeping the full cost matrix and the optimal path.
    ///
    /// Runs in O(n * m) time and space. Path recovery walks back from `(n, m)`
    /// and breaks ties between predecessors in a fixed order: vertical
    /// (`row - 1`) first, then horizontal (`col - 1`), then diagonal.
    ///
    /// When either input is empty the path is empty and the distance is zero.
    #[must_use]
    #[instrument(level = "trace", skip_all, fields(n = source.len(), m = target.len()))]
    pub fn align<E>(&self, source: &[E], target: &[E]) -> Alignment
    where
        F: Fn(&E, &E, usize) -> f64,
    {
        let n = source.len();
        let m = target.len();
        let mut matrix = CostMatrix::with_sentinels(n, m);

        if n == 0 || m == 0 {
            return Alignment {
                cost_matrix: matrix,
                path: WarpingPath::default(),
                distance: DtwDistance::ZERO,
            };
        }

        for row in 1..=n {
            for col in 1..=m {
                let c = (self.cost)(&source[row - 1], &target[col - 1], row - 1);
                let best = matrix[(row - 1, col)]
                    .min(matrix[(row, col - 1)])
                    .min(matrix[(row - 1, col - 1)]);
                matrix.set(row, col, c + best);
            }
        }

        let path = traceback(&matrix);
        let distance = matrix.terminal();
        Alignment {
            cost_matrix: matrix,
            path,
            distance,
        }
    }

    /// Compute only the DTW distance between `source` and `target`.
    ///
    /// Evaluates the same recurrence as [`align`](Self::align) with a rolling
    /// two-row buffer, so memory is O(m). The result is bit-identical to
    /// `align(source, target).distance()`.
    #[must_use]
    #[instrument(level = "trace", skip_all, fields(n = source.len(), m = target.len()))]
    pub fn distance<E>(&self, source: &[E], target: &[E]) -> DtwDistance
    where
        F: Fn(&E, &E, usize) -> f64,
    {
        let n = source.len();
        let m = target.len();
        if n == 0 || m == 0 {
            return DtwDistance::ZERO;
        }

        let mut prev = vec![f64::INFINITY; m + 1];
        let mut curr = vec![f64::INFINITY; m + 1];
        prev[0] = 0.0;

        for row in 1..=n {
            curr[0] = f64::INFINITY;
            for col in 1..=m {
                let c = (self.cost)(&source[row - 1], &target[col - 1], row - 1);
                let best = prev[col].min(curr[col - 1]).min(prev[col - 1]);
                curr[col] = c + best;
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap `prev` holds row n.
        DtwDistance::new(prev[m])
    }
}

/// Walk back from `(n, m)` to `(1, 1)` recording zero-based steps.
fn traceback(matrix: &CostMatrix) -> WarpingPath {
    let mut row = matrix.rows() - 1;
    let mut col = matrix.cols() - 1;
    let mut steps = Vec::with_capacity(row + col);

    loop {
        steps.push(WarpingStep::new(row - 1, col - 1));
        if row == 1 && col == 1 {
            break;
        }
        if row == 1 {
            col -= 1;
        } else if col == 1 {
            row -= 1;
        } else {
            let up = matrix[(row - 1, col)];
            let left = matrix[(row, col - 1)];
            let diag = matrix[(row - 1, col - 1)];
            let best = up.min(left).min(diag);
            if up == best {
                row -= 1;
            } else if left == best {
                col -= 1;
            } else {
                row -= 1;
                col -= 1;
            }
        }
    }

    steps.reverse();
    WarpingPath::new(steps)
}

/// Result of a full alignment: accumulated cost table, optimal path, and distance.
#[derive(Debug, Clone)]
pub struct Alignment {
    cost_matrix: CostMatrix,
    path: WarpingPath,
    distance: DtwDistance,
}

impl Alignment {
    /// Return the accumulated cost matrix.
    #[must_use]
    pub fn cost_matrix(&self) -> &CostMatrix {
        &self.cost_matrix
    }

    /// Return the optimal warping path.
    #[must_use]
    pub fn path(&self) -> &WarpingPath {
        &self.path
    }

    /// Return the alignment distance (the terminal accumulated cost).
    #[must_use]
    pub fn distance(&self) -> DtwDistance {
        self.distance
    }

    /// Drop the cost matrix and keep the path.
    #[must_use]
    pub fn into_path(self) -> WarpingPath {
        self.path
    }
}
