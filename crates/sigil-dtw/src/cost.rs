//! Per-step point costs for alignment.

use serde::{Deserialize, Serialize};

use crate::error::DtwError;

/// Local cost between two aligned points.
///
/// For one-channel points `Absolute` is `|a - b|` and `Squared` is `(a - b)²`;
/// for multivariate points they are the Euclidean norm and its square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointCost {
    /// Euclidean distance between points.
    Absolute,

    /// Squared Euclidean distance between points.
    #[default]
    Squared,
}

impl PointCost {
    /// Cost between two scalar samples.
    #[must_use]
    pub fn scalar(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Absolute => (a - b).abs(),
            Self::Squared => (a - b) * (a - b),
        }
    }

    /// Per-step cost function over scalar sequences, for [`Dtw::new`](crate::Dtw::new).
    #[must_use]
    pub fn scalar_fn(self) -> impl Fn(&f64, &f64, usize) -> f64 + Copy + Send + Sync {
        move |a: &f64, b: &f64, _: usize| self.scalar(*a, *b)
    }

    /// Per-step cost function over multivariate columns, for [`Dtw::new`](crate::Dtw::new).
    ///
    /// Columns must share a dimension; check it before aligning.
    #[must_use]
    pub fn column_fn(self) -> impl Fn(&&[f64], &&[f64], usize) -> f64 + Copy + Send + Sync {
        move |a: &&[f64], b: &&[f64], _: usize| self.points(a, b)
    }

    /// Cost between two points of equal dimension. Callers guarantee the lengths match.
    pub(crate) fn points(self, a: &[f64], b: &[f64]) -> f64 {
        let sq = squared_euclidean_unchecked(a, b);
        match self {
            Self::Absolute => sq.sqrt(),
            Self::Squared => sq,
        }
    }
}

/// Squared Euclidean distance between two multivariate points.
///
/// # Errors
///
/// Returns [`DtwError::DimensionMismatch`] if the points differ in length.
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> Result<f64, DtwError> {
    if a.len() != b.len() {
        return Err(DtwError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(squared_euclidean_unchecked(a, b))
}

/// Euclidean distance between two multivariate points.
///
/// # Errors
///
/// Returns [`DtwError::DimensionMismatch`] if the points differ in length.
pub fn euclidean(a: &[f64], b: &[f64]) -> Result<f64, DtwError> {
    squared_euclidean(a, b).map(f64::sqrt)
}

pub(crate) fn squared_euclidean_unchecked(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
