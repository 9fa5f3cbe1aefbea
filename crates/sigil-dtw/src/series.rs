//! Univariate time series with validation guarantees.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::DtwError;
use crate::resample::resample_linear;

/// Check that `values` is non-empty and finite.
pub(crate) fn validate(values: &[f64]) -> Result<(), DtwError> {
    if values.is_empty() {
        return Err(DtwError::EmptySeries);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(DtwError::NonFiniteValue { index });
    }
    Ok(())
}

/// Owned, validated time series. Guaranteed non-empty with all finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct TimeSeries(Vec<f64>);

impl TimeSeries {
    /// Create a new time series, validating that it is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `values` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, DtwError> {
        validate(&values)?;
        Ok(Self(values))
    }

    /// Wrap values that are already known to be finite and non-empty.
    pub(crate) fn new_unchecked(values: Vec<f64>) -> Self {
        debug_assert!(validate(&values).is_ok());
        Self(values)
    }

    /// Borrow this series as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> TimeSeriesView<'_> {
        TimeSeriesView::new_unchecked(&self.0)
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed series; provided for the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for TimeSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for TimeSeries {
    type Error = DtwError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// Borrowed, validated view into a time series. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesView<'a>(&'a [f64]);

impl<'a> TimeSeriesView<'a> {
    /// Create a new view, validating that the slice is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `slice` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(slice: &'a [f64]) -> Result<Self, DtwError> {
        validate(slice)?;
        Ok(Self(slice))
    }

    pub(crate) fn new_unchecked(slice: &'a [f64]) -> Self {
        Self(slice)
    }

    /// Return the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a validated view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Linearly resample this series to `len` points.
    ///
    /// Returns `None` when `len` is zero.
    #[must_use]
    pub fn resample(&self, len: usize) -> Option<TimeSeries> {
        if len == 0 {
            return None;
        }
        Some(TimeSeries::new_unchecked(resample_linear(self.0, len)))
    }
}

impl Index<usize> for TimeSeriesView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AsRef<[f64]> for TimeSeriesView<'_> {
    fn as_ref(&self) -> &[f64] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_vec() {
        let result = TimeSeries::new(vec![]);
        assert!(matches!(result, Err(DtwError::EmptySeries)));
    }

    #[test]
    fn rejects_nan() {
        let result = TimeSeries::new(vec![1.0, f64::NAN, 3.0]);
        assert!(matches!(result, Err(DtwError::NonFiniteValue { index: 1 })));
    }

    #[test]
    fn rejects_neg_infinity() {
        let result = TimeSeries::new(vec![f64::NEG_INFINITY, 2.0]);
        assert!(matches!(result, Err(DtwError::NonFiniteValue { index: 0 })));
    }

    #[test]
    fn view_rejects_infinity() {
        let data = [1.0, f64::INFINITY];
        let result = TimeSeriesView::new(&data);
        assert!(matches!(result, Err(DtwError::NonFiniteValue { index: 1 })));
    }

    #[test]
    fn view_indexing() {
        let data = [10.0, 20.0, 30.0];
        let view = TimeSeriesView::new(&data).unwrap();
        assert_eq!(view[0], 10.0);
        assert_eq!(view[2], 30.0);
    }

    #[test]
    fn resample_to_same_length_is_identity() {
        let ts = TimeSeries::new(vec![1.0, 4.0, 2.0, 8.0]).unwrap();
        let resampled = ts.as_view().resample(4).unwrap();
        assert_eq!(resampled.as_ref(), ts.as_ref());
    }

    #[test]
    fn resample_to_zero_is_none() {
        let ts = TimeSeries::new(vec![1.0, 2.0]).unwrap();
        assert!(ts.as_view().resample(0).is_none());
    }

    #[test]
    fn try_from_vec() {
        let ts: Result<TimeSeries, _> = vec![1.0, 2.0].try_into();
        assert!(ts.is_ok());
    }

    #[test]
    fn decode_rejects_empty_series() {
        let bytes = bincode::serialize(&Vec::<f64>::new()).unwrap();
        assert!(bincode::deserialize::<TimeSeries>(&bytes).is_err());
    }
}
