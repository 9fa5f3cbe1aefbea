//! Local stability: how reliably each template position aligns one-to-one.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cost::PointCost;
use crate::dtw::Dtw;
use crate::error::{DtwError, StabilityError};
use crate::multivariate::MultivariateSeries;

/// Per-position reliability weights for a template, each in `[0, 1]`.
///
/// Position `j` is a *direct matching point* for a reference when the optimal
/// template-to-reference path touches `j` exactly once as a source index and
/// exactly once as a target index. The weight is the fraction of references
/// for which `j` is a direct matching point.
///
/// A stability vector belongs to the template it was estimated against and
/// has one entry per template position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct LocalStability(Vec<f64>);

impl LocalStability {
    /// Estimate stability of `template` against `references`.
    ///
    /// Each reference is aligned with the template under the squared
    /// Euclidean point cost; alignments run in parallel.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`StabilityError::EmptyReferenceSet`] | `references` is empty |
    /// | [`StabilityError::DimensionMismatch`] | A reference's channel count differs from the template's |
    #[instrument(skip_all, fields(t = template.len(), n = references.len()))]
    pub fn estimate(
        template: &MultivariateSeries,
        references: &[MultivariateSeries],
    ) -> Result<Self, StabilityError> {
        if references.is_empty() {
            return Err(StabilityError::EmptyReferenceSet);
        }
        if let Some((index, r)) = references
            .iter()
            .enumerate()
            .find(|(_, r)| r.dimension() != template.dimension())
        {
            return Err(StabilityError::DimensionMismatch {
                index,
                expected: template.dimension(),
                got: r.dimension(),
            });
        }

        let t = template.len();
        let columns: Vec<&[f64]> = template.columns().collect();
        let dtw = Dtw::new(PointCost::Squared.column_fn());

        let per_reference: Vec<Vec<bool>> = references
            .par_iter()
            .map(|reference| {
                let target: Vec<&[f64]> = reference.columns().collect();
                let path = dtw.align(&columns, &target).into_path();
                let as_source = path.source_multiplicity(t);
                let as_target = path.target_multiplicity(reference.len());
                (0..t)
                    .map(|j| as_source[j] == 1 && as_target.get(j).copied() == Some(1))
                    .collect()
            })
            .collect();

        let mut dmp_counts = vec![0_usize; t];
        for flags in &per_reference {
            for (count, &dmp) in dmp_counts.iter_mut().zip(flags) {
                *count += usize::from(dmp);
            }
        }

        let n = references.len() as f64;
        let values: Vec<f64> = dmp_counts.into_iter().map(|c| c as f64 / n).collect();
        let stability = Self(values);
        debug!(mean = stability.mean(), "local stability estimated");
        Ok(stability)
    }

    /// Wrap precomputed weights.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::InvalidStability`] if any weight is non-finite or
    /// outside `[0, 1]`.
    pub fn from_values(values: Vec<f64>) -> Result<Self, DtwError> {
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(DtwError::InvalidStability { index, value });
        }
        Ok(Self(values))
    }

    /// Return the weights as a slice.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Return the weight at template position `j`, if present.
    #[must_use]
    pub fn get(&self, j: usize) -> Option<f64> {
        self.0.get(j).copied()
    }

    /// Return the number of template positions covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the mean weight, or 0 for an empty vector.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }
}

impl TryFrom<Vec<f64>> for LocalStability {
    type Error = DtwError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uni(values: Vec<f64>) -> MultivariateSeries {
        MultivariateSeries::new(vec![("x", values)]).unwrap()
    }

    #[test]
    fn identical_references_are_fully_stable() {
        let template = uni(vec![1.0, 4.0, 2.0, 8.0]);
        let refs = vec![template.clone(), template.clone(), template.clone()];
        let stability = LocalStability::estimate(&template, &refs).unwrap();
        assert_eq!(stability.values(), &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(stability.mean(), 1.0);
    }

    #[test]
    fn stretched_reference_breaks_direct_matching() {
        // The reference repeats the second value, so template position 1 maps
        // to two reference positions.
        let template = uni(vec![0.0, 5.0, 10.0]);
        let stretched = uni(vec![0.0, 5.0, 5.0, 10.0]);
        let stability =
            LocalStability::estimate(&template, &[template.clone(), stretched]).unwrap();
        assert_eq!(stability.get(0), Some(1.0));
        assert_eq!(stability.get(1), Some(0.5));
        assert_eq!(stability.len(), 3);
    }

    #[test]
    fn weights_stay_in_unit_interval() {
        let template = uni(vec![0.0, 1.0, 3.0, 2.0, 0.5]);
        let refs = vec![
            uni(vec![0.0, 0.0, 1.0, 3.0, 2.0, 0.5]),
            uni(vec![0.2, 1.1, 2.9, 0.4]),
            uni(vec![0.0, 1.0, 3.0, 2.0, 0.5]),
        ];
        let stability = LocalStability::estimate(&template, &refs).unwrap();
        assert_eq!(stability.len(), template.len());
        assert!(stability.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn empty_references_error() {
        let template = uni(vec![1.0]);
        assert!(matches!(
            LocalStability::estimate(&template, &[]),
            Err(StabilityError::EmptyReferenceSet)
        ));
    }

    #[test]
    fn dimension_mismatch_error() {
        let template = uni(vec![1.0, 2.0]);
        let two = MultivariateSeries::new(vec![("x", vec![1.0, 2.0]), ("y", vec![0.0, 0.0])]).unwrap();
        let err = LocalStability::estimate(&template, &[template.clone(), two]).unwrap_err();
        assert!(matches!(err, StabilityError::DimensionMismatch { index: 1, expected: 1, got: 2 }));
    }

    #[test]
    fn from_values_validates_range() {
        assert!(LocalStability::from_values(vec![0.0, 0.5, 1.0]).is_ok());
        assert!(matches!(
            LocalStability::from_values(vec![0.5, 1.5]),
            Err(DtwError::InvalidStability { index: 1, .. })
        ));
        assert!(LocalStability::from_values(vec![f64::NAN]).is_err());
    }

    #[test]
    fn decode_validates_range() {
        let bytes = bincode::serialize(&vec![0.5, 1.5]).unwrap();
        assert!(bincode::deserialize::<LocalStability>(&bytes).is_err());
        let bytes = bincode::serialize(&vec![0.5, 1.0]).unwrap();
        let stability: LocalStability = bincode::deserialize(&bytes).unwrap();
        assert_eq!(stability.values(), &[0.5, 1.0]);
    }
}
