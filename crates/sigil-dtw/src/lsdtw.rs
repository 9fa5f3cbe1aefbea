//! Locally-weighted DTW distance between a template and a test series.

use tracing::instrument;

use crate::cost::squared_euclidean_unchecked;
use crate::distance::DtwDistance;
use crate::dtw::Dtw;
use crate::error::DtwError;
use crate::multivariate::MultivariateSeries;
use crate::stability::LocalStability;

/// LS-DTW distance: DTW where each step's squared Euclidean cost is scaled
/// by the stability of the template position it touches.
///
/// Positions with zero stability contribute nothing, so a test sample is
/// only penalised where the references agreed with each other.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::DimensionMismatch`] | `test` has a different channel count than `template` |
/// | [`DtwError::StabilityLengthMismatch`] | `stability.len() != template.len()` |
#[instrument(level = "trace", skip_all, fields(t = template.len(), m = test.len()))]
pub fn ls_dtw_distance(
    template: &MultivariateSeries,
    stability: &LocalStability,
    test: &MultivariateSeries,
) -> Result<DtwDistance, DtwError> {
    if test.dimension() != template.dimension() {
        return Err(DtwError::DimensionMismatch {
            expected: template.dimension(),
            got: test.dimension(),
        });
    }
    if stability.len() != template.len() {
        return Err(DtwError::StabilityLengthMismatch {
            stability: stability.len(),
            template: template.len(),
        });
    }

    let weights = stability.values();
    let source: Vec<&[f64]> = template.columns().collect();
    let target: Vec<&[f64]> = test.columns().collect();
    let dtw = Dtw::new(|a: &&[f64], b: &&[f64], i: usize| {
        weights[i] * squared_euclidean_unchecked(a, b)
    });
    Ok(dtw.distance(&source, &target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::PointCost;

    fn uni(values: Vec<f64>) -> MultivariateSeries {
        MultivariateSeries::new(vec![("x", values)]).unwrap()
    }

    #[test]
    fn full_stability_equals_plain_squared_dtw() {
        let template = uni(vec![0.0, 2.0, 1.0, 3.0]);
        let test = uni(vec![0.5, 2.5, 2.0, 0.0, 3.0]);
        let stability = LocalStability::from_values(vec![1.0; 4]).unwrap();

        let weighted = ls_dtw_distance(&template, &stability, &test).unwrap();
        let plain = Dtw::new(PointCost::Squared.scalar_fn())
            .distance(template.as_flat(), test.as_flat());
        assert_eq!(weighted, plain);
    }

    #[test]
    fn zero_stability_gives_zero_distance() {
        let template = uni(vec![0.0, 2.0, 1.0]);
        let test = uni(vec![9.0, -4.0]);
        let stability = LocalStability::from_values(vec![0.0; 3]).unwrap();
        let d = ls_dtw_distance(&template, &stability, &test).unwrap();
        assert_eq!(d.value(), 0.0);
    }

    #[test]
    fn identical_series_distance_zero() {
        let template = MultivariateSeries::new(vec![
            ("x", vec![0.0, 1.0, 2.0]),
            ("y", vec![3.0, 1.0, 0.0]),
        ])
        .unwrap();
        let stability = LocalStability::from_values(vec![0.3, 1.0, 0.6]).unwrap();
        let d = ls_dtw_distance(&template, &stability, &template).unwrap();
        assert_eq!(d.value(), 0.0);
    }

    #[test]
    fn weights_scale_per_template_position() {
        // Diagonal alignment with unit squared cost at every step.
        let template = uni(vec![0.0, 0.0, 0.0]);
        let test = uni(vec![1.0, 1.0, 1.0]);
        let stability = LocalStability::from_values(vec![0.5, 0.25, 1.0]).unwrap();
        let d = ls_dtw_distance(&template, &stability, &test).unwrap();
        assert_eq!(d.value(), 1.75);
    }

    #[test]
    fn stability_length_mismatch() {
        let template = uni(vec![0.0, 1.0]);
        let stability = LocalStability::from_values(vec![1.0]).unwrap();
        let err = ls_dtw_distance(&template, &stability, &template).unwrap_err();
        assert!(matches!(
            err,
            DtwError::StabilityLengthMismatch { stability: 1, template: 2 }
        ));
    }

    #[test]
    fn dimension_mismatch() {
        let template = uni(vec![0.0, 1.0]);
        let test = MultivariateSeries::new(vec![("x", vec![0.0]), ("y", vec![0.0])]).unwrap();
        let stability = LocalStability::from_values(vec![1.0, 1.0]).unwrap();
        assert!(matches!(
            ls_dtw_distance(&template, &stability, &test),
            Err(DtwError::DimensionMismatch { expected: 1, got: 2 })
        ));
    }
}
