//! Decision-threshold strategies.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VerifyError;
use crate::error_rate::{ErrorRate, ErrorRatePoint};

/// How a signer model's acceptance threshold is chosen.
///
/// Reference-based strategies look only at the distances from the template
/// to its own references. [`EqualErrorRate`](Self::EqualErrorRate) also needs
/// labelled genuine and forged evaluation samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ThresholdStrategy {
    /// Mean reference distance.
    Mean,

    /// Mean reference distance plus `k` sample standard deviations.
    MeanPlusStd {
        /// Number of standard deviations above the mean.
        k: f64,
    },

    /// Largest reference distance.
    MaxReference,

    /// A constant threshold.
    Fixed(f64),

    /// The smallest candidate threshold whose FAR is at least its FRR.
    #[default]
    EqualErrorRate,
}

impl ThresholdStrategy {
    /// Return true if the strategy needs labelled evaluation samples.
    #[must_use]
    pub fn needs_evaluation_samples(self) -> bool {
        matches!(self, Self::EqualErrorRate)
    }

    /// Check the strategy's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidThresholdParameter`] if `k` or the fixed
    /// threshold is negative or not finite.
    pub fn validate(self) -> Result<(), VerifyError> {
        let (name, value) = match self {
            Self::MeanPlusStd { k } => ("k", k),
            Self::Fixed(t) => ("fixed", t),
            _ => return Ok(()),
        };
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(VerifyError::InvalidThresholdParameter { name, value })
        }
    }

    /// Threshold derived from reference distances alone.
    ///
    /// Returns `None` for [`EqualErrorRate`](Self::EqualErrorRate), which needs
    /// [`equal_error_rate`]. An empty slice yields 0 for the reference-based
    /// strategies.
    #[must_use]
    pub fn from_reference_distances(self, distances: &[f64]) -> Option<f64> {
        match self {
            Self::Mean => Some(mean(distances)),
            Self::MeanPlusStd { k } => Some(mean(distances) + k * sample_std(distances)),
            Self::MaxReference => Some(distances.iter().copied().fold(0.0, f64::max)),
            Self::Fixed(t) => Some(t),
            Self::EqualErrorRate => None,
        }
    }
}

/// Result of equal-error-rate calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct EerCalibration {
    /// The chosen threshold.
    pub threshold: f64,
    /// Error rates at the chosen threshold.
    pub rate: ErrorRate,
    /// Error rates at every candidate threshold, in ascending threshold order.
    pub curve: Vec<ErrorRatePoint>,
}

/// Pick the threshold where false acceptance first catches up with false rejection.
///
/// Candidates are 0, the midpoint between each pair of consecutive sorted
/// evaluation distances, and the largest distance plus 1. The smallest
/// candidate with FAR ≥ FRR is chosen; the last candidate always qualifies.
///
/// # Errors
///
/// Returns [`VerifyError::InsufficientEvaluationSamples`] unless both
/// `genuine` and `forged` are non-empty.
pub fn equal_error_rate(genuine: &[f64], forged: &[f64]) -> Result<EerCalibration, VerifyError> {
    if genuine.is_empty() || forged.is_empty() {
        return Err(VerifyError::InsufficientEvaluationSamples {
            genuine: genuine.len(),
            forged: forged.len(),
        });
    }

    let mut sorted: Vec<f64> = genuine.iter().chain(forged).copied().collect();
    sorted.sort_by(f64::total_cmp);

    let mut candidates = Vec::with_capacity(sorted.len() + 1);
    candidates.push(0.0);
    candidates.extend(sorted.windows(2).map(|w| (w[0] + w[1]) / 2.0));
    let max = sorted.last().copied().unwrap_or(0.0);
    candidates.push(max + 1.0);

    let curve: Vec<ErrorRatePoint> = candidates
        .into_iter()
        .map(|threshold| ErrorRatePoint {
            threshold,
            rate: ErrorRate::at_threshold(threshold, genuine, forged),
        })
        .collect();

    let chosen = curve
        .iter()
        .find(|p| p.rate.far >= p.rate.frr)
        .or(curve.last())
        .copied()
        .unwrap_or(ErrorRatePoint {
            threshold: max + 1.0,
            rate: ErrorRate { far: 1.0, frr: 0.0 },
        });

    debug!(
        threshold = chosen.threshold,
        far = chosen.rate.far,
        frr = chosen.rate.frr,
        candidates = curve.len(),
        "equal error rate calibrated"
    );

    Ok(EerCalibration {
        threshold: chosen.threshold,
        rate: chosen.rate,
        curve,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
