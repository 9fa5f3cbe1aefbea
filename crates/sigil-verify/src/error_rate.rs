//! False-acceptance and false-rejection rates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verification error rates at one decision threshold.
///
/// A sample is accepted when its distance is at most the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorRate {
    /// Fraction of forged samples accepted. 0.0 if there are no forged samples.
    pub far: f64,
    /// Fraction of genuine samples rejected. 0.0 if there are no genuine samples.
    pub frr: f64,
}

impl ErrorRate {
    /// Compute the rates a threshold produces on labelled distances.
    #[must_use]
    pub fn at_threshold(threshold: f64, genuine: &[f64], forged: &[f64]) -> Self {
        let false_rejects = genuine.iter().filter(|&&d| d > threshold).count();
        let false_accepts = forged.iter().filter(|&&d| d <= threshold).count();
        Self {
            far: fraction(false_accepts, forged.len()),
            frr: fraction(false_rejects, genuine.len()),
        }
    }

    /// Average error rate: the mean of FAR and FRR.
    #[must_use]
    pub fn average(&self) -> f64 {
        (self.far + self.frr) / 2.0
    }
}

fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

impl fmt::Display for ErrorRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FAR {:.2}% FRR {:.2}% AER {:.2}%",
            self.far * 100.0,
            self.frr * 100.0,
            self.average() * 100.0
        )
    }
}

/// One point of an error-rate curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorRatePoint {
    /// The candidate threshold.
    pub threshold: f64,
    /// Rates produced by that threshold.
    pub rate: ErrorRate,
}
