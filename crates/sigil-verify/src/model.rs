//! Trained per-signer models.

use serde::{Deserialize, Serialize};
use sigil_dtw::{LocalStability, MultivariateSeries};

use crate::channel::Channel;
use crate::error::VerifyError;
use crate::error_rate::{ErrorRate, ErrorRatePoint};
use crate::sample::Origin;
use crate::threshold::ThresholdStrategy;

/// Template, stability weights, and threshold learned for one signer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateModel {
    signer_id: String,
    channels: Vec<Channel>,
    template: MultivariateSeries,
    stability: LocalStability,
    threshold: f64,
    strategy: ThresholdStrategy,
}

impl TemplateModel {
    pub(crate) fn new(
        signer_id: String,
        channels: Vec<Channel>,
        template: MultivariateSeries,
        stability: LocalStability,
        threshold: f64,
        strategy: ThresholdStrategy,
    ) -> Self {
        Self {
            signer_id,
            channels,
            template,
            stability,
            threshold,
            strategy,
        }
    }

    /// Return the signer this model verifies.
    #[must_use]
    pub fn signer_id(&self) -> &str {
        &self.signer_id
    }

    /// Return the channels the template was built over, in column order.
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Return the EB-DBA template.
    #[must_use]
    pub fn template(&self) -> &MultivariateSeries {
        &self.template
    }

    /// Return the per-position stability weights.
    #[must_use]
    pub fn stability(&self) -> &LocalStability {
        &self.stability
    }

    /// Return the acceptance threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Return the strategy that produced the threshold.
    #[must_use]
    pub fn strategy(&self) -> ThresholdStrategy {
        self.strategy
    }

    fn check_consistency(&self) -> Result<(), VerifyError> {
        let template = &self.template;
        if template.dimension() != self.channels.len() {
            return Err(mismatch(format!(
                "template has {} channels but the model lists {}",
                template.dimension(),
                self.channels.len()
            )));
        }
        if let Some((name, channel)) = template
            .names()
            .iter()
            .zip(&self.channels)
            .find(|(name, channel)| name.as_str() != channel.name())
        {
            return Err(mismatch(format!(
                "template column {name} does not match channel {channel}"
            )));
        }
        if template.is_empty() || template.as_flat().len() != template.len() * template.dimension() {
            return Err(mismatch("template data is malformed".to_string()));
        }
        if template.as_flat().iter().any(|v| !v.is_finite()) {
            return Err(mismatch("template holds non-finite values".to_string()));
        }
        if self.stability.len() != template.len() {
            return Err(mismatch(format!(
                "stability has {} entries but the template has {} positions",
                self.stability.len(),
                template.len()
            )));
        }
        LocalStability::from_values(self.stability.values().to_vec())?;
        if !self.threshold.is_finite() {
            return Err(mismatch(format!("threshold {} is not finite", self.threshold)));
        }
        Ok(())
    }
}

fn mismatch(reason: String) -> VerifyError {
    VerifyError::ModelMismatch { reason }
}

/// Distance from the template to one evaluation sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleDistance {
    /// Identifier of the evaluation sample.
    pub sample_id: String,
    /// Label of the evaluation sample.
    pub origin: Origin,
    /// LS-DTW distance from the template.
    pub distance: f64,
}

/// A template model whose threshold was calibrated on labelled samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibratedModel {
    base: TemplateModel,
    reference_distances: Vec<f64>,
    evaluation_distances: Vec<SampleDistance>,
    rate: ErrorRate,
    error_rates: Vec<ErrorRatePoint>,
}

impl CalibratedModel {
    pub(crate) fn new(
        base: TemplateModel,
        reference_distances: Vec<f64>,
        evaluation_distances: Vec<SampleDistance>,
        rate: ErrorRate,
        error_rates: Vec<ErrorRatePoint>,
    ) -> Self {
        Self {
            base,
            reference_distances,
            evaluation_distances,
            rate,
            error_rates,
        }
    }

    /// Return the underlying template model.
    #[must_use]
    pub fn base(&self) -> &TemplateModel {
        &self.base
    }

    /// Return the distance from the template to each reference, in reference order.
    #[must_use]
    pub fn reference_distances(&self) -> &[f64] {
        &self.reference_distances
    }

    /// Return the distance from the template to each evaluation sample.
    #[must_use]
    pub fn evaluation_distances(&self) -> &[SampleDistance] {
        &self.evaluation_distances
    }

    /// Return the error rates on the evaluation samples at the chosen threshold.
    #[must_use]
    pub fn error_rate(&self) -> ErrorRate {
        self.rate
    }

    /// Return the error rates at every candidate threshold, ascending.
    #[must_use]
    pub fn error_rates(&self) -> &[ErrorRatePoint] {
        &self.error_rates
    }
}

/// A trained signer model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignerModel {
    /// Threshold derived from reference distances or fixed.
    Simple(TemplateModel),
    /// Threshold calibrated at the equal error rate.
    Calibrated(CalibratedModel),
}

impl SignerModel {
    /// Return the template model shared by both variants.
    #[must_use]
    pub fn template_model(&self) -> &TemplateModel {
        match self {
            Self::Simple(m) => m,
            Self::Calibrated(m) => &m.base,
        }
    }

    /// Return the calibration details, if the threshold was calibrated.
    #[must_use]
    pub fn as_calibrated(&self) -> Option<&CalibratedModel> {
        match self {
            Self::Simple(_) => None,
            Self::Calibrated(m) => Some(m),
        }
    }

    /// Return the signer this model verifies.
    #[must_use]
    pub fn signer_id(&self) -> &str {
        self.template_model().signer_id()
    }

    /// Return the channels the template was built over.
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        self.template_model().channels()
    }

    /// Return the EB-DBA template.
    #[must_use]
    pub fn template(&self) -> &MultivariateSeries {
        self.template_model().template()
    }

    /// Return the per-position stability weights.
    #[must_use]
    pub fn stability(&self) -> &LocalStability {
        self.template_model().stability()
    }

    /// Return the acceptance threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.template_model().threshold()
    }

    /// Return the strategy that produced the threshold.
    #[must_use]
    pub fn strategy(&self) -> ThresholdStrategy {
        self.template_model().strategy()
    }

    /// Verify that the template, channels, and stability agree with each other.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`VerifyError::ModelMismatch`] | Dimensions, names, lengths, or values disagree |
    /// | [`VerifyError::Dtw`] | A stability weight lies outside `[0, 1]` |
    pub fn check_consistency(&self) -> Result<(), VerifyError> {
        self.template_model().check_consistency()
    }
}
