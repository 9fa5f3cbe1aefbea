//! LS-DTW signer-model training and verification.

use rayon::prelude::*;
use sigil_dtw::{DtwDistance, LocalStability, MultivariateSeries, ls_dtw_distance};
use tracing::{debug, info, instrument};

use crate::config::LsDtwConfig;
use crate::error::VerifyError;
use crate::model::{CalibratedModel, SampleDistance, SignerModel, TemplateModel};
use crate::sample::{Origin, Sample};
use crate::sampler::{Partition, Sampler};
use crate::threshold::equal_error_rate;

/// Outcome of verifying one sample against a signer model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// LS-DTW distance from the template to the sample.
    pub distance: f64,
    /// The model's acceptance threshold.
    pub threshold: f64,
    /// True when `distance <= threshold`.
    pub accepted: bool,
}

impl Decision {
    /// 1.0 for an accepted sample, 0.0 for a rejected one.
    #[must_use]
    pub fn score(&self) -> f64 {
        if self.accepted { 1.0 } else { 0.0 }
    }
}

/// Trains per-signer LS-DTW models and verifies samples against them.
#[derive(Debug, Clone, Default)]
pub struct LsDtwClassifier {
    config: LsDtwConfig,
}

impl LsDtwClassifier {
    /// Create a classifier with the given configuration.
    #[must_use]
    pub fn new(config: LsDtwConfig) -> Self {
        Self { config }
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &LsDtwConfig {
        &self.config
    }

    /// Partition `samples` with `sampler` and train on the result.
    ///
    /// # Errors
    ///
    /// See [`train_partition`](Self::train_partition).
    #[instrument(skip_all, fields(n_samples = samples.len()))]
    pub fn train<S: Sampler + ?Sized>(
        &self,
        samples: &[Sample],
        sampler: &S,
    ) -> Result<SignerModel, VerifyError> {
        let partition = sampler.partition(samples);
        self.train_partition(&partition)
    }

    /// Train a signer model from an explicit partition.
    ///
    /// Builds the EB-DBA template over the references, estimates its local
    /// stability, measures the LS-DTW distance from the template to every
    /// reference, and sets the threshold with the configured strategy. The
    /// equal-error-rate strategy also scores every evaluation sample and keeps
    /// the per-sample distances and the error-rate curve in the model.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`VerifyError::NoReferences`] | The partition has no references |
    /// | [`VerifyError::MixedSigners`] | References come from more than one signer |
    /// | [`VerifyError::InvalidThresholdParameter`] | The strategy's parameter is invalid |
    /// | [`VerifyError::UnlabeledSample`] | Equal-error-rate calibration meets an [`Origin::Unknown`] sample |
    /// | [`VerifyError::InsufficientEvaluationSamples`] | Equal-error-rate calibration lacks genuine or forged samples |
    /// | [`VerifyError::MissingChannel`] | A sample lacks a configured channel |
    /// | [`VerifyError::Dtw`] | A channel is empty, non-finite, or of mismatched length |
    /// | [`VerifyError::Dba`] | Template construction failed |
    /// | [`VerifyError::Stability`] | Stability estimation failed |
    #[instrument(
        skip_all,
        fields(
            n_references = partition.references.len(),
            n_genuine = partition.genuine_tests.len(),
            n_forged = partition.forged_tests.len(),
            strategy = ?self.config.threshold(),
        )
    )]
    pub fn train_partition(&self, partition: &Partition<'_>) -> Result<SignerModel, VerifyError> {
        let strategy = self.config.threshold();
        strategy.validate()?;

        let Some(first) = partition.references.first() else {
            let signer = partition
                .evaluation()
                .next()
                .map(|s| s.signer().to_string())
                .unwrap_or_default();
            return Err(VerifyError::NoReferences { signer });
        };
        let signer_id = first.signer().to_string();
        if let Some(other) = partition.references.iter().find(|s| s.signer() != signer_id) {
            return Err(VerifyError::MixedSigners {
                expected: signer_id,
                got: other.signer().to_string(),
                sample_id: other.id().to_string(),
            });
        }
        if strategy.needs_evaluation_samples() {
            check_labels(partition)?;
        }

        let references = partition
            .references
            .iter()
            .map(|s| self.to_series(s))
            .collect::<Result<Vec<_>, _>>()?;

        let template = self.config.dba_config().average_multivariate(&references)?.series;
        let stability = LocalStability::estimate(&template, &references)?;
        let reference_distances = references
            .par_iter()
            .map(|r| ls_dtw_distance(&template, &stability, r).map(DtwDistance::value))
            .collect::<Result<Vec<_>, _>>()?;

        let model = match strategy.from_reference_distances(&reference_distances) {
            Some(threshold) => SignerModel::Simple(TemplateModel::new(
                signer_id,
                self.config.channels().to_vec(),
                template,
                stability,
                threshold,
                strategy,
            )),
            None => {
                let evaluation: Vec<&Sample> = partition.evaluation().collect();
                let evaluation_distances = evaluation
                    .par_iter()
                    .map(|s| -> Result<SampleDistance, VerifyError> {
                        let series = self.to_series(s)?;
                        let distance = ls_dtw_distance(&template, &stability, &series)?.value();
                        Ok(SampleDistance {
                            sample_id: s.id().to_string(),
                            origin: s.origin(),
                            distance,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let (genuine, forged) = split_by_origin(&evaluation_distances);
                let eer = equal_error_rate(&genuine, &forged)?;
                let base = TemplateModel::new(
                    signer_id,
                    self.config.channels().to_vec(),
                    template,
                    stability,
                    eer.threshold,
                    strategy,
                );
                SignerModel::Calibrated(CalibratedModel::new(
                    base,
                    reference_distances,
                    evaluation_distances,
                    eer.rate,
                    eer.curve,
                ))
            }
        };

        info!(
            signer = model.signer_id(),
            template_len = model.template().len(),
            mean_stability = model.stability().mean(),
            threshold = model.threshold(),
            strategy = ?strategy,
            "signer model trained"
        );
        Ok(model)
    }

    /// Verify `sample` against `model`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`VerifyError::ModelMismatch`] | The model was built over other channels or is inconsistent |
    /// | [`VerifyError::MissingChannel`] | The sample lacks a model channel |
    /// | [`VerifyError::Dtw`] | A channel is empty, non-finite, or of mismatched length |
    #[instrument(skip_all, fields(signer = model.signer_id(), sample = sample.id()))]
    pub fn test(&self, model: &SignerModel, sample: &Sample) -> Result<Decision, VerifyError> {
        if model.channels() != self.config.channels() {
            return Err(VerifyError::ModelMismatch {
                reason: format!(
                    "model channels {:?} differ from classifier channels {:?}",
                    model.channels(),
                    self.config.channels()
                ),
            });
        }
        model.check_consistency()?;

        let series = self.to_series(sample)?;
        let distance = ls_dtw_distance(model.template(), model.stability(), &series)?.value();
        let threshold = model.threshold();
        let decision = Decision {
            distance,
            threshold,
            accepted: distance <= threshold,
        };
        debug!(distance, threshold, accepted = decision.accepted, "sample verified");
        Ok(decision)
    }

    fn to_series(&self, sample: &Sample) -> Result<MultivariateSeries, VerifyError> {
        sample.to_series(self.config.channels(), self.config.length_policy())
    }
}

/// Reject unlabelled evaluation samples and one-sided evaluation sets.
fn check_labels(partition: &Partition<'_>) -> Result<(), VerifyError> {
    if let Some(s) = partition.evaluation().find(|s| s.origin() == Origin::Unknown) {
        return Err(VerifyError::UnlabeledSample {
            sample_id: s.id().to_string(),
        });
    }
    let genuine = partition
        .evaluation()
        .filter(|s| s.origin() == Origin::Genuine)
        .count();
    let forged = partition
        .evaluation()
        .filter(|s| s.origin() == Origin::Forged)
        .count();
    if genuine == 0 || forged == 0 {
        return Err(VerifyError::InsufficientEvaluationSamples { genuine, forged });
    }
    Ok(())
}

fn split_by_origin(distances: &[SampleDistance]) -> (Vec<f64>, Vec<f64>) {
    let mut genuine = Vec::new();
    let mut forged = Vec::new();
    for d in distances {
        match d.origin {
            Origin::Genuine => genuine.push(d.distance),
            Origin::Forged => forged.push(d.distance),
            Origin::Unknown => {}
        }
    }
    (genuine, forged)
}
