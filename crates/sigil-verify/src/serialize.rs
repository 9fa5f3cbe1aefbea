//! Signer-model persistence via bincode.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::channel::Channel;
use crate::error::VerifyError;
use crate::model::SignerModel;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

/// Versioned envelope for the serialized model.
#[derive(serde::Serialize, serde::Deserialize)]
struct ModelEnvelope {
    /// Format version for compatibility checking.
    format_version: u32,
    /// Signer the model verifies.
    signer_id: String,
    /// Channels the template was built over.
    channels: Vec<Channel>,
    /// Number of template positions.
    template_len: usize,
    /// The serialized model.
    model: SignerModel,
}

impl SignerModel {
    /// Save the model to a binary file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`VerifyError::SerializeModel`] | bincode encoding failed |
    /// | [`VerifyError::WriteModel`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display(), signer = self.signer_id()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), VerifyError> {
        let path = path.as_ref();

        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            signer_id: self.signer_id().to_string(),
            channels: self.channels().to_vec(),
            template_len: self.template().len(),
            model: self.clone(),
        };

        let bytes = bincode::serialize(&envelope)
            .map_err(|e| VerifyError::SerializeModel { source: e })?;

        std::fs::write(path, &bytes).map_err(|e| VerifyError::WriteModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        info!(size_bytes = bytes.len(), "model saved");
        Ok(())
    }

    /// Load a model from a binary file.
    ///
    /// Checks the format version and the decoded model's internal consistency.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`VerifyError::ReadModel`] | file read failed |
    /// | [`VerifyError::DeserializeModel`] | bincode decoding failed |
    /// | [`VerifyError::IncompatibleModelVersion`] | format version mismatch |
    /// | [`VerifyError::ModelMismatch`] | envelope and model disagree, or the model is inconsistent |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| VerifyError::ReadModel {
            path: path.to_path_buf(),
            source: e,
        })?;

        let envelope: ModelEnvelope =
            bincode::deserialize(&bytes).map_err(|e| VerifyError::DeserializeModel {
                path: path.to_path_buf(),
                source: e,
            })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(VerifyError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: envelope.format_version,
                path: path.to_path_buf(),
            });
        }

        let model = envelope.model;
        if model.signer_id() != envelope.signer_id
            || model.channels() != envelope.channels.as_slice()
            || model.template().len() != envelope.template_len
        {
            return Err(VerifyError::ModelMismatch {
                reason: format!("envelope header disagrees with model in {}", path.display()),
            });
        }
        model.check_consistency()?;

        debug!(
            signer = model.signer_id(),
            template_len = envelope.template_len,
            n_channels = envelope.channels.len(),
            "model loaded"
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::classifier::LsDtwClassifier;
    use crate::config::LsDtwConfig;
    use crate::sample::{Origin, Sample};
    use crate::sampler::FirstNSampler;
    use crate::threshold::ThresholdStrategy;

    fn samples() -> Vec<Sample> {
        let mut out: Vec<Sample> = (0..4)
            .map(|k| {
                let eps = k as f64 * 0.01;
                Sample::new(format!("g{k}"), "u7", Origin::Genuine)
                    .with_channel(Channel::NormalizedX, vec![0.0, 1.0 + eps, 2.0, 1.5, 0.0])
                    .with_channel(Channel::PenPressure, vec![0.2, 0.6, 0.9 - eps, 0.4, 0.1])
            })
            .collect();
        out.push(
            Sample::new("f0", "u7", Origin::Forged)
                .with_channel(Channel::NormalizedX, vec![2.0, 0.0, 0.0, 3.0, 1.0])
                .with_channel(Channel::PenPressure, vec![0.9, 0.9, 0.1, 0.1, 0.9]),
        );
        out
    }

    fn classifier(strategy: ThresholdStrategy) -> LsDtwClassifier {
        LsDtwClassifier::new(
            LsDtwConfig::new(vec![Channel::NormalizedX, Channel::PenPressure])
                .unwrap()
                .with_threshold(strategy),
        )
    }

    #[test]
    fn round_trip_identical_decisions() {
        let dir = TempDir::new().unwrap();
        let samples = samples();

        for strategy in [ThresholdStrategy::Mean, ThresholdStrategy::EqualErrorRate] {
            let classifier = classifier(strategy);
            let model = classifier.train(&samples, &FirstNSampler::new(3)).unwrap();
            let model_path = dir.path().join(format!("{strategy:?}.bin"));

            model.save(&model_path).unwrap();
            let loaded = SignerModel::load(&model_path).unwrap();
            assert_eq!(loaded, model);

            for sample in &samples {
                let orig = classifier.test(&model, sample).unwrap();
                let restored = classifier.test(&loaded, sample).unwrap();
                assert_eq!(orig, restored, "decisions differ for {}", sample.id());
            }
        }
    }

    #[test]
    fn load_nonexistent_file_error() {
        let dir = TempDir::new().unwrap();
        let err = SignerModel::load(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, VerifyError::ReadModel { .. }));
    }

    #[test]
    fn load_corrupt_file_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.bin");
        std::fs::write(&path, b"not a valid bincode file").unwrap();
        let err = SignerModel::load(&path).unwrap_err();
        assert!(matches!(err, VerifyError::DeserializeModel { .. }));
    }

    #[test]
    fn load_future_version_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.bin");
        let model = classifier(ThresholdStrategy::Mean)
            .train(&samples(), &FirstNSampler::new(3))
            .unwrap();
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION + 1,
            signer_id: model.signer_id().to_string(),
            channels: model.channels().to_vec(),
            template_len: model.template().len(),
            model,
        };
        std::fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        let err = SignerModel::load(&path).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::IncompatibleModelVersion { expected: 1, found: 2, .. }
        ));
    }

    #[test]
    fn load_mismatched_header_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("header.bin");
        let model = classifier(ThresholdStrategy::Mean)
            .train(&samples(), &FirstNSampler::new(3))
            .unwrap();
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            signer_id: model.signer_id().to_string(),
            channels: vec![Channel::NormalizedX],
            template_len: model.template().len(),
            model,
        };
        std::fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        let err = SignerModel::load(&path).unwrap_err();
        assert!(matches!(err, VerifyError::ModelMismatch { .. }));
    }

    // Same wire layout as `ModelEnvelope` holding a `SignerModel::Simple`, with
    // the template shape left unchecked.
    #[derive(serde::Serialize)]
    struct RawTemplate {
        names: Vec<String>,
        data: Vec<f64>,
    }

    #[derive(serde::Serialize)]
    struct RawTemplateModel {
        signer_id: String,
        channels: Vec<Channel>,
        template: RawTemplate,
        stability: Vec<f64>,
        threshold: f64,
        strategy: ThresholdStrategy,
    }

    #[derive(serde::Serialize)]
    enum RawSignerModel {
        Simple(RawTemplateModel),
    }

    #[derive(serde::Serialize)]
    struct RawEnvelope {
        format_version: u32,
        signer_id: String,
        channels: Vec<Channel>,
        template_len: usize,
        model: RawSignerModel,
    }

    fn write_raw(path: &Path, channels: Vec<Channel>, template: RawTemplate, stability: Vec<f64>) {
        let envelope = RawEnvelope {
            format_version: FORMAT_VERSION,
            signer_id: "u7".to_string(),
            channels: channels.clone(),
            template_len: 1,
            model: RawSignerModel::Simple(RawTemplateModel {
                signer_id: "u7".to_string(),
                channels,
                template,
                stability,
                threshold: 1.0,
                strategy: ThresholdStrategy::Mean,
            }),
        };
        std::fs::write(path, bincode::serialize(&envelope).unwrap()).unwrap();
    }

    #[test]
    fn raw_envelope_matches_real_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw.bin");
        write_raw(
            &path,
            vec![Channel::NormalizedX],
            RawTemplate {
                names: vec!["normalized_x".to_string()],
                data: vec![0.5],
            },
            vec![1.0],
        );
        let model = SignerModel::load(&path).unwrap();
        assert_eq!(model.template().len(), 1);
        assert_eq!(model.threshold(), 1.0);
    }

    #[test]
    fn load_template_without_channels_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_channels.bin");
        write_raw(
            &path,
            vec![],
            RawTemplate {
                names: vec![],
                data: vec![1.0],
            },
            vec![1.0],
        );
        let err = SignerModel::load(&path).unwrap_err();
        assert!(matches!(err, VerifyError::DeserializeModel { .. }));
    }

    #[test]
    fn load_ragged_template_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ragged.bin");
        write_raw(
            &path,
            vec![Channel::NormalizedX, Channel::PenPressure],
            RawTemplate {
                names: vec!["normalized_x".to_string(), "pen_pressure".to_string()],
                data: vec![1.0, 2.0, 3.0],
            },
            vec![1.0],
        );
        let err = SignerModel::load(&path).unwrap_err();
        assert!(matches!(err, VerifyError::DeserializeModel { .. }));
    }

    #[test]
    fn load_out_of_range_stability_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stability.bin");
        write_raw(
            &path,
            vec![Channel::NormalizedX],
            RawTemplate {
                names: vec!["normalized_x".to_string()],
                data: vec![0.5],
            },
            vec![2.0],
        );
        let err = SignerModel::load(&path).unwrap_err();
        assert!(matches!(err, VerifyError::DeserializeModel { .. }));
    }
}
