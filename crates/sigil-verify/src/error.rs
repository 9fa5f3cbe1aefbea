use std::path::PathBuf;

use sigil_dtw::{DbaError, DtwError, StabilityError};

use crate::channel::Channel;

/// Errors from signer-model training, verification, and persistence.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Returned when a classifier is configured with no channels.
    #[error("at least one channel must be examined")]
    EmptyChannelSet,

    /// Returned when the same channel is configured twice.
    #[error("channel {channel} is configured more than once")]
    DuplicateChannel {
        /// The repeated channel.
        channel: Channel,
    },

    /// Returned when a channel name does not match any known channel.
    #[error("unknown channel name \"{name}\"")]
    UnknownChannel {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when a sample lacks a channel the classifier examines.
    #[error("sample {sample_id} has no {channel} channel")]
    MissingChannel {
        /// Identifier of the offending sample.
        sample_id: String,
        /// The channel that was requested.
        channel: Channel,
    },

    /// Returned when training is attempted without any reference samples.
    #[error("signer {signer} has no reference samples to train on")]
    NoReferences {
        /// Identifier of the signer being trained.
        signer: String,
    },

    /// Returned when a sampler yields references from more than one signer.
    #[error("reference {sample_id} belongs to signer {got}, expected {expected}")]
    MixedSigners {
        /// Signer of the first reference.
        expected: String,
        /// Signer of the offending reference.
        got: String,
        /// Identifier of the offending reference.
        sample_id: String,
    },

    /// Returned when equal-error-rate calibration lacks genuine or forged samples.
    #[error(
        "equal-error-rate calibration needs genuine and forged samples, got {genuine} genuine and {forged} forged"
    )]
    InsufficientEvaluationSamples {
        /// Number of genuine evaluation samples provided.
        genuine: usize,
        /// Number of forged evaluation samples provided.
        forged: usize,
    },

    /// Returned when a calibration sample carries no genuine/forged label.
    #[error("evaluation sample {sample_id} has unknown origin")]
    UnlabeledSample {
        /// Identifier of the offending sample.
        sample_id: String,
    },

    /// Returned when a threshold strategy parameter is negative or not finite.
    #[error("threshold parameter {name} must be finite and non-negative, got {value}")]
    InvalidThresholdParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Returned when a model does not fit the classifier or is internally inconsistent.
    #[error("model mismatch: {reason}")]
    ModelMismatch {
        /// Human-readable description of the inconsistency.
        reason: String,
    },

    /// Wraps a series or distance error.
    #[error(transparent)]
    Dtw(#[from] DtwError),

    /// Wraps a template-averaging error.
    #[error("template construction failed: {0}")]
    Dba(#[from] DbaError),

    /// Wraps a stability-estimation error.
    #[error("stability estimation failed: {0}")]
    Stability(#[from] StabilityError),

    /// Returned when model serialization fails.
    #[error("failed to serialize model")]
    SerializeModel {
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when model deserialization fails.
    #[error("failed to deserialize model from {path}")]
    DeserializeModel {
        /// Path to the model file that could not be deserialized.
        path: PathBuf,
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when writing the model file fails.
    #[error("failed to write model to {path}")]
    WriteModel {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading the model file fails.
    #[error("failed to read model from {path}")]
    ReadModel {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when loading a model with an incompatible format version.
    #[error("incompatible model version in {path}: expected {expected}, found {found}")]
    IncompatibleModelVersion {
        /// The model format version this build expects.
        expected: u32,
        /// The model format version found in the file.
        found: u32,
        /// Path to the model file with the incompatible version.
        path: PathBuf,
    },
}
