//! LS-DTW signature verification: train, calibrate, verify, persist.
//!
//! Builds one model per signer from genuine reference samples: an EB-DBA
//! template over the examined channels, per-position local stability, and an
//! acceptance threshold chosen by a [`ThresholdStrategy`]. Test samples are
//! accepted when their LS-DTW distance to the template is within the
//! threshold. Models serialize with bincode.

mod channel;
mod classifier;
mod config;
mod error;
mod error_rate;
mod model;
mod sample;
mod sampler;
mod serialize;
mod threshold;

pub use channel::Channel;
pub use classifier::{Decision, LsDtwClassifier};
pub use config::LsDtwConfig;
pub use error::VerifyError;
pub use error_rate::{ErrorRate, ErrorRatePoint};
pub use model::{CalibratedModel, SampleDistance, SignerModel, TemplateModel};
pub use sample::{Origin, Sample};
pub use sampler::{FirstNSampler, Partition, Sampler};
pub use threshold::{EerCalibration, ThresholdStrategy, equal_error_rate};
