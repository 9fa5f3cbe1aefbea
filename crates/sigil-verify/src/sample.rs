//! Signature samples: labelled bundles of channel sequences.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigil_dtw::{ChannelLengthPolicy, MultivariateSeries};

use crate::channel::Channel;
use crate::error::VerifyError;

/// Whether a sample was produced by its claimed signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Written by the claimed signer.
    Genuine,
    /// Written by someone imitating the claimed signer.
    Forged,
    /// Not labelled. Usable as a reference or test input, not for calibration.
    Unknown,
}

/// One signature: its identity, claimed signer, label, and channel sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    id: String,
    signer: String,
    origin: Origin,
    channels: BTreeMap<Channel, Vec<f64>>,
}

impl Sample {
    /// Create a sample with no channels attached.
    #[must_use]
    pub fn new(id: impl Into<String>, signer: impl Into<String>, origin: Origin) -> Self {
        Self {
            id: id.into(),
            signer: signer.into(),
            origin,
            channels: BTreeMap::new(),
        }
    }

    /// Attach (or replace) a channel sequence.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel, values: Vec<f64>) -> Self {
        self.channels.insert(channel, values);
        self
    }

    /// Return the sample identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return the claimed signer identifier.
    #[must_use]
    pub fn signer(&self) -> &str {
        &self.signer
    }

    /// Return the genuine/forged label.
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Return the values of `channel`, if present.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> Option<&[f64]> {
        self.channels.get(&channel).map(Vec::as_slice)
    }

    /// Iterate over the channels this sample carries, in [`Channel`] order.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.channels.keys().copied()
    }

    /// Assemble the listed channels, in order, into a multivariate series.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`VerifyError::MissingChannel`] | A listed channel is absent from the sample |
    /// | [`VerifyError::Dtw`] | A channel is empty, non-finite, or differs in length under [`ChannelLengthPolicy::Strict`] |
    pub fn to_series(
        &self,
        channels: &[Channel],
        policy: ChannelLengthPolicy,
    ) -> Result<MultivariateSeries, VerifyError> {
        let columns = channels
            .iter()
            .map(|&channel| {
                self.channels
                    .get(&channel)
                    .map(|values| (channel.name(), values.clone()))
                    .ok_or_else(|| VerifyError::MissingChannel {
                        sample_id: self.id.clone(),
                        channel,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MultivariateSeries::with_policy(columns, policy)?)
    }
}
