//! Configuration builder for LS-DTW signer models.

use sigil_dtw::{BarycenterMode, ChannelLengthPolicy, EbDbaConfig, PointCost};

use crate::channel::Channel;
use crate::error::VerifyError;
use crate::threshold::ThresholdStrategy;

/// Configuration for [`LsDtwClassifier`](crate::LsDtwClassifier).
///
/// Construct via [`LsDtwConfig::new`] (or [`Default`] for every channel),
/// then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter         | Default                                |
/// |-------------------|----------------------------------------|
/// | `channels`        | [`Channel::ALL`]                       |
/// | `dba_iterations`  | 10                                     |
/// | `point_cost`      | [`PointCost::Squared`]                 |
/// | `barycenter_mode` | [`BarycenterMode::Joint`]              |
/// | `threshold`       | [`ThresholdStrategy::EqualErrorRate`]  |
/// | `length_policy`   | [`ChannelLengthPolicy::Strict`]        |
#[derive(Debug, Clone)]
pub struct LsDtwConfig {
    channels: Vec<Channel>,
    dba_iterations: usize,
    point_cost: PointCost,
    barycenter_mode: BarycenterMode,
    threshold: ThresholdStrategy,
    length_policy: ChannelLengthPolicy,
}

impl Default for LsDtwConfig {
    fn default() -> Self {
        Self::with_defaults(Channel::ALL.to_vec())
    }
}

impl LsDtwConfig {
    /// Create a config examining `channels`, in the given order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`VerifyError::EmptyChannelSet`] | `channels` is empty |
    /// | [`VerifyError::DuplicateChannel`] | A channel is listed twice |
    pub fn new(channels: Vec<Channel>) -> Result<Self, VerifyError> {
        if channels.is_empty() {
            return Err(VerifyError::EmptyChannelSet);
        }
        for (i, channel) in channels.iter().enumerate() {
            if channels[..i].contains(channel) {
                return Err(VerifyError::DuplicateChannel { channel: *channel });
            }
        }
        Ok(Self::with_defaults(channels))
    }

    fn with_defaults(channels: Vec<Channel>) -> Self {
        Self {
            channels,
            dba_iterations: 10,
            point_cost: PointCost::Squared,
            barycenter_mode: BarycenterMode::Joint,
            threshold: ThresholdStrategy::EqualErrorRate,
            length_policy: ChannelLengthPolicy::Strict,
        }
    }

    /// Set the number of EB-DBA refinement iterations.
    #[must_use]
    pub fn with_dba_iterations(mut self, iterations: usize) -> Self {
        self.dba_iterations = iterations;
        self
    }

    /// Set the point cost used while building the template.
    #[must_use]
    pub fn with_point_cost(mut self, point_cost: PointCost) -> Self {
        self.point_cost = point_cost;
        self
    }

    /// Set how channels are combined while building the template.
    #[must_use]
    pub fn with_barycenter_mode(mut self, mode: BarycenterMode) -> Self {
        self.barycenter_mode = mode;
        self
    }

    /// Set the threshold strategy. Parameters are checked when training.
    #[must_use]
    pub fn with_threshold(mut self, threshold: ThresholdStrategy) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set how samples with unequal channel lengths are handled.
    #[must_use]
    pub fn with_length_policy(mut self, policy: ChannelLengthPolicy) -> Self {
        self.length_policy = policy;
        self
    }

    /// Return the examined channels.
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Return the EB-DBA iteration count.
    #[must_use]
    pub fn dba_iterations(&self) -> usize {
        self.dba_iterations
    }

    /// Return the template point cost.
    #[must_use]
    pub fn point_cost(&self) -> PointCost {
        self.point_cost
    }

    /// Return the barycenter mode.
    #[must_use]
    pub fn barycenter_mode(&self) -> BarycenterMode {
        self.barycenter_mode
    }

    /// Return the threshold strategy.
    #[must_use]
    pub fn threshold(&self) -> ThresholdStrategy {
        self.threshold
    }

    /// Return the channel-length policy.
    #[must_use]
    pub fn length_policy(&self) -> ChannelLengthPolicy {
        self.length_policy
    }

    pub(crate) fn dba_config(&self) -> EbDbaConfig {
        EbDbaConfig::new()
            .with_iterations(self.dba_iterations)
            .with_point_cost(self.point_cost)
            .with_mode(self.barycenter_mode)
    }
}
