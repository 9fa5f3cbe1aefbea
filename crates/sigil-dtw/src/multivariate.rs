//! Fixed-dimension multivariate series over named channels.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DtwError;
use crate::series::{TimeSeries, validate};

/// How to treat channels of differing length when building a [`MultivariateSeries`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelLengthPolicy {
    /// Reject channels whose length differs from the first channel.
    #[default]
    Strict,

    /// Pad shorter channels with their last value up to the longest channel.
    ///
    /// Reproduces a legacy repair for feature extractors that drop edge
    /// samples on derivative channels. Each padded channel logs a warning.
    RepeatLast,
}

/// A multivariate series of `dimension()` named channels, each `len()` samples long.
///
/// Values are stored time-major, so the column at time `t` (one value per
/// channel) is a contiguous slice. Immutable after construction; decoding
/// re-checks the same shape rules as [`MultivariateSeries::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMultivariateSeries")]
pub struct MultivariateSeries {
    names: Vec<String>,
    data: Vec<f64>,
}

/// Undecoded wire shape of [`MultivariateSeries`].
#[derive(Deserialize)]
struct RawMultivariateSeries {
    names: Vec<String>,
    data: Vec<f64>,
}

impl TryFrom<RawMultivariateSeries> for MultivariateSeries {
    type Error = DtwError;

    fn try_from(raw: RawMultivariateSeries) -> Result<Self, Self::Error> {
        let RawMultivariateSeries { names, data } = raw;
        if names.is_empty() {
            return Err(DtwError::NoChannels);
        }
        if let Some(name) = names
            .iter()
            .enumerate()
            .find_map(|(i, name)| names[..i].contains(name).then_some(name))
        {
            return Err(DtwError::DuplicateChannel { name: name.clone() });
        }
        validate(&data)?;
        if data.len() % names.len() != 0 {
            return Err(DtwError::RaggedData {
                len: data.len(),
                dimension: names.len(),
            });
        }
        Ok(Self { names, data })
    }
}

impl MultivariateSeries {
    /// Build a series from `(name, values)` channels, requiring equal lengths.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::NoChannels`] | `channels` is empty |
    /// | [`DtwError::EmptySeries`] | A channel has no values |
    /// | [`DtwError::NonFiniteValue`] | A channel holds NaN or infinity |
    /// | [`DtwError::DuplicateChannel`] | Two channels share a name |
    /// | [`DtwError::ChannelLengthMismatch`] | Channel lengths differ |
    pub fn new<N: Into<String>>(channels: Vec<(N, Vec<f64>)>) -> Result<Self, DtwError> {
        Self::with_policy(channels, ChannelLengthPolicy::Strict)
    }

    /// Build a series from `(name, values)` channels under an explicit length policy.
    ///
    /// # Errors
    ///
    /// Same as [`MultivariateSeries::new`]; [`DtwError::ChannelLengthMismatch`]
    /// is only returned under [`ChannelLengthPolicy::Strict`].
    pub fn with_policy<N: Into<String>>(
        channels: Vec<(N, Vec<f64>)>,
        policy: ChannelLengthPolicy,
    ) -> Result<Self, DtwError> {
        if channels.is_empty() {
            return Err(DtwError::NoChannels);
        }

        let mut names: Vec<String> = Vec::with_capacity(channels.len());
        let mut values: Vec<Vec<f64>> = Vec::with_capacity(channels.len());
        for (name, channel) in channels {
            let name = name.into();
            validate(&channel)?;
            if names.contains(&name) {
                return Err(DtwError::DuplicateChannel { name });
            }
            names.push(name);
            values.push(channel);
        }

        let len = match policy {
            ChannelLengthPolicy::Strict => {
                let expected = values[0].len();
                if let Some((i, c)) = values.iter().enumerate().find(|(_, c)| c.len() != expected) {
                    return Err(DtwError::ChannelLengthMismatch {
                        name: names[i].clone(),
                        expected,
                        got: c.len(),
                    });
                }
                expected
            }
            ChannelLengthPolicy::RepeatLast => {
                let longest = values.iter().map(Vec::len).max().unwrap_or(0);
                for (name, channel) in names.iter().zip(&values) {
                    if channel.len() < longest {
                        warn!(
                            channel = %name,
                            len = channel.len(),
                            padded_to = longest,
                            "padding short channel with its last value"
                        );
                    }
                }
                longest
            }
        };

        let dim = names.len();
        let mut data = Vec::with_capacity(len * dim);
        for t in 0..len {
            for channel in &values {
                // Channels are non-empty, so `last()` always exists.
                let v = channel.get(t).or_else(|| channel.last()).copied().unwrap_or(0.0);
                data.push(v);
            }
        }

        Ok(Self { names, data })
    }

    /// Wrap a single univariate series as a one-channel multivariate series.
    #[must_use]
    pub fn from_series(name: impl Into<String>, series: TimeSeries) -> Self {
        Self {
            names: vec![name.into()],
            data: series.into_inner(),
        }
    }

    /// Assemble from validated parts. `data` is time-major with `names.len()` values per step.
    pub(crate) fn from_raw(names: Vec<String>, data: Vec<f64>) -> Self {
        debug_assert!(!names.is_empty());
        debug_assert!(!data.is_empty() && data.len() % names.len() == 0);
        Self { names, data }
    }

    /// Return the number of time steps `T`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.names.len()
    }

    /// Always `false` for a constructed series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of channels `d`.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.names.len()
    }

    /// Return the channel names in storage order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Return the position of the channel called `name`.
    #[must_use]
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Return the column (one value per channel) at time `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t >= len()`.
    #[must_use]
    pub fn column(&self, t: usize) -> &[f64] {
        let d = self.dimension();
        &self.data[t * d..(t + 1) * d]
    }

    /// Iterate over all columns in time order.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dimension())
    }

    /// Return the value of channel `channel` at time `t`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= dimension()` or `t >= len()`.
    #[must_use]
    pub fn value(&self, channel: usize, t: usize) -> f64 {
        assert!(channel < self.dimension(), "channel index {channel} out of bounds");
        self.data[t * self.dimension() + channel]
    }

    /// Copy channel `channel` out as a univariate series.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= dimension()`.
    #[must_use]
    pub fn channel(&self, channel: usize) -> TimeSeries {
        assert!(channel < self.dimension(), "channel index {channel} out of bounds");
        let values = self
            .columns()
            .map(|column| column[channel])
            .collect();
        TimeSeries::new_unchecked(values)
    }

    /// Copy the channel called `name` out as a univariate series.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::UnknownChannel`] if no channel carries that name.
    pub fn channel_by_name(&self, name: &str) -> Result<TimeSeries, DtwError> {
        self.channel_index(name)
            .map(|i| self.channel(i))
            .ok_or_else(|| DtwError::UnknownChannel {
                name: name.to_string(),
            })
    }

    /// Return the raw time-major buffer.
    #[must_use]
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }
}
