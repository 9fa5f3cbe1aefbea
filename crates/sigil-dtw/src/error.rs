//! Error types for alignment, barycenter averaging, and stability estimation.

/// Errors from series construction, point costs, and LS-DTW scoring.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when an empty slice is provided as a time series or channel.
    #[error("time series must be non-empty")]
    EmptySeries,

    /// Returned when a time series contains NaN, infinity, or negative infinity.
    #[error("time series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when two multivariate points or series have different channel counts.
    #[error("dimension mismatch: expected {expected} channels, got {got}")]
    DimensionMismatch {
        /// Dimension of the left-hand operand (template side).
        expected: usize,
        /// Dimension of the right-hand operand.
        got: usize,
    },

    /// Returned when a multivariate series is built from zero channels.
    #[error("multivariate series needs at least one channel")]
    NoChannels,

    /// Returned when the same channel name appears twice in one series.
    #[error("channel \"{name}\" appears more than once")]
    DuplicateChannel {
        /// The repeated channel name.
        name: String,
    },

    /// Returned when channels of one series differ in length under the strict policy.
    #[error("channel \"{name}\" has {got} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Name of the offending channel.
        name: String,
        /// Length of the first channel.
        expected: usize,
        /// Length of the offending channel.
        got: usize,
    },

    /// Returned when decoded series data does not split evenly into columns.
    #[error("{len} values do not form columns of {dimension} channels")]
    RaggedData {
        /// Number of stored values.
        len: usize,
        /// Number of channels.
        dimension: usize,
    },

    /// Returned when a channel is looked up by a name the series does not carry.
    #[error("unknown channel \"{name}\"")]
    UnknownChannel {
        /// The requested channel name.
        name: String,
    },

    /// Returned when a stability vector does not cover every template position.
    #[error("stability vector has {stability} entries but the template has {template} positions")]
    StabilityLengthMismatch {
        /// Length of the stability vector.
        stability: usize,
        /// Length of the template.
        template: usize,
    },

    /// Returned when a stability weight lies outside `[0, 1]` or is not finite.
    #[error("stability weight {value} at position {index} is outside [0, 1]")]
    InvalidStability {
        /// Position of the offending weight.
        index: usize,
        /// The offending weight.
        value: f64,
    },
}

/// Errors from EB-DBA barycenter averaging.
#[derive(Debug, thiserror::Error)]
pub enum DbaError {
    /// Returned when averaging is requested over zero references.
    #[error("cannot compute a barycenter of an empty reference set")]
    EmptyReferenceSet,

    /// Returned when references carry different channel counts.
    #[error("reference {index} has {got} channels, expected {expected}")]
    DimensionMismatch {
        /// Zero-based index of the offending reference.
        index: usize,
        /// Channel count of the first reference.
        expected: usize,
        /// Channel count of the offending reference.
        got: usize,
    },

    /// Returned when references carry the same number of channels under different names.
    #[error("reference {index} has channel \"{got}\" where \"{expected}\" was expected")]
    ChannelMismatch {
        /// Zero-based index of the offending reference.
        index: usize,
        /// Channel name from the first reference.
        expected: String,
        /// Channel name found in the offending reference.
        got: String,
    },
}

/// Errors from local-stability estimation.
#[derive(Debug, thiserror::Error)]
pub enum StabilityError {
    /// Returned when stability is estimated against zero references.
    #[error("cannot estimate local stability without references")]
    EmptyReferenceSet,

    /// Returned when a reference has a different channel count than the template.
    #[error("reference {index} has {got} channels, template has {expected}")]
    DimensionMismatch {
        /// Zero-based index of the offending reference.
        index: usize,
        /// Channel count of the template.
        expected: usize,
        /// Channel count of the offending reference.
        got: usize,
    },
}
