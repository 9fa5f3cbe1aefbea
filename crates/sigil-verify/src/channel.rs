//! Signature channels examined by the classifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// One per-sample numeric channel of an online signature.
///
/// Channels are derived upstream from pen coordinates and pressure; this
/// crate only consumes the resulting sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// X coordinate after centroid and extent normalization.
    NormalizedX,
    /// Y coordinate after centroid and extent normalization.
    NormalizedY,
    /// Pen pressure.
    PenPressure,
    /// Angle of the path tangent.
    PathTangentAngle,
    /// Magnitude of the pen velocity.
    PathVelocityMagnitude,
    /// Logarithm of the path curvature radius.
    LogCurvatureRadius,
    /// Magnitude of the total pen acceleration.
    TotalAccelerationMagnitude,
}

impl Channel {
    /// Every channel, in the order the classifier examines them by default.
    pub const ALL: [Self; 7] = [
        Self::NormalizedX,
        Self::NormalizedY,
        Self::PenPressure,
        Self::PathTangentAngle,
        Self::PathVelocityMagnitude,
        Self::LogCurvatureRadius,
        Self::TotalAccelerationMagnitude,
    ];

    /// Stable name used for multivariate series columns and diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NormalizedX => "normalized_x",
            Self::NormalizedY => "normalized_y",
            Self::PenPressure => "pen_pressure",
            Self::PathTangentAngle => "path_tangent_angle",
            Self::PathVelocityMagnitude => "path_velocity_magnitude",
            Self::LogCurvatureRadius => "log_curvature_radius",
            Self::TotalAccelerationMagnitude => "total_acceleration_magnitude",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| VerifyError::UnknownChannel { name: s.to_string() })
    }
}
