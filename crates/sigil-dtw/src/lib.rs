//! DTW alignment, EB-DBA barycenters, and locally-weighted DTW.
//!
//! Pure math library with no I/O. Provides full-matrix Dynamic Time Warping
//! with warping-path recovery, univariate and multivariate series types,
//! Euclidean-barycenter-seeded DBA averaging, a local-stability estimator
//! over template positions, and the stability-weighted LS-DTW distance.

mod cost;
mod dba;
mod distance;
mod dtw;
mod error;
mod lsdtw;
mod matrix;
mod multivariate;
mod path;
mod resample;
mod series;
mod stability;

pub use cost::{PointCost, euclidean, squared_euclidean};
pub use dba::{Barycenter, BarycenterMode, DbaResult, EbDbaConfig};
pub use distance::DtwDistance;
pub use dtw::{Alignment, Dtw};
pub use error::{DbaError, DtwError, StabilityError};
pub use lsdtw::ls_dtw_distance;
pub use matrix::CostMatrix;
pub use multivariate::{ChannelLengthPolicy, MultivariateSeries};
pub use path::{WarpingPath, WarpingStep};
pub use series::{TimeSeries, TimeSeriesView};
pub use stability::LocalStability;
