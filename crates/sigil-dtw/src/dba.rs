//! EB-DBA: Euclidean-barycenter-seeded DTW Barycenter Averaging.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cost::PointCost;
use crate::dtw::Dtw;
use crate::error::DbaError;
use crate::multivariate::MultivariateSeries;
use crate::resample::resample_columns;
use crate::series::{TimeSeries, TimeSeriesView};

/// How multivariate references are averaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarycenterMode {
    /// Align whole columns and refine every channel from the same warping paths.
    #[default]
    Joint,

    /// Average each channel independently as a univariate series, then reassemble.
    PerChannel,
}

/// Configuration for EB-DBA barycenter computation.
///
/// # Defaults
///
/// | Parameter    | Default                  |
/// |--------------|--------------------------|
/// | `iterations` | 10                       |
/// | `point_cost` | [`PointCost::Squared`]   |
/// | `mode`       | [`BarycenterMode::Joint`] |
#[derive(Debug, Clone)]
pub struct EbDbaConfig {
    iterations: usize,
    point_cost: PointCost,
    mode: BarycenterMode,
}

impl Default for EbDbaConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EbDbaConfig {
    /// Create a configuration with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            iterations: 10,
            point_cost: PointCost::Squared,
            mode: BarycenterMode::Joint,
        }
    }

    /// Set the number of refinement iterations. The loop always runs exactly this many times.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the per-step cost used when aligning the barycenter with each reference.
    #[must_use]
    pub fn with_point_cost(mut self, point_cost: PointCost) -> Self {
        self.point_cost = point_cost;
        self
    }

    /// Set how multivariate references are averaged.
    #[must_use]
    pub fn with_mode(mut self, mode: BarycenterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Return the number of refinement iterations.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Return the per-step alignment cost.
    #[must_use]
    pub fn point_cost(&self) -> PointCost {
        self.point_cost
    }

    /// Return the multivariate averaging mode.
    #[must_use]
    pub fn mode(&self) -> BarycenterMode {
        self.mode
    }

    /// Compute the EB-DBA barycenter of univariate references.
    ///
    /// The barycenter has the rounded mean length of the references. It is
    /// seeded with the pointwise mean of the references resampled to that
    /// length, then refined by aligning it with every unresampled reference and
    /// replacing each position with the mean of the values aligned to it.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DbaError::EmptyReferenceSet`] | `references` is empty |
    #[instrument(skip(self, references), fields(n = references.len(), iterations = self.iterations))]
    pub fn average(&self, references: &[TimeSeriesView<'_>]) -> Result<DbaResult, DbaError> {
        if references.is_empty() {
            return Err(DbaError::EmptyReferenceSet);
        }
        let flat: Vec<&[f64]> = references.iter().map(TimeSeriesView::as_slice).collect();
        let refined = refine(&flat, 1, self.iterations, self.point_cost);
        Ok(DbaResult {
            centroid: TimeSeries::new_unchecked(refined.data),
            iterations: self.iterations,
            final_delta: refined.final_delta,
        })
    }

    /// Compute the EB-DBA barycenter of multivariate references.
    ///
    /// All references must carry the same channels in the same order. See
    /// [`BarycenterMode`] for how channels are combined.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DbaError::EmptyReferenceSet`] | `references` is empty |
    /// | [`DbaError::DimensionMismatch`] | A reference has a different channel count |
    /// | [`DbaError::ChannelMismatch`] | A reference names its channels differently |
    #[instrument(
        skip(self, references),
        fields(n = references.len(), iterations = self.iterations, mode = ?self.mode)
    )]
    pub fn average_multivariate(
        &self,
        references: &[MultivariateSeries],
    ) -> Result<Barycenter, DbaError> {
        let first = references.first().ok_or(DbaError::EmptyReferenceSet)?;
        let dim = first.dimension();
        for (index, reference) in references.iter().enumerate().skip(1) {
            if reference.dimension() != dim {
                return Err(DbaError::DimensionMismatch {
                    index,
                    expected: dim,
                    got: reference.dimension(),
                });
            }
            if let Some((expected, got)) = first
                .names()
                .iter()
                .zip(reference.names())
                .find(|(a, b)| a != b)
            {
                return Err(DbaError::ChannelMismatch {
                    index,
                    expected: expected.clone(),
                    got: got.clone(),
                });
            }
        }

        let names = first.names().to_vec();
        let refined = match self.mode {
            BarycenterMode::Joint => {
                let flat: Vec<&[f64]> = references.iter().map(MultivariateSeries::as_flat).collect();
                refine(&flat, dim, self.iterations, self.point_cost)
            }
            BarycenterMode::PerChannel => {
                let mut channels = Vec::with_capacity(dim);
                for f in 0..dim {
                    let series: Vec<TimeSeries> = references.iter().map(|r| r.channel(f)).collect();
                    let flat: Vec<&[f64]> = series.iter().map(AsRef::as_ref).collect();
                    channels.push(refine(&flat, 1, self.iterations, self.point_cost));
                }
                interleave(&channels)
            }
        };

        Ok(Barycenter {
            series: MultivariateSeries::from_raw(names, refined.data),
            iterations: self.iterations,
            final_delta: refined.final_delta,
        })
    }
}

/// Result of a univariate EB-DBA computation.
#[derive(Debug, Clone)]
pub struct DbaResult {
    /// The refined barycenter.
    pub centroid: TimeSeries,
    /// Number of refinement iterations performed.
    pub iterations: usize,
    /// Largest absolute change of any position in the last iteration (0 if none ran).
    pub final_delta: f64,
}

/// Result of a multivariate EB-DBA computation.
#[derive(Debug, Clone)]
pub struct Barycenter {
    /// The refined barycenter, carrying the references' channel names.
    pub series: MultivariateSeries,
    /// Number of refinement iterations performed.
    pub iterations: usize,
    /// Largest absolute change of any value in the last iteration (0 if none ran).
    pub final_delta: f64,
}

/// Time-major barycenter values with the last iteration's largest change.
struct Refined {
    data: Vec<f64>,
    final_delta: f64,
}

/// Run EB-DBA over time-major buffers of `dim` channels. `references` must be non-empty.
fn refine(references: &[&[f64]], dim: usize, iterations: usize, point_cost: PointCost) -> Refined {
    let n_refs = references.len();
    let total_steps: usize = references.iter().map(|r| r.len() / dim).sum();
    let len = ((total_steps as f64 / n_refs as f64).round() as usize).max(1);

    // Seed: pointwise mean of the references resampled to the mean length.
    let resampled: Vec<Vec<f64>> = references
        .par_iter()
        .map(|r| resample_columns(r, dim, len))
        .collect();
    let mut barycenter = vec![0.0; len * dim];
    for r in &resampled {
        for (b, v) in barycenter.iter_mut().zip(r) {
            *b += v;
        }
    }
    for b in &mut barycenter {
        *b /= n_refs as f64;
    }

    let dtw = Dtw::new(point_cost.column_fn());
    let mut final_delta = 0.0;

    for iteration in 0..iterations {
        let columns: Vec<&[f64]> = barycenter.chunks_exact(dim).collect();

        // Each reference accumulates into its own buffers; the merge below runs
        // in reference order so the result does not depend on scheduling.
        let partials: Vec<Associations> = references
            .par_iter()
            .map(|reference| {
                let target: Vec<&[f64]> = reference.chunks_exact(dim).collect();
                let path = dtw.align(&columns, &target).into_path();
                let mut assoc = Associations::new(len, dim);
                for step in &path {
                    assoc.push(step.source, target[step.target]);
                }
                assoc
            })
            .collect();

        let mut merged = Associations::new(len, dim);
        for partial in &partials {
            merged.merge(partial);
        }

        final_delta = merged.apply(&mut barycenter);
        debug!(iteration = iteration + 1, delta = final_delta, "EB-DBA iteration complete");
    }

    Refined {
        data: barycenter,
        final_delta,
    }
}

/// Per-position sums and counts of the reference values aligned to each barycenter position.
struct Associations {
    dim: usize,
    sums: Vec<f64>,
    counts: Vec<usize>,
}

impl Associations {
    fn new(len: usize, dim: usize) -> Self {
        Self {
            dim,
            sums: vec![0.0; len * dim],
            counts: vec![0; len],
        }
    }

    fn push(&mut self, position: usize, column: &[f64]) {
        self.counts[position] += 1;
        let start = position * self.dim;
        for (s, v) in self.sums[start..start + self.dim].iter_mut().zip(column) {
            *s += v;
        }
    }

    fn merge(&mut self, other: &Self) {
        for (s, o) in self.sums.iter_mut().zip(&other.sums) {
            *s += o;
        }
        for (c, o) in self.counts.iter_mut().zip(&other.counts) {
            *c += o;
        }
    }

    /// Replace each associated position with its mean and return the largest change.
    ///
    /// A position nothing aligned to keeps its previous value.
    fn apply(&self, barycenter: &mut [f64]) -> f64 {
        let mut delta = 0.0_f64;
        for (t, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            for f in 0..self.dim {
                let i = t * self.dim + f;
                let mean = self.sums[i] / count as f64;
                delta = delta.max((mean - barycenter[i]).abs());
                barycenter[i] = mean;
            }
        }
        delta
    }
}

/// Interleave per-channel univariate results into one time-major buffer.
fn interleave(channels: &[Refined]) -> Refined {
    let dim = channels.len();
    let len = channels[0].data.len();
    let mut data = Vec::with_capacity(len * dim);
    for t in 0..len {
        for channel in channels {
            data.push(channel.data[t]);
        }
    }
    let final_delta = channels.iter().map(|c| c.final_delta).fold(0.0, f64::max);
    Refined { data, final_delta }
}
