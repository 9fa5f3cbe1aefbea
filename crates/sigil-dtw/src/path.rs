//! Warping path types for DTW alignment.

/// One aligned index pair: position `source` of the first sequence matched
/// with position `target` of the second. Indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarpingStep {
    /// Index in the source (row) sequence.
    pub source: usize,
    /// Index in the target (column) sequence.
    pub target: usize,
}

impl WarpingStep {
    /// Construct a step from a `(source, target)` pair.
    #[must_use]
    pub const fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

/// Ordered warping steps from `(0, 0)` to `(n-1, m-1)`.
///
/// Consecutive steps advance by one in the source, the target, or both.
/// Empty when either aligned sequence was empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Count how many steps touch each source index, for a source of length `n`.
    #[must_use]
    pub fn source_multiplicity(&self, n: usize) -> Vec<usize> {
        let mut counts = vec![0; n];
        for step in &self.0 {
            if let Some(c) = counts.get_mut(step.source) {
                *c += 1;
            }
        }
        counts
    }

    /// Count how many steps touch each target index, for a target of length `m`.
    #[must_use]
    pub fn target_multiplicity(&self, m: usize) -> Vec<usize> {
        let mut counts = vec![0; m];
        for step in &self.0 {
            if let Some(c) = counts.get_mut(step.target) {
                *c += 1;
            }
        }
        counts
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
