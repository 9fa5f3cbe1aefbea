//! Splitting a signer's samples into references and evaluation sets.

use crate::sample::{Origin, Sample};

/// A signer's samples divided by role.
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    /// Genuine samples the template is built from.
    pub references: Vec<&'a Sample>,
    /// Genuine samples held out for evaluation.
    pub genuine_tests: Vec<&'a Sample>,
    /// Forged samples held out for evaluation.
    pub forged_tests: Vec<&'a Sample>,
}

impl<'a> Partition<'a> {
    /// Iterate over every evaluation sample, genuine first.
    pub fn evaluation(&self) -> impl Iterator<Item = &'a Sample> + '_ {
        self.genuine_tests
            .iter()
            .chain(&self.forged_tests)
            .copied()
    }
}

/// Strategy for partitioning one signer's samples.
pub trait Sampler {
    /// Divide `samples` into references and evaluation sets.
    fn partition<'a>(&self, samples: &'a [Sample]) -> Partition<'a>;
}

/// Takes the first `n` genuine samples as references.
///
/// Remaining genuine samples become genuine tests and every forged sample a
/// forgery test. Samples of [`Origin::Unknown`] are not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstNSampler {
    n: usize,
}

impl Default for FirstNSampler {
    fn default() -> Self {
        Self { n: 10 }
    }
}

impl FirstNSampler {
    /// Create a sampler taking `n` references.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Return the number of references taken.
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }
}

impl Sampler for FirstNSampler {
    fn partition<'a>(&self, samples: &'a [Sample]) -> Partition<'a> {
        let mut partition = Partition::default();
        for sample in samples {
            match sample.origin() {
                Origin::Genuine if partition.references.len() < self.n => {
                    partition.references.push(sample);
                }
                Origin::Genuine => partition.genuine_tests.push(sample),
                Origin::Forged => partition.forged_tests.push(sample),
                Origin::Unknown => {}
            }
        }
        partition
    }
}
