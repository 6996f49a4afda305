//! Stratified train/test partitioning.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::error::PrepError;

/// Stratified holdout split configuration.
///
/// Construct via [`StratifiedSplit::new`], then chain `with_seed` if desired.
///
/// Each class contributes `round(count * test_fraction)` samples to the
/// test partition, clamped so both partitions keep at least one sample.
///
/// # Defaults
///
/// | Parameter       | Default |
/// |-----------------|---------|
/// | `test_fraction` | 0.2     |
/// | `seed`          | 42      |
#[derive(Debug, Clone)]
pub struct StratifiedSplit {
    test_fraction: f64,
    seed: u64,
}

/// Indices of the train and test partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Indices into the original samples assigned to training.
    pub train: Vec<usize>,
    /// Indices into the original samples held out for evaluation.
    pub test: Vec<usize>,
}

impl SplitIndices {
    /// Gather the rows of `items` selected by `indices`.
    #[must_use]
    pub fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
        indices.iter().map(|&i| items[i].clone()).collect()
    }
}

impl StratifiedSplit {
    /// Create a split holding out `test_fraction` of every class.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::InvalidTestFraction`] unless `0.0 < test_fraction < 1.0`.
    pub fn new(test_fraction: f64) -> Result<Self, PrepError> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(PrepError::InvalidTestFraction {
                fraction: test_fraction,
            });
        }
        Ok(Self {
            test_fraction,
            seed: 42,
        })
    }

    /// Set the random seed for within-class shuffling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the test fraction.
    #[must_use]
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Minimum samples a class needs so that both partitions receive at
    /// least one: `ceil(1 / min(f, 1 - f))`.
    #[must_use]
    pub fn min_samples_per_class(&self) -> usize {
        let smaller = self.test_fraction.min(1.0 - self.test_fraction);
        let k = 1.0 / smaller;
        // 1.0 - 0.8 is not exactly 0.2; snap before rounding up.
        if (k - k.round()).abs() < 1e-9 {
            k.round() as usize
        } else {
            k.ceil() as usize
        }
    }

    /// Partition sample indices by class label.
    ///
    /// `labels[i]` is the zero-based class of sample `i`. Classes with no
    /// samples are ignored.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`PrepError::EmptyDataset`] | `labels` is empty |
    /// | [`PrepError::TooFewSamplesForSplit`] | a class is below [`min_samples_per_class`](Self::min_samples_per_class) |
    #[instrument(skip_all, fields(n_samples = labels.len(), test_fraction = self.test_fraction))]
    pub fn split(&self, labels: &[usize]) -> Result<SplitIndices, PrepError> {
        if labels.is_empty() {
            return Err(PrepError::EmptyDataset);
        }
        let n_classes = labels.iter().max().copied().unwrap_or(0) + 1;

        let mut class_indices: Vec<Vec<usize>> = vec![vec![]; n_classes];
        for (i, &label) in labels.iter().enumerate() {
            class_indices[label].push(i);
        }

        let required = self.min_samples_per_class();
        for (class, indices) in class_indices.iter().enumerate() {
            if !indices.is_empty() && indices.len() < required {
                return Err(PrepError::TooFewSamplesForSplit {
                    class,
                    count: indices.len(),
                    required,
                });
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut train = Vec::with_capacity(labels.len());
        let mut test = Vec::new();

        for (class, indices) in class_indices.iter_mut().enumerate() {
            if indices.is_empty() {
                continue;
            }
            indices.shuffle(&mut rng);
            let count = indices.len();
            let n_test = ((count as f64 * self.test_fraction).round() as usize).clamp(1, count - 1);
            test.extend_from_slice(&indices[..n_test]);
            train.extend_from_slice(&indices[n_test..]);
            debug!(class, count, n_test, "class partitioned");
        }

        // Interleave classes so downstream consumers don't see class-sorted blocks.
        train.shuffle(&mut rng);
        test.shuffle(&mut rng);

        Ok(SplitIndices { train, test })
    }
}

impl Default for StratifiedSplit {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}
