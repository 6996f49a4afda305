//! Run configuration for the training pipeline.

use std::path::{Path, PathBuf};

use crate::error::TrainError;

/// Default input CSV path.
pub const DEFAULT_DATA_PATH: &str = "menopause_dataset.csv";
/// Default artifact directory.
pub const DEFAULT_OUTPUT_DIR: &str = "models";
/// Default held-out fraction.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
/// Default forest size.
pub const DEFAULT_N_TREES: usize = 300;
/// Default seed for the split and the forest.
pub const DEFAULT_SEED: u64 = 42;

/// Settings for one training run.
///
/// Construct via [`TrainingConfig::new`] or [`TrainingConfig::default`],
/// then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter       | Default                   |
/// |-----------------|---------------------------|
/// | `data_path`     | `menopause_dataset.csv`   |
/// | `output_dir`    | `models`                  |
/// | `test_fraction` | 0.2                       |
/// | `n_trees`       | 300                       |
/// | `seed`          | 42                        |
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    data_path: PathBuf,
    output_dir: PathBuf,
    test_fraction: f64,
    n_trees: usize,
    seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            test_fraction: DEFAULT_TEST_FRACTION,
            n_trees: DEFAULT_N_TREES,
            seed: DEFAULT_SEED,
        }
    }
}

impl TrainingConfig {
    /// Create a config with default tuning for the given paths.
    #[must_use]
    pub fn new(data_path: &Path, output_dir: &Path) -> Self {
        Self {
            data_path: data_path.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            ..Self::default()
        }
    }

    /// Set the held-out fraction.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidTestFraction`] unless `0 < fraction < 1`.
    pub fn with_test_fraction(mut self, fraction: f64) -> Result<Self, TrainError> {
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(TrainError::InvalidTestFraction { fraction });
        }
        self.test_fraction = fraction;
        Ok(self)
    }

    /// Set the number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn with_n_trees(mut self, n_trees: usize) -> Result<Self, TrainError> {
        if n_trees == 0 {
            return Err(TrainError::InvalidTreeCount);
        }
        self.n_trees = n_trees;
        Ok(self)
    }

    /// Set the seed shared by the split and the forest.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the input CSV path.
    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Return the artifact directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Return the held-out fraction.
    #[must_use]
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
