//! Error type for the training pipeline.

use menopause_io::IoError;
use menopause_prep::PrepError;
use menopause_rf::RfError;

/// Errors from a training run or from loading a trained predictor.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    /// Returned when the held-out fraction is not strictly between 0 and 1.
    #[error("test fraction must be in (0, 1), got {fraction}")]
    InvalidTestFraction {
        /// The rejected fraction.
        fraction: f64,
    },

    /// Returned when zero trees are requested.
    #[error("tree count must be at least 1")]
    InvalidTreeCount,

    /// Returned when the loaded artifacts disagree on the class count.
    #[error("model predicts {model} classes but the label encoder knows {encoder}")]
    ClassCountMismatch {
        /// Classes in the forest.
        model: usize,
        /// Classes in the label encoding.
        encoder: usize,
    },

    /// Returned when the loaded artifacts disagree on the feature count.
    #[error("model expects {model} features but the scaler was fitted on {scaler}")]
    FeatureCountMismatch {
        /// Features in the forest.
        model: usize,
        /// Columns in the scaler.
        scaler: usize,
    },

    /// Preprocessing failure.
    #[error(transparent)]
    Prep(#[from] PrepError),

    /// Forest training, evaluation or encoding failure.
    #[error(transparent)]
    Forest(#[from] RfError),

    /// CSV reading or artifact storage failure.
    #[error(transparent)]
    Io(#[from] IoError),
}
