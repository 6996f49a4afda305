//! Menopause stage classifier training.
//!
//! Reads a clinical CSV, derives a stage label per record with a fixed rule,
//! fits a scaled Random Forest on a stratified training partition, scores it
//! on the held-out partition and persists the model, scaler and label
//! encoding as three independent artifacts. [`Predictor`] loads them back.

mod config;
mod error;
mod pipeline;
mod predict;

pub use config::{
    DEFAULT_DATA_PATH, DEFAULT_N_TREES, DEFAULT_OUTPUT_DIR, DEFAULT_SEED, DEFAULT_TEST_FRACTION,
    TrainingConfig,
};
pub use error::TrainError;
pub use pipeline::{StageMetrics, TrainingOutcome, train};
pub use predict::{Predictor, StagePrediction};
