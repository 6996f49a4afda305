//! Stage prediction from persisted artifacts.

use std::collections::BTreeMap;
use std::path::Path;

use menopause_io::{ENCODER_FILE, MODEL_FILE, SCALER_FILE, read_artifact, verify_artifacts};
use menopause_prep::{ClinicalRecord, EncodedRecord, LabelEncoding, StageLabel, StandardScaler};
use menopause_rf::RandomForest;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::TrainError;

/// Predicted stage for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagePrediction {
    /// Most probable stage.
    pub stage: StageLabel,
    /// Probability of `stage`.
    pub confidence: f64,
    /// Probability of every known stage, keyed by name.
    pub probabilities: BTreeMap<String, f64>,
}

/// A trained forest with the preprocessing it was fitted behind.
#[derive(Debug, Clone)]
pub struct Predictor {
    forest: RandomForest,
    scaler: StandardScaler,
    encoding: LabelEncoding,
}

impl Predictor {
    /// Assemble a predictor from decoded parts.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TrainError::FeatureCountMismatch`] | the scaler width differs from the forest's feature count |
    /// | [`TrainError::ClassCountMismatch`] | the encoder knows a different number of classes than the forest |
    pub fn new(
        forest: RandomForest,
        scaler: StandardScaler,
        encoding: LabelEncoding,
    ) -> Result<Self, TrainError> {
        if forest.n_features() != scaler.n_columns() {
            return Err(TrainError::FeatureCountMismatch {
                model: forest.n_features(),
                scaler: scaler.n_columns(),
            });
        }
        if forest.n_classes() != encoding.n_classes() {
            return Err(TrainError::ClassCountMismatch {
                model: forest.n_classes(),
                encoder: encoding.n_classes(),
            });
        }
        Ok(Self {
            forest,
            scaler,
            encoding,
        })
    }

    /// Load the three artifacts written by a training run from `dir`.
    ///
    /// The directory's manifest must list all three with their current sizes,
    /// so a set left half-replaced by an interrupted run is refused.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Io`] if the set is incomplete or a file cannot be
    /// read, [`TrainError::Forest`] or [`TrainError::Prep`] if a blob does not
    /// decode, and the errors of [`Predictor::new`] if the artifacts do not
    /// belong together.
    #[instrument(fields(dir = %dir.display()))]
    pub fn load(dir: &Path) -> Result<Self, TrainError> {
        verify_artifacts(dir, &[MODEL_FILE, SCALER_FILE, ENCODER_FILE])?;
        let forest = RandomForest::from_bytes(&read_artifact(&dir.join(MODEL_FILE))?)?;
        let scaler = StandardScaler::from_bytes(&read_artifact(&dir.join(SCALER_FILE))?)?;
        let encoding = LabelEncoding::from_bytes(&read_artifact(&dir.join(ENCODER_FILE))?)?;
        info!(
            n_trees = forest.n_trees(),
            n_classes = forest.n_classes(),
            "predictor loaded"
        );
        Self::new(forest, scaler, encoding)
    }

    /// Return the class names in index order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        self.encoding.classes()
    }

    /// Predict the stage of one record.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Prep`] if a symptom is not `Yes`/`No` or a value
    /// is not finite, and [`TrainError::Forest`] if prediction fails.
    pub fn predict(&self, record: &ClinicalRecord) -> Result<StagePrediction, TrainError> {
        let features = EncodedRecord::new(0, record).feature_vector()?;
        let scaled = self.scaler.transform_one(&features)?;
        let distribution = self.forest.predict_proba(&scaled)?;
        let stage = self.encoding.decode_stage(distribution.predicted_class())?;
        let probabilities = self
            .encoding
            .classes()
            .iter()
            .cloned()
            .zip(distribution.as_slice().iter().copied())
            .collect();
        Ok(StagePrediction {
            stage,
            confidence: distribution.confidence(),
            probabilities,
        })
    }
}
