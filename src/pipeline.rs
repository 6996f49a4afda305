//! The training run: read, label, encode, split, scale, fit, evaluate, persist.

use std::collections::BTreeMap;
use std::path::PathBuf;

use menopause_io::{
    Artifact, ArtifactWriter, ClinicalReader, ENCODER_FILE, MODEL_FILE, SCALER_FILE,
};
use menopause_prep::{
    LabelEncoding, SplitIndices, StandardScaler, StratifiedSplit, derive_stages, encode_records,
    feature_matrix, feature_names,
};
use menopause_rf::{
    ClassMetrics, FitSummary, HoldoutEvaluation, RandomForestConfig, RankedFeature,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::TrainingConfig;
use crate::error::TrainError;

/// Per-class holdout scores keyed by stage name.
#[derive(Debug, Clone, Serialize)]
pub struct StageMetrics {
    /// Stage name.
    pub stage: String,
    /// TP / (TP + FP).
    pub precision: f64,
    /// TP / (TP + FN).
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Held-out samples of this stage.
    pub support: usize,
}

/// Summary of a completed training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingOutcome {
    /// Held-out accuracy in `[0.0, 1.0]`.
    pub accuracy: f64,
    /// Records read from the input.
    pub n_samples: usize,
    /// Records used for fitting.
    pub n_train: usize,
    /// Records held out for evaluation.
    pub n_test: usize,
    /// Records per derived stage over the whole dataset.
    pub class_counts: BTreeMap<String, usize>,
    /// Holdout scores per stage, in class-index order.
    pub class_metrics: Vec<StageMetrics>,
    /// Shape of the fitted forest.
    pub forest: FitSummary,
    /// Ranked mean-decrease-in-impurity importances.
    pub importances: Vec<RankedFeature>,
    /// Artifact paths in write order: model, scaler, encoder.
    pub artifacts: Vec<PathBuf>,
}

/// Run the full pipeline described by `config`.
///
/// Every step is validated before the first artifact is staged, so a
/// failing run leaves the output directory's previous artifacts intact.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`TrainError::Io`] | the CSV cannot be read or an artifact cannot be written |
/// | [`TrainError::Prep`] | a record cannot be labelled or encoded, fewer than two stages, or a stage too small to split |
/// | [`TrainError::Forest`] | forest fitting, evaluation or encoding failed |
#[instrument(skip_all, fields(data = %config.data_path().display(), n_trees = config.n_trees(), seed = config.seed()))]
pub fn train(config: &TrainingConfig) -> Result<TrainingOutcome, TrainError> {
    let records = ClinicalReader::new(config.data_path()).read()?;
    let encoded = encode_records(&records);
    let stages = derive_stages(&encoded)?;
    let features = feature_matrix(&encoded)?;

    let encoding = LabelEncoding::fit(&stages)?;
    let labels = encoding.encode_all(&stages)?;
    let class_counts = count_classes(&encoding, &labels);
    info!(n_samples = records.len(), ?class_counts, "stages derived");

    let split = StratifiedSplit::new(config.test_fraction())?
        .with_seed(config.seed())
        .split(&labels)?;
    let train_x = SplitIndices::select(&features, &split.train);
    let train_y = SplitIndices::select(&labels, &split.train);
    let test_x = SplitIndices::select(&features, &split.test);
    let test_y = SplitIndices::select(&labels, &split.test);
    debug!(n_train = train_y.len(), n_test = test_y.len(), "dataset split");

    let (scaler, train_x) = StandardScaler::fit_transform(&train_x)?;
    let test_x = scaler.transform(&test_x)?;

    let fitted = RandomForestConfig::new(config.n_trees())?
        .with_seed(config.seed())
        .fit(&train_x, &train_y, &feature_names())?;
    for feature in fitted.importances() {
        info!(
            rank = feature.rank,
            feature = %feature.name,
            importance = feature.importance,
            "feature importance"
        );
    }

    let evaluation = HoldoutEvaluation::evaluate(fitted.forest(), &test_x, &test_y)?;
    info!(
        "holdout confusion matrix (rows true, columns predicted)\n{}",
        evaluation.confusion_matrix.render(encoding.classes())
    );
    let class_metrics = stage_metrics(&encoding, &evaluation.class_metrics());
    for m in &class_metrics {
        info!(
            stage = %m.stage,
            precision = m.precision,
            recall = m.recall,
            f1 = m.f1,
            support = m.support,
            "holdout class metrics"
        );
    }

    let model_bytes = fitted.forest().to_bytes()?;
    let scaler_bytes = scaler.to_bytes()?;
    let encoder_bytes = encoding.to_bytes()?;
    let writer = ArtifactWriter::new(config.output_dir())?;
    let artifacts = writer.write_all(&[
        Artifact { name: MODEL_FILE, bytes: &model_bytes },
        Artifact { name: SCALER_FILE, bytes: &scaler_bytes },
        Artifact { name: ENCODER_FILE, bytes: &encoder_bytes },
    ])?;

    info!(accuracy = evaluation.accuracy, "training run complete");

    Ok(TrainingOutcome {
        accuracy: evaluation.accuracy,
        n_samples: records.len(),
        n_train: train_y.len(),
        n_test: test_y.len(),
        class_counts,
        class_metrics,
        forest: fitted.summary().clone(),
        importances: fitted.importances().to_vec(),
        artifacts,
    })
}

fn count_classes(encoding: &LabelEncoding, labels: &[usize]) -> BTreeMap<String, usize> {
    let mut counts = vec![0usize; encoding.n_classes()];
    for &label in labels {
        counts[label] += 1;
    }
    encoding
        .classes()
        .iter()
        .cloned()
        .zip(counts)
        .collect()
}

fn stage_metrics(encoding: &LabelEncoding, metrics: &[ClassMetrics]) -> Vec<StageMetrics> {
    metrics
        .iter()
        .map(|m| StageMetrics {
            stage: encoding
                .classes()
                .get(m.class)
                .cloned()
                .unwrap_or_else(|| m.class.to_string()),
            precision: m.precision,
            recall: m.recall,
            f1: m.f1,
            support: m.support,
        })
        .collect()
}
