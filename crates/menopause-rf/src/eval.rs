//! Holdout evaluation of a fitted forest.

use tracing::{info, instrument};

use crate::confusion::{ClassMetrics, ConfusionMatrix};
use crate::error::RfError;
use crate::forest::RandomForest;

/// Scores of a forest on a held-out partition.
#[derive(Debug, Clone)]
pub struct HoldoutEvaluation {
    /// Fraction of held-out samples predicted correctly, in `[0.0, 1.0]`.
    pub accuracy: f64,
    /// Counts of `true_class × predicted_class` over the holdout.
    pub confusion_matrix: ConfusionMatrix,
    /// Number of held-out samples.
    pub n_samples: usize,
}

impl HoldoutEvaluation {
    /// Predict every held-out row and score against `labels`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::EmptyDataset`] | `features` is empty |
    /// | [`RfError::LabelCountMismatch`] | `labels.len() != features.len()` |
    /// | [`RfError::LabelOutOfRange`] | a label is not below the forest's class count |
    /// | [`RfError::PredictionFeatureMismatch`] | a row has the wrong width |
    #[instrument(skip_all, fields(n_samples = features.len()))]
    pub fn evaluate(
        forest: &RandomForest,
        features: &[Vec<f64>],
        labels: &[usize],
    ) -> Result<Self, RfError> {
        if features.is_empty() {
            return Err(RfError::EmptyDataset);
        }
        if labels.len() != features.len() {
            return Err(RfError::LabelCountMismatch {
                n_samples: features.len(),
                n_labels: labels.len(),
            });
        }
        let n_classes = forest.n_classes();
        if let Some((sample_index, &label)) =
            labels.iter().enumerate().find(|&(_, &l)| l >= n_classes)
        {
            return Err(RfError::LabelOutOfRange {
                label,
                sample_index,
                n_classes,
            });
        }

        let predictions = forest.predict_batch(features)?;
        let confusion_matrix = ConfusionMatrix::from_labels(labels, &predictions, n_classes)?;
        let accuracy = confusion_matrix.accuracy();

        info!(accuracy, n_samples = features.len(), "holdout evaluation complete");

        Ok(Self {
            accuracy,
            confusion_matrix,
            n_samples: features.len(),
        })
    }

    /// Per-class precision, recall and F1 on the holdout.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        self.confusion_matrix.class_metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RandomForestConfig;

    fn fitted() -> RandomForest {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for class in 0..3 {
            for i in 0..15 {
                features.push(vec![class as f64 * 10.0 + i as f64 * 0.2]);
                labels.push(class);
            }
        }
        RandomForestConfig::new(15)
            .unwrap()
            .fit(&features, &labels, &["x".to_string()])
            .unwrap()
            .into_forest()
    }

    #[test]
    fn separable_holdout_is_perfect() {
        let forest = fitted();
        let holdout = vec![vec![1.1], vec![11.3], vec![21.7]];
        let eval = HoldoutEvaluation::evaluate(&forest, &holdout, &[0, 1, 2]).unwrap();
        assert!((eval.accuracy - 1.0).abs() < f64::EPSILON);
        assert_eq!(eval.n_samples, 3);
        assert_eq!(eval.confusion_matrix.as_rows()[1], vec![0, 1, 0]);
    }

    #[test]
    fn wrong_labels_score_zero() {
        let forest = fitted();
        let holdout = vec![vec![1.1], vec![11.3]];
        let eval = HoldoutEvaluation::evaluate(&forest, &holdout, &[2, 0]).unwrap();
        assert_eq!(eval.accuracy, 0.0);
        assert_eq!(eval.class_metrics()[2].support, 1);
    }

    #[test]
    fn input_errors() {
        let forest = fitted();
        assert!(matches!(
            HoldoutEvaluation::evaluate(&forest, &[], &[]),
            Err(RfError::EmptyDataset)
        ));
        assert!(matches!(
            HoldoutEvaluation::evaluate(&forest, &[vec![1.0]], &[0, 1]),
            Err(RfError::LabelCountMismatch { .. })
        ));
        assert!(matches!(
            HoldoutEvaluation::evaluate(&forest, &[vec![1.0]], &[3]),
            Err(RfError::LabelOutOfRange { label: 3, sample_index: 0, n_classes: 3 })
        ));
        assert!(matches!(
            HoldoutEvaluation::evaluate(&forest, &[vec![1.0, 2.0]], &[0]),
            Err(RfError::PredictionFeatureMismatch { expected: 1, got: 2 })
        ));
    }
}
