//! Confusion matrix and per-class classification metrics.

use std::fmt::{self, Write};

use crate::error::RfError;

/// Multi-class confusion matrix; `rows[true_class][predicted_class]` counts samples.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConfusionMatrix {
    matrix: Vec<Vec<usize>>,
    n_classes: usize,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClassMetrics {
    /// The class index.
    pub class: usize,
    /// TP / (TP + FP); 0.0 if the class was never predicted.
    pub precision: f64,
    /// TP / (TP + FN); 0.0 if the class has no true samples.
    pub recall: f64,
    /// Harmonic mean of precision and recall; 0.0 if both are zero.
    pub f1: f64,
    /// Number of true samples in this class.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Build a confusion matrix from true and predicted labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::EmptyDataset`] | zero labels provided |
    /// | [`RfError::LabelCountMismatch`] | the two slices differ in length |
    /// | [`RfError::LabelOutOfRange`] | a label is not below `n_classes` |
    pub fn from_labels(
        true_labels: &[usize],
        predicted: &[usize],
        n_classes: usize,
    ) -> Result<Self, RfError> {
        if true_labels.is_empty() {
            return Err(RfError::EmptyDataset);
        }
        if true_labels.len() != predicted.len() {
            return Err(RfError::LabelCountMismatch {
                n_samples: predicted.len(),
                n_labels: true_labels.len(),
            });
        }
        let mut matrix = vec![vec![0usize; n_classes]; n_classes];
        for (sample_index, (&t, &p)) in true_labels.iter().zip(predicted).enumerate() {
            let label = t.max(p);
            if label >= n_classes {
                return Err(RfError::LabelOutOfRange {
                    label,
                    sample_index,
                    n_classes,
                });
            }
            matrix[t][p] += 1;
        }
        Ok(Self { matrix, n_classes })
    }

    /// Fraction of samples on the diagonal.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.n_classes).map(|i| self.matrix[i][i]).sum();
        match self.total() {
            0 => 0.0,
            total => correct as f64 / total as f64,
        }
    }

    /// Total number of samples counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    /// Per-class precision, recall, F1, and support.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        (0..self.n_classes)
            .map(|c| {
                let tp = self.matrix[c][c];
                let predicted: usize = self.matrix.iter().map(|row| row[c]).sum();
                let support: usize = self.matrix[c].iter().sum();
                let ratio = |num: usize, den: usize| {
                    if den == 0 { 0.0 } else { num as f64 / den as f64 }
                };
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: c,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Render as a table with `class_names` labelling rows and columns.
    ///
    /// Missing names fall back to the class index.
    #[must_use]
    pub fn render(&self, class_names: &[String]) -> String {
        let names: Vec<String> = (0..self.n_classes)
            .map(|i| class_names.get(i).cloned().unwrap_or_else(|| i.to_string()))
            .collect();
        let width = names.iter().map(String::len).max().unwrap_or(1).max(6);

        let mut out = String::new();
        let _ = write!(out, "{:>width$}", "true\\pred");
        for name in &names {
            let _ = write!(out, " {name:>width$}");
        }
        out.push('\n');
        for (name, row) in names.iter().zip(&self.matrix) {
            let _ = write!(out, "{name:>width$}");
            for val in row {
                let _ = write!(out, " {val:>width$}");
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let labels = vec![0, 0, 1, 1, 2, 2];
        let cm = ConfusionMatrix::from_labels(&labels, &labels, 3).unwrap();
        assert!((cm.accuracy() - 1.0).abs() < f64::EPSILON);
        for m in cm.class_metrics() {
            assert!((m.f1 - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn known_confusion_matrix() {
        let true_labels = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
        let predicted = vec![0, 0, 1, 1, 1, 2, 2, 2, 0];
        let cm = ConfusionMatrix::from_labels(&true_labels, &predicted, 3).unwrap();
        let metrics = cm.class_metrics();
        assert!((metrics[0].precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics[0].recall - 2.0 / 3.0).abs() < 1e-10);
        assert_eq!(metrics[0].support, 3);
        assert!((cm.accuracy() - 6.0 / 9.0).abs() < 1e-10);
        assert_eq!(cm.total(), 9);
    }

    #[test]
    fn rows_are_true_class() {
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 1], &[0, 1, 0, 1], 2).unwrap();
        assert_eq!(cm.as_rows()[0], vec![1, 1]);
        assert_eq!(cm.as_rows()[1], vec![1, 1]);
    }

    #[test]
    fn zero_support_class_metrics() {
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 1], &[0, 0, 1, 1], 3).unwrap();
        let metrics = cm.class_metrics();
        assert_eq!(metrics[2].support, 0);
        assert_eq!(metrics[2].recall, 0.0);
        assert_eq!(metrics[2].f1, 0.0);
    }

    #[test]
    fn invalid_inputs() {
        assert!(matches!(
            ConfusionMatrix::from_labels(&[], &[], 3),
            Err(RfError::EmptyDataset)
        ));
        assert!(matches!(
            ConfusionMatrix::from_labels(&[0, 1], &[0], 2),
            Err(RfError::LabelCountMismatch { .. })
        ));
        assert!(matches!(
            ConfusionMatrix::from_labels(&[0], &[2], 2),
            Err(RfError::LabelOutOfRange { label: 2, .. })
        ));
    }

    #[test]
    fn render_uses_class_names() {
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 1], 2).unwrap();
        let names = vec!["Perimenopause".to_string(), "Premenopause".to_string()];
        let table = cm.render(&names);
        assert_eq!(table.lines().count(), 3);
        assert!(table.lines().nth(1).unwrap().trim_start().starts_with("Perimenopause"));
        assert!(format!("{cm}").contains("true\\pred"));
    }
}
