//! Invertible mapping between stage labels and dense class indices.

use std::collections::BTreeSet;

use tracing::debug;

use crate::artifact;
use crate::error::PrepError;
use crate::stage::StageLabel;

const ARTIFACT_KIND: &str = "label_encoder";

/// Bijection between the stage labels seen at fit time and `0..n_classes`.
///
/// Indices follow the ascending lexicographic order of the label strings,
/// so with all three stages present the mapping is
/// `Perimenopause → 0`, `Postmenopause → 1`, `Premenopause → 2`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LabelEncoding {
    classes: Vec<String>,
}

impl LabelEncoding {
    /// Learn the mapping from the observed labels.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::TooFewClasses`] when fewer than two distinct
    /// labels are present.
    pub fn fit(labels: &[StageLabel]) -> Result<Self, PrepError> {
        let distinct: BTreeSet<&'static str> = labels.iter().map(|l| l.as_str()).collect();
        if distinct.len() < 2 {
            return Err(PrepError::TooFewClasses {
                found: distinct.len(),
            });
        }
        let classes: Vec<String> = distinct.into_iter().map(String::from).collect();
        debug!(?classes, "label encoding fitted");
        Ok(Self { classes })
    }

    /// Return the class names in index order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Return the index assigned to `label`.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::UnknownLabel`] when `label` was not seen at fit time.
    pub fn encode(&self, label: StageLabel) -> Result<usize, PrepError> {
        self.classes
            .iter()
            .position(|c| c == label.as_str())
            .ok_or_else(|| PrepError::UnknownLabel {
                label: label.as_str().to_string(),
            })
    }

    /// Encode a slice of labels.
    ///
    /// # Errors
    ///
    /// Returns the first [`PrepError::UnknownLabel`] encountered.
    pub fn encode_all(&self, labels: &[StageLabel]) -> Result<Vec<usize>, PrepError> {
        labels.iter().map(|&l| self.encode(l)).collect()
    }

    /// Return the label string for a class index.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::ClassIndexOutOfRange`] when `index >= n_classes`.
    pub fn decode(&self, index: usize) -> Result<&str, PrepError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(PrepError::ClassIndexOutOfRange {
                index,
                n_classes: self.classes.len(),
            })
    }

    /// Return the stage for a class index.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::ClassIndexOutOfRange`] for a bad index, or
    /// [`PrepError::UnknownLabel`] if a loaded encoding holds a foreign label.
    pub fn decode_stage(&self, index: usize) -> Result<StageLabel, PrepError> {
        self.decode(index)?.parse()
    }

    /// Encode as a versioned binary blob.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Serialize`] if bincode encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PrepError> {
        artifact::to_bytes(ARTIFACT_KIND, self)
    }

    /// Decode a blob produced by [`LabelEncoding::to_bytes`].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`PrepError::Deserialize`] | bincode decoding failed |
    /// | [`PrepError::WrongArtifact`] | blob holds another artifact kind |
    /// | [`PrepError::IncompatibleVersion`] | format version mismatch |
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrepError> {
        artifact::from_bytes(ARTIFACT_KIND, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_stages() -> Vec<StageLabel> {
        vec![
            StageLabel::Premenopause,
            StageLabel::Postmenopause,
            StageLabel::Perimenopause,
            StageLabel::Premenopause,
        ]
    }

    #[test]
    fn indices_follow_sorted_label_strings() {
        let enc = LabelEncoding::fit(&all_stages()).unwrap();
        assert_eq!(enc.classes(), &["Perimenopause", "Postmenopause", "Premenopause"]);
        assert_eq!(enc.encode(StageLabel::Perimenopause).unwrap(), 0);
        assert_eq!(enc.encode(StageLabel::Postmenopause).unwrap(), 1);
        assert_eq!(enc.encode(StageLabel::Premenopause).unwrap(), 2);
    }

    #[test]
    fn decode_inverts_encode() {
        let labels = all_stages();
        let enc = LabelEncoding::fit(&labels).unwrap();
        for &label in &labels {
            let idx = enc.encode(label).unwrap();
            assert_eq!(enc.decode(idx).unwrap(), label.as_str());
            assert_eq!(enc.decode_stage(idx).unwrap(), label);
        }
    }

    #[test]
    fn single_class_rejected() {
        let err = LabelEncoding::fit(&[StageLabel::Premenopause; 4]).unwrap_err();
        assert!(matches!(err, PrepError::TooFewClasses { found: 1 }));
        let err = LabelEncoding::fit(&[]).unwrap_err();
        assert!(matches!(err, PrepError::TooFewClasses { found: 0 }));
    }

    #[test]
    fn unseen_label_and_bad_index() {
        let enc =
            LabelEncoding::fit(&[StageLabel::Premenopause, StageLabel::Postmenopause]).unwrap();
        assert_eq!(enc.n_classes(), 2);
        assert!(matches!(
            enc.encode(StageLabel::Perimenopause),
            Err(PrepError::UnknownLabel { .. })
        ));
        assert!(matches!(
            enc.decode(2),
            Err(PrepError::ClassIndexOutOfRange { index: 2, n_classes: 2 })
        ));
    }

    #[test]
    fn bytes_round_trip() {
        let enc = LabelEncoding::fit(&all_stages()).unwrap();
        let restored = LabelEncoding::from_bytes(&enc.to_bytes().unwrap()).unwrap();
        assert_eq!(enc, restored);
    }

    #[test]
    fn garbage_bytes_rejected() {
        let err = LabelEncoding::from_bytes(b"definitely not bincode").unwrap_err();
        assert!(matches!(
            err,
            PrepError::Deserialize { .. } | PrepError::WrongArtifact { .. }
        ));
    }
}
