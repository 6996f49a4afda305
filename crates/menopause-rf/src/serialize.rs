//! Versioned binary encoding of a fitted forest.

use tracing::{debug, instrument};

use crate::error::RfError;
use crate::forest::RandomForest;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

/// Kind tag stored ahead of the forest.
const ARTIFACT_KIND: &str = "random_forest";

#[derive(serde::Serialize)]
struct ModelEnvelope<'a> {
    format_version: u32,
    kind: &'a str,
    forest: &'a RandomForest,
}

#[derive(serde::Deserialize)]
struct ModelHeader {
    format_version: u32,
    kind: String,
}

#[derive(serde::Deserialize)]
struct OwnedModelEnvelope {
    #[allow(dead_code)]
    format_version: u32,
    #[allow(dead_code)]
    kind: String,
    forest: RandomForest,
}

impl RandomForest {
    /// Encode the forest as a versioned bincode blob.
    ///
    /// Encoding is deterministic: the same forest always yields the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::SerializeModel`] if bincode encoding fails.
    #[instrument(skip(self), fields(n_trees = self.trees.len()))]
    pub fn to_bytes(&self) -> Result<Vec<u8>, RfError> {
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            kind: ARTIFACT_KIND,
            forest: self,
        };
        let bytes =
            bincode::serialize(&envelope).map_err(|source| RfError::SerializeModel { source })?;
        debug!(size_bytes = bytes.len(), "model encoded");
        Ok(bytes)
    }

    /// Decode a blob produced by [`RandomForest::to_bytes`].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::DeserializeModel`] | bincode decoding failed |
    /// | [`RfError::WrongArtifact`] | blob holds another artifact kind |
    /// | [`RfError::IncompatibleModelVersion`] | format version mismatch |
    #[instrument(skip(bytes), fields(size_bytes = bytes.len()))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RfError> {
        let header: ModelHeader =
            bincode::deserialize(bytes).map_err(|source| RfError::DeserializeModel { source })?;
        if header.kind != ARTIFACT_KIND {
            return Err(RfError::WrongArtifact { found: header.kind });
        }
        if header.format_version != FORMAT_VERSION {
            return Err(RfError::IncompatibleModelVersion {
                expected: FORMAT_VERSION,
                found: header.format_version,
            });
        }

        let envelope: OwnedModelEnvelope =
            bincode::deserialize(bytes).map_err(|source| RfError::DeserializeModel { source })?;
        let forest = envelope.forest;

        debug!(
            n_trees = forest.trees.len(),
            n_features = forest.n_features,
            n_classes = forest.n_classes,
            "model decoded"
        );
        Ok(forest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RandomForestConfig;

    fn train_simple_model() -> RandomForest {
        let features = vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![3.0, 0.0],
            vec![10.0, 0.0],
            vec![11.0, 0.0],
            vec![12.0, 0.0],
        ];
        let labels = vec![0, 0, 0, 1, 1, 1];
        let names = vec!["x".to_string(), "y".to_string()];
        RandomForestConfig::new(5)
            .unwrap()
            .fit(&features, &labels, &names)
            .unwrap()
            .into_forest()
    }

    #[test]
    fn round_trip_preserves_predictions() {
        let forest = train_simple_model();
        let loaded = RandomForest::from_bytes(&forest.to_bytes().unwrap()).unwrap();
        assert_eq!(loaded, forest);
        for sample in [[1.5, 0.0], [11.0, 0.0], [5.0, 0.0]] {
            assert_eq!(
                forest.predict_proba(&sample).unwrap(),
                loaded.predict_proba(&sample).unwrap()
            );
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(
            train_simple_model().to_bytes().unwrap(),
            train_simple_model().to_bytes().unwrap()
        );
    }

    #[test]
    fn corrupt_bytes_rejected() {
        let err = RandomForest::from_bytes(b"not a valid bincode file").unwrap_err();
        assert!(matches!(
            err,
            RfError::DeserializeModel { .. } | RfError::WrongArtifact { .. }
        ));
    }

    #[test]
    fn foreign_artifact_rejected() {
        #[derive(serde::Serialize)]
        struct Other {
            format_version: u32,
            kind: String,
        }
        let bytes = bincode::serialize(&Other {
            format_version: FORMAT_VERSION,
            kind: "scaler".to_string(),
        })
        .unwrap();
        assert!(matches!(
            RandomForest::from_bytes(&bytes),
            Err(RfError::WrongArtifact { found }) if found == "scaler"
        ));
    }

    #[test]
    fn version_mismatch_rejected() {
        let forest = train_simple_model();
        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION + 1,
            kind: ARTIFACT_KIND,
            forest: &forest,
        };
        let bytes = bincode::serialize(&envelope).unwrap();
        assert!(matches!(
            RandomForest::from_bytes(&bytes),
            Err(RfError::IncompatibleModelVersion { expected: 1, found: 2 })
        ));
    }
}
