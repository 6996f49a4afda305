/// Errors from stage derivation, encoding, scaling and splitting.
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// Returned when a numeric attribute the stage rule depends on is NaN or infinite.
    #[error("record {row}: {column} is not a finite number ({value})")]
    NonFiniteAttribute {
        /// Zero-based record index.
        row: usize,
        /// Column name of the offending attribute.
        column: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Returned when a Yes/No column holds anything other than "Yes" or "No".
    #[error("record {row}: {column} has no Yes/No value")]
    MissingIndicator {
        /// Zero-based record index.
        row: usize,
        /// Column name of the offending indicator.
        column: &'static str,
    },

    /// Returned when fewer than two distinct stage labels are present.
    #[error("need at least 2 distinct stage labels, found {found}")]
    TooFewClasses {
        /// Number of distinct labels observed.
        found: usize,
    },

    /// Returned when encoding a label the encoder was not fitted on.
    #[error("unknown stage label \"{label}\"")]
    UnknownLabel {
        /// The label that has no index.
        label: String,
    },

    /// Returned when decoding an index outside `0..n_classes`.
    #[error("class index {index} out of range for {n_classes} classes")]
    ClassIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of classes the encoder knows.
        n_classes: usize,
    },

    /// Returned when fitting a scaler or encoder on zero rows.
    #[error("cannot fit on an empty dataset")]
    EmptyDataset,

    /// Returned when a row has a different width than the fitted columns.
    #[error("row {row} has {got} columns, expected {expected}")]
    ColumnCountMismatch {
        /// Zero-based row index.
        row: usize,
        /// Number of columns learned at fit time.
        expected: usize,
        /// Number of columns in the row.
        got: usize,
    },

    /// Returned when a scaler input value is NaN or infinite.
    #[error("non-finite value at row {row}, column {column}")]
    NonFiniteValue {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },

    /// Returned when the test fraction is not strictly between 0 and 1.
    #[error("test fraction must be in (0.0, 1.0), got {fraction}")]
    InvalidTestFraction {
        /// The invalid fraction.
        fraction: f64,
    },

    /// Returned when a class is too small to appear in both partitions.
    #[error("class {class} has only {count} samples, need at least {required} for a stratified split")]
    TooFewSamplesForSplit {
        /// Class index with insufficient samples.
        class: usize,
        /// Number of samples in that class.
        count: usize,
        /// Minimum samples per class for the configured fraction.
        required: usize,
    },

    /// Returned when artifact encoding fails.
    #[error("failed to serialize {artifact}")]
    Serialize {
        /// Which artifact was being encoded.
        artifact: &'static str,
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when artifact decoding fails.
    #[error("failed to deserialize {artifact}")]
    Deserialize {
        /// Which artifact was being decoded.
        artifact: &'static str,
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when a blob holds a different kind of artifact than requested.
    #[error("expected a {expected} artifact, found {found}")]
    WrongArtifact {
        /// The artifact kind the caller asked for.
        expected: &'static str,
        /// The artifact kind recorded in the blob.
        found: String,
    },

    /// Returned when an artifact carries an incompatible format version.
    #[error("incompatible {artifact} version: expected {expected}, found {found}")]
    IncompatibleVersion {
        /// Which artifact was being decoded.
        artifact: &'static str,
        /// The format version this build expects.
        expected: u32,
        /// The format version found in the blob.
        found: u32,
    },
}
