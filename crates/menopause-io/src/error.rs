//! I/O error types for menopause-io.

use std::path::PathBuf;

/// Errors from CSV reading and artifact persistence.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a required column is absent from the header.
    #[error("missing required column \"{column}\" in {path}")]
    MissingColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// Name of the absent column.
        column: &'static str,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of fields than the header.
    #[error("inconsistent row length in {path}: record {row_index} has {got} fields, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based record index (excluding header).
        row_index: usize,
        /// Number of header fields.
        expected: usize,
        /// Number of fields in this record.
        got: usize,
    },

    /// Returned when a numeric cell is unparseable, NaN, or infinite.
    #[error("invalid number in {path}: record {row_index}, column {column}, raw value \"{raw}\"")]
    InvalidNumber {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based record index (excluding header).
        row_index: usize,
        /// Column name.
        column: &'static str,
        /// The raw text that failed to parse.
        raw: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when an artifact cannot be written to its staging file.
    #[error("cannot stage artifact {path}")]
    StageFile {
        /// Final path the artifact was destined for.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a staged artifact cannot be renamed into place.
    #[error("cannot move staged artifact into {path}")]
    PersistFile {
        /// Final path of the artifact.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when an artifact file cannot be read.
    #[error("cannot read artifact {path}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when an artifact directory does not hold a complete, consistent set.
    #[error("incomplete artifact set in {dir}: {reason}")]
    IncompleteArtifacts {
        /// Directory that was checked.
        dir: PathBuf,
        /// What is missing or inconsistent.
        reason: String,
    },
}
