//! Clinical CSV reader with header-driven column lookup.

use std::path::{Path, PathBuf};

use menopause_prep::{
    AGE, ClinicalRecord, ESTROGEN_LEVEL, FSH_LEVEL, Symptom, YEARS_SINCE_LAST_PERIOD,
};
use tracing::{debug, info, instrument};

use crate::IoError;

const NUMERIC_COLUMNS: [&str; 4] = [AGE, ESTROGEN_LEVEL, FSH_LEVEL, YEARS_SINCE_LAST_PERIOD];

/// Reads clinical records from a CSV file.
///
/// Expected CSV format:
/// - Header row required; columns are located by name, in any order
/// - `Age`, `Estrogen_Level`, `FSH_Level`, `Years_Since_Last_Period` hold finite numbers
/// - the seven symptom columns hold text (normally `Yes` or `No`)
/// - other columns are ignored
///
/// Header names and numeric cells are trimmed of surrounding whitespace.
/// Symptom text is kept verbatim, padding included, so only an exact `Yes`
/// or `No` encodes; deciding validity happens at encoding.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | file doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | malformed CSV record |
/// | [`IoError::MissingColumn`] | a required column is not in the header |
/// | [`IoError::InconsistentRowLength`] | record has a different field count than the header |
/// | [`IoError::InvalidNumber`] | numeric cell is unparseable, NaN or infinite |
/// | [`IoError::EmptyDataset`] | zero data rows after header |
pub struct ClinicalReader {
    path: PathBuf,
}

impl ClinicalReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Vec<ClinicalRecord>, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so our InconsistentRowLength check fires instead of a
        // low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let expected_cols = header.len();
        let numeric_idx = NUMERIC_COLUMNS.map(|c| self.column_index(&header, c));
        let symptom_idx = Symptom::ALL.map(|s| self.column_index(&header, s.column()));
        let numeric_idx = collect_indices(numeric_idx)?;
        let symptom_idx = collect_indices(symptom_idx)?;
        debug!(expected_cols, "located required columns");

        let mut records = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut numbers = [0.0f64; 4];
            for ((slot, &col), &name) in numbers.iter_mut().zip(&numeric_idx).zip(&NUMERIC_COLUMNS) {
                *slot = self.parse_number(record.get(col).unwrap_or(""), row_index, name)?;
            }
            let [age, estrogen_level, fsh_level, years_since_last_period] = numbers;
            let symptoms = symptom_idx.map(|col| record.get(col).unwrap_or("").to_string());

            records.push(ClinicalRecord {
                age,
                estrogen_level,
                fsh_level,
                years_since_last_period,
                symptoms,
            });
        }

        if records.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_records = records.len(), "clinical dataset loaded");
        Ok(records)
    }

    fn column_index(&self, header: &csv::StringRecord, column: &'static str) -> Result<usize, IoError> {
        header
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| IoError::MissingColumn {
                path: self.path.clone(),
                column,
            })
    }

    fn parse_number(&self, raw: &str, row_index: usize, column: &'static str) -> Result<f64, IoError> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| IoError::InvalidNumber {
                path: self.path.clone(),
                row_index,
                column,
                raw: raw.to_string(),
            })
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

/// Turn per-column lookups into indices, reporting the first missing column.
fn collect_indices<const N: usize>(
    lookups: [Result<usize, IoError>; N],
) -> Result<[usize; N], IoError> {
    let mut out = [0usize; N];
    for (slot, lookup) in out.iter_mut().zip(lookups) {
        *slot = lookup?;
    }
    Ok(out)
}
