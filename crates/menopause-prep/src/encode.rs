//! Yes/No indicator encoding and fixed-order feature vectors.

use crate::error::PrepError;
use crate::record::{
    AGE, ClinicalRecord, ESTROGEN_LEVEL, FSH_LEVEL, Symptom, YEARS_SINCE_LAST_PERIOD,
};

/// Number of model input columns.
pub const N_FEATURES: usize = 11;

/// Feature column names in model input order.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    AGE,
    ESTROGEN_LEVEL,
    FSH_LEVEL,
    YEARS_SINCE_LAST_PERIOD,
    "Irregular_Periods",
    "Missed_Periods",
    "Hot_Flashes",
    "Night_Sweats",
    "Sleep_Problems",
    "Vaginal_Dryness",
    "Joint_Pain",
];

/// Return [`FEATURE_NAMES`] as owned strings.
#[must_use]
pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect()
}

/// A binary symptom indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    No,
    Yes,
}

impl Indicator {
    /// Parse the raw column text. Only the exact strings `"Yes"` and `"No"`
    /// are recognised; anything else is a gap.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Yes" => Some(Indicator::Yes),
            "No" => Some(Indicator::No),
            _ => None,
        }
    }

    /// Return 1.0 for `Yes` and 0.0 for `No`.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Indicator::Yes => 1.0,
            Indicator::No => 0.0,
        }
    }
}

/// A clinical record with symptom text replaced by indicators.
///
/// Unrecognised symptom text stays visible as `None` rather than being
/// coerced to `No`.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    row: usize,
    pub age: f64,
    pub estrogen_level: f64,
    pub fsh_level: f64,
    pub years_since_last_period: f64,
    indicators: [Option<Indicator>; 7],
}

impl EncodedRecord {
    /// Encode one record. `row` is its zero-based position in the input and
    /// is carried into every error raised for this record.
    #[must_use]
    pub fn new(row: usize, record: &ClinicalRecord) -> Self {
        let indicators = Symptom::ALL.map(|s| Indicator::parse(record.symptom(s)));
        Self {
            row,
            age: record.age,
            estrogen_level: record.estrogen_level,
            fsh_level: record.fsh_level,
            years_since_last_period: record.years_since_last_period,
            indicators,
        }
    }

    /// Return the zero-based input row this record came from.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Return the indicator for a symptom, or `None` for a gap.
    #[must_use]
    pub fn indicator(&self, symptom: Symptom) -> Option<Indicator> {
        self.indicators[symptom.position()]
    }

    /// Return `true` only when the symptom is explicitly `Yes`.
    #[must_use]
    pub fn has(&self, symptom: Symptom) -> bool {
        self.indicator(symptom) == Some(Indicator::Yes)
    }

    /// Return the first symptom column holding a gap, if any.
    #[must_use]
    pub fn first_gap(&self) -> Option<Symptom> {
        Symptom::ALL.into_iter().find(|&s| self.indicator(s).is_none())
    }

    /// Assemble the fixed-order feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::MissingIndicator`] naming the first symptom
    /// column that holds a gap.
    pub fn feature_vector(&self) -> Result<Vec<f64>, PrepError> {
        let mut features = Vec::with_capacity(N_FEATURES);
        features.extend([
            self.age,
            self.estrogen_level,
            self.fsh_level,
            self.years_since_last_period,
        ]);
        for symptom in Symptom::ALL {
            let indicator = self.indicator(symptom).ok_or(PrepError::MissingIndicator {
                row: self.row,
                column: symptom.column(),
            })?;
            features.push(indicator.value());
        }
        Ok(features)
    }
}

/// Encode every record, numbering rows from zero.
#[must_use]
pub fn encode_records(records: &[ClinicalRecord]) -> Vec<EncodedRecord> {
    records
        .iter()
        .enumerate()
        .map(|(row, record)| EncodedRecord::new(row, record))
        .collect()
}

/// Build the row-major feature matrix.
///
/// # Errors
///
/// Returns the first [`PrepError::MissingIndicator`] encountered.
pub fn feature_matrix(records: &[EncodedRecord]) -> Result<Vec<Vec<f64>>, PrepError> {
    records.iter().map(EncodedRecord::feature_vector).collect()
}

#[cfg(test)]
pub(crate) fn record(age: f64, years_since_last_period: f64, symptoms: [&str; 7]) -> ClinicalRecord {
    ClinicalRecord {
        age,
        estrogen_level: 50.0,
        fsh_level: 10.0,
        years_since_last_period,
        symptoms: symptoms.map(String::from),
    }
}
