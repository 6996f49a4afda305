//! Rule-based menopause stage derivation.

use std::fmt;
use std::str::FromStr;

use crate::encode::EncodedRecord;
use crate::error::PrepError;
use crate::record::{AGE, Symptom, YEARS_SINCE_LAST_PERIOD};

/// Age from which symptomatic records count as perimenopausal.
pub const PERIMENOPAUSE_MIN_AGE: f64 = 40.0;

/// Years without a period after which a record counts as postmenopausal.
pub const POSTMENOPAUSE_MIN_YEARS: f64 = 1.0;

/// Menopause stage assigned to a record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum StageLabel {
    Premenopause,
    Perimenopause,
    Postmenopause,
}

impl StageLabel {
    /// Every stage, in clinical order.
    pub const ALL: [StageLabel; 3] = [
        StageLabel::Premenopause,
        StageLabel::Perimenopause,
        StageLabel::Postmenopause,
    ];

    /// Return the canonical label string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StageLabel::Premenopause => "Premenopause",
            StageLabel::Perimenopause => "Perimenopause",
            StageLabel::Postmenopause => "Postmenopause",
        }
    }
}

impl fmt::Display for StageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageLabel {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageLabel::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| PrepError::UnknownLabel {
                label: s.to_string(),
            })
    }
}

/// Assign a stage to one record. First match wins:
///
/// 1. `Years_Since_Last_Period >= 1` → [`StageLabel::Postmenopause`]
/// 2. `Age >= 40` and any of irregular periods, missed periods or hot
///    flashes → [`StageLabel::Perimenopause`]
/// 3. otherwise → [`StageLabel::Premenopause`]
///
/// A symptom gap never counts as present.
///
/// # Errors
///
/// Returns [`PrepError::NonFiniteAttribute`] when `Age` or
/// `Years_Since_Last_Period` is NaN or infinite.
pub fn derive_stage(record: &EncodedRecord) -> Result<StageLabel, PrepError> {
    for (column, value) in [
        (YEARS_SINCE_LAST_PERIOD, record.years_since_last_period),
        (AGE, record.age),
    ] {
        if !value.is_finite() {
            return Err(PrepError::NonFiniteAttribute {
                row: record.row(),
                column,
                value,
            });
        }
    }

    if record.years_since_last_period >= POSTMENOPAUSE_MIN_YEARS {
        return Ok(StageLabel::Postmenopause);
    }

    let symptomatic = [
        Symptom::IrregularPeriods,
        Symptom::MissedPeriods,
        Symptom::HotFlashes,
    ]
    .into_iter()
    .any(|s| record.has(s));

    if record.age >= PERIMENOPAUSE_MIN_AGE && symptomatic {
        Ok(StageLabel::Perimenopause)
    } else {
        Ok(StageLabel::Premenopause)
    }
}

/// Assign a stage to every record.
///
/// # Errors
///
/// Returns the first [`PrepError::NonFiniteAttribute`] encountered.
pub fn derive_stages(records: &[EncodedRecord]) -> Result<Vec<StageLabel>, PrepError> {
    records.iter().map(derive_stage).collect()
}
