//! Raw clinical records as they appear in the input table.

use std::fmt;

/// Column name of the patient's age in years.
pub const AGE: &str = "Age";
/// Column name of the serum estrogen level.
pub const ESTROGEN_LEVEL: &str = "Estrogen_Level";
/// Column name of the follicle-stimulating hormone level.
pub const FSH_LEVEL: &str = "FSH_Level";
/// Column name of the years elapsed since the last menstrual period.
pub const YEARS_SINCE_LAST_PERIOD: &str = "Years_Since_Last_Period";

/// One of the seven Yes/No symptom columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symptom {
    IrregularPeriods,
    MissedPeriods,
    HotFlashes,
    NightSweats,
    SleepProblems,
    VaginalDryness,
    JointPain,
}

impl Symptom {
    /// All symptoms in feature-column order.
    pub const ALL: [Symptom; 7] = [
        Symptom::IrregularPeriods,
        Symptom::MissedPeriods,
        Symptom::HotFlashes,
        Symptom::NightSweats,
        Symptom::SleepProblems,
        Symptom::VaginalDryness,
        Symptom::JointPain,
    ];

    /// Return the input column name for this symptom.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Symptom::IrregularPeriods => "Irregular_Periods",
            Symptom::MissedPeriods => "Missed_Periods",
            Symptom::HotFlashes => "Hot_Flashes",
            Symptom::NightSweats => "Night_Sweats",
            Symptom::SleepProblems => "Sleep_Problems",
            Symptom::VaginalDryness => "Vaginal_Dryness",
            Symptom::JointPain => "Joint_Pain",
        }
    }

    /// Return the position of this symptom in [`Symptom::ALL`].
    #[must_use]
    pub fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A single row of clinical input.
///
/// Numeric attributes are parsed; symptom attributes keep their raw text
/// (expected to be `"Yes"` or `"No"`) until encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalRecord {
    pub age: f64,
    pub estrogen_level: f64,
    pub fsh_level: f64,
    pub years_since_last_period: f64,
    /// Raw symptom text in [`Symptom::ALL`] order.
    pub symptoms: [String; 7],
}

impl ClinicalRecord {
    /// Return the raw text recorded for a symptom.
    #[must_use]
    pub fn symptom(&self, symptom: Symptom) -> &str {
        &self.symptoms[symptom.position()]
    }
}
