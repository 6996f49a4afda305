//! Preprocessing for menopause stage training: rule-based stage labels,
//! Yes/No indicator encoding, label encoding, standardization and
//! stratified splitting.

mod artifact;
mod encode;
mod error;
mod label;
mod record;
mod scaler;
mod split;
mod stage;

pub use encode::{
    EncodedRecord, FEATURE_NAMES, Indicator, N_FEATURES, encode_records, feature_matrix,
    feature_names,
};
pub use error::PrepError;
pub use label::LabelEncoding;
pub use record::{
    AGE, ClinicalRecord, ESTROGEN_LEVEL, FSH_LEVEL, Symptom, YEARS_SINCE_LAST_PERIOD,
};
pub use scaler::StandardScaler;
pub use split::{SplitIndices, StratifiedSplit};
pub use stage::{
    PERIMENOPAUSE_MIN_AGE, POSTMENOPAUSE_MIN_YEARS, StageLabel, derive_stage, derive_stages,
};
