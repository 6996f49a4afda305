//! File I/O for the menopause pipeline: clinical CSV input and artifact output.

mod error;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::ClinicalReader;
pub use writer::{
    Artifact, ArtifactWriter, ENCODER_FILE, MANIFEST_FILE, MODEL_FILE, SCALER_FILE,
    read_artifact, verify_artifacts,
};
