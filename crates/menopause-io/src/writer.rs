//! Artifact persistence: stage every blob, then rename them into place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::IoError;

/// File name of the serialized forest.
pub const MODEL_FILE: &str = "rf_model.bin";
/// File name of the serialized scaler statistics.
pub const SCALER_FILE: &str = "scaler.bin";
/// File name of the serialized label encoding.
pub const ENCODER_FILE: &str = "label_encoder.bin";
/// File listing every artifact of the last complete write, with its size.
/// Written last and removed before the first rename.
pub const MANIFEST_FILE: &str = "MANIFEST";

/// A named byte blob destined for the output directory.
#[derive(Debug, Clone)]
pub struct Artifact<'a> {
    /// File name inside the output directory.
    pub name: &'a str,
    /// Encoded contents.
    pub bytes: &'a [u8],
}

/// Writes artifact blobs into a directory.
///
/// Creates the directory on construction if it does not exist. A write
/// first stages every blob in a temporary file inside the directory
/// (written, flushed and synced), and only then renames each one over its
/// final name, in the order given. If any staging step fails, no final
/// name is touched and the temporary files are removed.
///
/// A [`MANIFEST_FILE`] naming every blob and its size is renamed into place
/// after the blobs. The previous manifest is removed before the first
/// rename, so a write interrupted between renames leaves no manifest and
/// [`verify_artifacts`] reports the set as incomplete.
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer targeting `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display()))]
    pub fn new(output_dir: &Path) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Return the directory artifacts are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Return the final path for an artifact name.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Stage then persist `artifacts`, overwriting existing files of the same name.
    ///
    /// Returns the final paths in input order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::StageFile`] | a temporary file could not be created, written or synced |
    /// | [`IoError::PersistFile`] | a staged file could not be renamed into place |
    #[instrument(skip_all, fields(dir = %self.output_dir.display(), n_artifacts = artifacts.len()))]
    pub fn write_all(&self, artifacts: &[Artifact<'_>]) -> Result<Vec<PathBuf>, IoError> {
        let mut staged = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let path = self.path_for(artifact.name);
            let tmp = self.stage_at(&path, artifact.bytes)?;
            debug!(name = artifact.name, size_bytes = artifact.bytes.len(), "artifact staged");
            staged.push((tmp, path));
        }
        let manifest_path = self.path_for(MANIFEST_FILE);
        let manifest = self.stage_at(&manifest_path, render_manifest(artifacts).as_bytes())?;

        match fs::remove_file(&manifest_path) {
            Ok(()) => debug!("previous manifest removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(IoError::PersistFile {
                    path: manifest_path,
                    source: e,
                });
            }
        }

        let mut written = Vec::with_capacity(staged.len());
        for (tmp, path) in staged {
            persist(tmp, &path)?;
            info!(path = %path.display(), "artifact written");
            written.push(path);
        }
        persist(manifest, &manifest_path)?;
        debug!(path = %manifest_path.display(), "manifest written");

        sync_dir(&self.output_dir);
        Ok(written)
    }

    fn stage_at(&self, path: &Path, bytes: &[u8]) -> Result<NamedTempFile, IoError> {
        stage(&self.output_dir, bytes).map_err(|e| IoError::StageFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<(), IoError> {
    tmp.persist(path).map_err(|e| IoError::PersistFile {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// One `name size` line per artifact.
fn render_manifest(artifacts: &[Artifact<'_>]) -> String {
    artifacts
        .iter()
        .map(|a| format!("{} {}\n", a.name, a.bytes.len()))
        .collect()
}

/// Check that `dir` holds a complete artifact set containing `required`.
///
/// The manifest must exist, list every name in `required`, and every listed
/// file must exist with the recorded size.
///
/// # Errors
///
/// Returns [`IoError::IncompleteArtifacts`] describing the first problem found.
#[instrument(skip(required), fields(dir = %dir.display()))]
pub fn verify_artifacts(dir: &Path, required: &[&str]) -> Result<(), IoError> {
    let incomplete = |reason: String| IoError::IncompleteArtifacts {
        dir: dir.to_path_buf(),
        reason,
    };
    let manifest = fs::read_to_string(dir.join(MANIFEST_FILE))
        .map_err(|e| incomplete(format!("cannot read {MANIFEST_FILE}: {e}")))?;

    let mut listed = Vec::new();
    for line in manifest.lines().filter(|l| !l.trim().is_empty()) {
        let (name, size) = line
            .rsplit_once(' ')
            .and_then(|(name, size)| Some((name, size.parse::<u64>().ok()?)))
            .ok_or_else(|| incomplete(format!("malformed manifest line {line:?}")))?;
        let actual = fs::metadata(dir.join(name))
            .map_err(|e| incomplete(format!("{name}: {e}")))?
            .len();
        if actual != size {
            return Err(incomplete(format!(
                "{name} is {actual} bytes, manifest records {size}"
            )));
        }
        listed.push(name);
    }
    if let Some(missing) = required.iter().find(|&&r| !listed.contains(&r)) {
        return Err(incomplete(format!("{missing} not listed in {MANIFEST_FILE}")));
    }
    debug!(n_artifacts = listed.len(), "artifact set complete");
    Ok(())
}

/// Write `bytes` to a new temporary file in `dir` and sync it to disk.
fn stage(dir: &Path, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Flush directory entries after renames. Best effort: not every platform
/// can open a directory as a file.
fn sync_dir(dir: &Path) {
    if let Ok(handle) = fs::File::open(dir) {
        let _ = handle.sync_all();
    }
}

/// Read an artifact file in full.
///
/// # Errors
///
/// Returns [`IoError::ReadFile`] if the file cannot be read.
#[instrument(fields(path = %path.display()))]
pub fn read_artifact(path: &Path) -> Result<Vec<u8>, IoError> {
    let bytes = fs::read(path).map_err(|e| IoError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(size_bytes = bytes.len(), "artifact read");
    Ok(bytes)
}
