//! Versioned bincode envelopes for preprocessing artifacts.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PrepError;

/// Current binary format version.
const FORMAT_VERSION: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct Envelope<P> {
    format_version: u32,
    kind: String,
    payload: P,
}

/// Encode `payload` as a `kind` artifact.
pub(crate) fn to_bytes<T: Serialize>(kind: &'static str, payload: &T) -> Result<Vec<u8>, PrepError> {
    let envelope = Envelope {
        format_version: FORMAT_VERSION,
        kind: kind.to_string(),
        payload,
    };
    bincode::serialize(&envelope).map_err(|source| PrepError::Serialize {
        artifact: kind,
        source,
    })
}

/// Leading fields of [`Envelope`], decodable without knowing the payload type.
#[derive(serde::Deserialize)]
struct Header {
    format_version: u32,
    kind: String,
}

/// Decode a `kind` artifact, checking the kind tag and format version.
pub(crate) fn from_bytes<T: DeserializeOwned>(
    kind: &'static str,
    bytes: &[u8],
) -> Result<T, PrepError> {
    let deserialize_err = |source| PrepError::Deserialize {
        artifact: kind,
        source,
    };
    let header: Header = bincode::deserialize(bytes).map_err(deserialize_err)?;
    if header.kind != kind {
        return Err(PrepError::WrongArtifact {
            expected: kind,
            found: header.kind,
        });
    }
    if header.format_version != FORMAT_VERSION {
        return Err(PrepError::IncompatibleVersion {
            artifact: kind,
            expected: FORMAT_VERSION,
            found: header.format_version,
        });
    }
    let envelope: Envelope<T> = bincode::deserialize(bytes).map_err(deserialize_err)?;
    Ok(envelope.payload)
}
