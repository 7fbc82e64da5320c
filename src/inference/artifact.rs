//! Serialized model artifacts on disk

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use super::{InferenceError, InferenceResult};

/// Raw artifact bytes plus provenance
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub sha256: String,
}

impl Artifact {
    pub fn read(path: impl AsRef<Path>) -> InferenceResult<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = std::fs::read(&path).map_err(|source| InferenceError::Io {
            path: path.clone(),
            source,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let sha256 = hex::encode(hasher.finalize());

        tracing::debug!(path = %path.display(), size = bytes.len(), %sha256, "Read artifact");

        Ok(Self { path, bytes, sha256 })
    }

    /// Lower-cased file extension, if any
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn parse_json<T: DeserializeOwned>(&self) -> InferenceResult<T> {
        serde_json::from_slice(&self.bytes).map_err(|source| InferenceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_hashes_contents() {
        let mut file = tempfile::Builder::new().suffix(".JSON").tempfile().unwrap();
        file.write_all(b"abc").unwrap();

        let artifact = Artifact::read(file.path()).unwrap();
        assert_eq!(artifact.bytes, b"abc");
        assert_eq!(
            artifact.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(artifact.extension().as_deref(), Some("json"));
    }

    #[test]
    fn test_missing_file() {
        let err = Artifact::read("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, InferenceError::Io { .. }));
    }
}
