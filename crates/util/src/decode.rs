//! Reading JSON or YAML files into typed values.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::LoadError;
use crate::path_processing::FileFormat;

/// Reads `path` and deserializes it according to its extension.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound { path: path.to_path_buf() },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    decode_str(path, &content)
}

/// Deserializes `content` using the format implied by `path`.
pub fn decode_str<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, LoadError> {
    match FileFormat::from_path(path) {
        FileFormat::Json => serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
        FileFormat::Yaml => serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
    }
}
