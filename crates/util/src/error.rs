use std::path::PathBuf;

use thiserror::Error;

/// Error surfaced when an options or document file cannot be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// I/O failure other than a missing file (for example, permissions).
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// The fixture parsed but describes an impossible tree.
    #[error("invalid document in {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: formset_dom::DocumentError,
    },
}
