//! Loading document fixtures described as [`NodeSpec`] lists.

use std::path::Path;

use formset_dom::{Document, NodeSpec};
use tracing::debug;

use crate::decode::read_file;
use crate::error::LoadError;

/// Builds a [`Document`] from a JSON or YAML list of node specs.
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    let specs: Vec<NodeSpec> = read_file(path)?;
    let document = Document::from_specs(&specs).map_err(|source| LoadError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), top_level = specs.len(), "Loaded document fixture");
    Ok(document)
}
