//! Helpers shared by the formset binaries: configuration path resolution and
//! loading of options and document fixtures from JSON or YAML files.

pub mod decode;
pub mod document;
pub mod error;
pub mod options;
pub mod path_processing;

pub use decode::{decode_str, read_file};
pub use document::load_document;
pub use error::LoadError;
pub use options::{OPTIONS_FILE_NAME, OPTIONS_PATH_ENV, default_options_path, load_options, load_options_from_path};
pub use path_processing::{FileFormat, expand_tilde};
