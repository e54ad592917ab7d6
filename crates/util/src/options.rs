//! Resolution and loading of the formset options file.
//!
//! Options come from, in order: an explicit path given by the caller, the
//! file named by [`OPTIONS_PATH_ENV`], or `options.json` in the standard
//! configuration directory (`~/.config/formset/options.json` on most
//! platforms). Only an explicit path must exist.

use std::env;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use formset_types::FormsetOptions;
use tracing::{debug, warn};

use crate::decode::read_file;
use crate::error::LoadError;
use crate::expand_tilde;

/// Environment variable allowing callers to override the options file path.
pub const OPTIONS_PATH_ENV: &str = "FORMSET_OPTIONS_PATH";

/// Default filename for the options payload.
pub const OPTIONS_FILE_NAME: &str = "options.json";

pub fn default_options_path() -> PathBuf {
    if let Ok(path) = env::var(OPTIONS_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("formset").join(OPTIONS_FILE_NAME)
}

/// Loads options from `explicit_path`, or from [`default_options_path`] when `None`.
///
/// A missing or unreadable default file falls back to [`FormsetOptions::default`];
/// any failure on an explicit path is returned.
pub fn load_options(explicit_path: Option<&Path>) -> Result<FormsetOptions, LoadError> {
    if let Some(path) = explicit_path {
        return load_options_from_path(path);
    }

    let path = default_options_path();
    match load_options_from_path(&path) {
        Ok(options) => Ok(options),
        Err(LoadError::NotFound { .. }) => {
            debug!(path = %path.display(), "No options file; using defaults");
            Ok(FormsetOptions::default())
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "Failed to load options file; using defaults");
            Ok(FormsetOptions::default())
        }
    }
}

pub fn load_options_from_path(path: &Path) -> Result<FormsetOptions, LoadError> {
    let options: FormsetOptions = read_file(path)?;
    debug!(path = %path.display(), prefix = %options.prefix, "Loaded formset options");
    Ok(options)
}
