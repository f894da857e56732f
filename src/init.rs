//! Workspace directory layout.
//!
//! Everything plotfind writes lives under a `.plotfind` directory at the
//! workspace root: the settings file and the embedding model cache.

use crate::config::Settings;
use std::path::PathBuf;

/// Directory where fastembed caches downloaded model files.
///
/// Resolves relative to the workspace root when one exists, otherwise the
/// current directory.
pub fn models_dir() -> PathBuf {
    let base = Settings::workspace_root().unwrap_or_else(|| PathBuf::from("."));
    base.join(".plotfind").join("models")
}
