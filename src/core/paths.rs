//! Session path helpers

use std::path::{Path, PathBuf};

/// Get the .geocoin session directory for a given root
pub fn session_dir(root: &Path) -> PathBuf {
    root.join(".geocoin")
}

/// File holding the value stored under `key`
pub fn storage_file(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", key))
}
