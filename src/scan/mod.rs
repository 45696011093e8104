//! Module folder enumeration
//!
//! Lists the child folders of the Morn modules root. Each folder name is
//! the source of one derived define symbol.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Errors during module folder enumeration
#[derive(Debug, Error)]
pub enum ScanError {
    /// The modules root does not exist
    #[error("modules root not found: {0}")]
    RootNotFound(PathBuf),

    /// Underlying traversal failure
    #[error("failed to enumerate module folders: {0}")]
    Walk(#[from] walkdir::Error),
}

/// List the names of all direct child folders under `root`, sorted.
///
/// Files and nested folders are ignored; only one level is scanned.
pub fn list_module_folders(root: &Path) -> Result<Vec<String>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }

    let mut folders = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            folders.push(name.to_string());
        }
    }

    folders.sort();
    Ok(folders)
}
