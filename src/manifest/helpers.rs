//! Project detection.
//!
//! A directory is a project root when it holds a manifest under the current
//! name (`drove.toml`) or, failing that, the legacy name (`Drovefile`). The
//! two are never merged: when both exist the current one wins.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::constants::{LEGACY_MANIFEST_FILE, MANIFEST_FILE};
use crate::core::DroveError;

/// Path of the manifest in `dir`, preferring the current file name.
///
/// Only `dir` itself is checked; no parent directories are searched.
#[must_use]
pub fn manifest_file_in(dir: &Path) -> Option<PathBuf> {
    [MANIFEST_FILE, LEGACY_MANIFEST_FILE]
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Whether `dir` contains a manifest.
#[must_use]
pub fn is_project_root(dir: &Path) -> bool {
    manifest_file_in(dir).is_some()
}

/// Walk from `start` up through its ancestors and return the first project
/// root.
///
/// # Errors
///
/// [`DroveError::ProjectNotFound`] when the filesystem root is reached
/// without finding a manifest.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if is_project_root(&current) {
            return Ok(current);
        }

        if !current.pop() {
            return Err(DroveError::ProjectNotFound {
                start: start.display().to_string(),
            }
            .into());
        }
    }
}
