//! Filesystem utilities.

use crate::store::{SystemProperties, USER_DIR};
use commons_types::{PropertyStore, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Create `path` and every missing parent directory.
///
/// Calling it again on an existing directory does nothing. Returns the
/// input path.
pub fn create_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

/// Express `path` relative to the `user.dir` property.
///
/// When no relative form exists (the path is relative itself, or lives
/// under a different root) the path is returned unchanged.
pub fn get_relative(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let relative = SystemProperties
        .get(USER_DIR)
        .map(PathBuf::from)
        .filter(|base| base.is_absolute() && path.is_absolute())
        .and_then(|base| pathdiff::diff_paths(path, base));
    relative.unwrap_or_else(|| path.to_path_buf())
}
