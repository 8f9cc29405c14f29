//! Idempotent filesystem removal
//!
//! A target that is already gone counts as removed. Every other failure is
//! returned as the original `io::Error`.

use std::fs;
use std::io;
use std::path::Path;

/// Remove a file, or a whole directory tree when `tree` is true
///
/// Returns `Ok(())` when the target does not exist, so calling this twice on
/// the same path never fails the second time. Removing a directory with
/// `tree = false`, or a file with `tree = true`, fails with the platform's
/// error.
///
/// # Example
///
/// ```rust
/// use vutil_core::fs::remove_if_exists;
///
/// let dir = std::env::temp_dir().join("vutil-doc-remove");
/// std::fs::create_dir_all(dir.join("nested")).unwrap();
///
/// remove_if_exists(&dir, true).unwrap();
/// remove_if_exists(&dir, true).unwrap();
/// assert!(!dir.exists());
/// ```
pub fn remove_if_exists(path: impl AsRef<Path>, tree: bool) -> io::Result<()> {
    let path = path.as_ref();
    let result = if tree {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => {
            tracing::debug!(path = %path.display(), tree, "removed");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), tree, "nothing to remove");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Remove a single file if it exists
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> io::Result<()> {
    remove_if_exists(path, false)
}

/// Remove a directory and everything under it if it exists
pub fn remove_tree_if_exists(path: impl AsRef<Path>) -> io::Result<()> {
    remove_if_exists(path, true)
}
