use crate::error::{OnboardError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolve a bare file name to exactly one path under `root`.
///
/// The target must be a base name, not a path: anything containing a path
/// separator or a parent-directory segment is rejected before any traversal
/// happens, so a comment can never reach outside the checked-out tree.
///
/// When several files share the name, candidates are sorted lexicographically
/// and the first wins. This replaces the legacy first-match-in-traversal-order
/// behavior, which depended on filesystem enumeration order.
pub fn resolve(root: &Path, target: &str) -> Result<PathBuf> {
    if target.is_empty() {
        return Err(OnboardError::ArgumentMissing);
    }
    if target.contains('/') || target.contains('\\') || target == ".." {
        return Err(OnboardError::InvalidArgument(target.to_string()));
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name() == OsStr::new(target))
        .map(|entry| entry.into_path())
        .collect();

    if candidates.is_empty() {
        return Err(OnboardError::FileNotFound(target.to_string()));
    }

    candidates.sort();
    if candidates.len() > 1 {
        tracing::warn!(
            name = target,
            count = candidates.len(),
            chosen = %candidates[0].display(),
            "multiple files match; picking the lexicographically first"
        );
    }
    Ok(candidates.remove(0))
}
