//! Discovery of file pairs between two directory roots.
//!
//! A pair is formed for every file that exists under both roots with the same
//! relative path and the configured extension. Files present on only one side
//! are returned separately; they are not errors and are never compared.

use crate::error::ConfigError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Two files to compare. Both paths are expected to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePair {
    pub path_a: PathBuf,
    pub path_b: PathBuf,
    pub display_a: String,
    pub display_b: String,
    /// Path relative to the roots; just the file name for a single-pair run
    pub relative: PathBuf,
}

impl FilePair {
    /// Builds a pair whose display names are the files' base names.
    pub fn new(path_a: impl Into<PathBuf>, path_b: impl Into<PathBuf>) -> Self {
        let path_a = path_a.into();
        let path_b = path_b.into();
        let relative = PathBuf::from(base_name(&path_a));
        Self {
            display_a: base_name(&path_a),
            display_b: base_name(&path_b),
            path_a,
            path_b,
            relative,
        }
    }

    fn under_roots(root_a: &Path, root_b: &Path, relative: &Path) -> Self {
        let mut pair = Self::new(root_a.join(relative), root_b.join(relative));
        pair.relative = relative.to_path_buf();
        pair
    }

    /// Base name of the original-side file.
    pub fn file_name(&self) -> String {
        base_name(&self.path_a)
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Result of matching two roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing {
    pub pairs: Vec<FilePair>,
    pub only_in_a: Vec<PathBuf>,
    pub only_in_b: Vec<PathBuf>,
}

/// Checks that `path` exists, is a directory and can be listed.
pub fn check_directory(role: &'static str, path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::missing_directory(role, path));
    }
    if !path.is_dir() {
        return Err(ConfigError::not_a_directory(role, path));
    }
    fs::read_dir(path).map_err(|e| ConfigError::unreadable_directory(role, path, e))?;
    Ok(())
}

/// Finds all same-named files with `extension` under both roots.
///
/// Both roots are validated before anything is listed. Pairs come back sorted
/// by relative path.
pub fn find_pairs(
    root_a: &Path,
    root_b: &Path,
    extension: &str,
    recursive: bool,
) -> Result<Pairing, ConfigError> {
    check_directory("Original", root_a)?;
    check_directory("Compare", root_b)?;

    let files_a = list_files("Original", root_a, extension, recursive)?;
    let files_b = list_files("Compare", root_b, extension, recursive)?;

    let pairs = files_a
        .intersection(&files_b)
        .map(|relative| FilePair::under_roots(root_a, root_b, relative))
        .collect();

    let only_in_a: Vec<PathBuf> = files_a.difference(&files_b).cloned().collect();
    let only_in_b: Vec<PathBuf> = files_b.difference(&files_a).cloned().collect();

    for path in &only_in_a {
        tracing::debug!(file = %path.display(), "only in original root, skipped");
    }
    for path in &only_in_b {
        tracing::debug!(file = %path.display(), "only in compare root, skipped");
    }

    Ok(Pairing {
        pairs,
        only_in_a,
        only_in_b,
    })
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Relative paths of the matching files under `root`.
fn list_files(
    role: &'static str,
    root: &Path,
    extension: &str,
    recursive: bool,
) -> Result<BTreeSet<PathBuf>, ConfigError> {
    let mut files = BTreeSet::new();

    if !recursive {
        let entries =
            fs::read_dir(root).map_err(|e| ConfigError::unreadable_directory(role, root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::unreadable_directory(role, root, e))?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, extension) {
                files.insert(PathBuf::from(entry.file_name()));
            }
        }
        return Ok(files);
    }

    for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.insert(relative.to_path_buf());
            }
        }
    }

    Ok(files)
}
