//! Run configuration: diff options, algorithm choice and config-file loading.
//!
//! A run is described by a single immutable [`RunConfig`]. It is assembled once
//! (config file first, then command-line flags on top) and then passed by
//! reference through the whole pipeline.
//!
//! # Examples
//!
//! ```
//! use xmldiff_rs::options::DiffOptions;
//!
//! let from_file = DiffOptions { ignore_comments: true, ..Default::default() };
//! let from_cli = DiffOptions { ignore_prefixes: true, ..Default::default() };
//!
//! let merged = from_file | from_cli;
//! assert!(merged.ignore_comments && merged.ignore_prefixes);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::BitOr;
use std::path::{Path, PathBuf};

/// Extension compared when none is configured.
pub const DEFAULT_EXTENSION: &str = "xsd";

/// Independent ignore policies. All flags off means a structurally exact,
/// order-sensitive comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffOptions {
    pub ignore_child_order: bool,
    pub ignore_processing_instructions: bool,
    pub ignore_comments: bool,
    pub ignore_xml_declaration: bool,
    pub ignore_whitespace: bool,
    pub ignore_dtd: bool,
    pub ignore_namespaces: bool,
    pub ignore_prefixes: bool,
    /// Parse inputs as fragments instead of whole documents.
    pub compare_fragments: bool,
}

impl DiffOptions {
    /// Returns true if no flag is set.
    pub fn is_exact(&self) -> bool {
        *self == Self::default()
    }
}

impl BitOr for DiffOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            ignore_child_order: self.ignore_child_order || rhs.ignore_child_order,
            ignore_processing_instructions: self.ignore_processing_instructions
                || rhs.ignore_processing_instructions,
            ignore_comments: self.ignore_comments || rhs.ignore_comments,
            ignore_xml_declaration: self.ignore_xml_declaration || rhs.ignore_xml_declaration,
            ignore_whitespace: self.ignore_whitespace || rhs.ignore_whitespace,
            ignore_dtd: self.ignore_dtd || rhs.ignore_dtd,
            ignore_namespaces: self.ignore_namespaces || rhs.ignore_namespaces,
            ignore_prefixes: self.ignore_prefixes || rhs.ignore_prefixes,
            compare_fragments: self.compare_fragments || rhs.compare_fragments,
        }
    }
}

/// Cost/accuracy trade-off of the diff engine's child matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmChoice {
    /// Let the engine pick by input size
    #[default]
    Auto,
    /// Most accurate, most expensive matching
    Precise,
    /// Cheaper heuristic matching
    Fast,
}

/// Everything a batch run needs. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub root_a: PathBuf,
    pub root_b: PathBuf,
    pub results: PathBuf,
    /// File extension without the leading dot, matched case-insensitively
    pub extension: String,
    pub recursive: bool,
    pub options: DiffOptions,
    pub algorithm: AlgorithmChoice,
}

impl RunConfig {
    pub fn new(root_a: impl Into<PathBuf>, root_b: impl Into<PathBuf>, results: impl Into<PathBuf>) -> Self {
        Self {
            root_a: root_a.into(),
            root_b: root_b.into(),
            results: results.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            recursive: false,
            options: DiffOptions::default(),
            algorithm: AlgorithmChoice::default(),
        }
    }
}

/// The on-disk shape of a config file. Every field is optional; the command
/// line fills in or overrides what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub root_a: Option<PathBuf>,
    pub root_b: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub extension: Option<String>,
    pub recursive: Option<bool>,
    pub algorithm: Option<AlgorithmChoice>,
    pub options: DiffOptions,
}

/// Loads a config file, picking the format from the extension
/// (`.toml`, `.yaml`/`.yml`, `.json`).
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ConfigRead {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("toml") => {
            toml::from_str(&content).map_err(|e| ConfigError::config_invalid(path, e.to_string()))
        }
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::config_invalid(path, e.to_string())),
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| ConfigError::config_invalid(path, e.to_string())),
        _ => Err(ConfigError::config_invalid(
            path,
            "unsupported config format (expected .toml, .yaml, .yml or .json)",
        )),
    }
}

/// Strips a leading dot and lowercases an extension filter.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_exact() {
        assert!(DiffOptions::default().is_exact());
        let opts = DiffOptions {
            ignore_dtd: true,
            ..Default::default()
        };
        assert!(!opts.is_exact());
    }

    #[test]
    fn test_bitor_is_union() {
        let a = DiffOptions {
            ignore_child_order: true,
            ..Default::default()
        };
        let b = DiffOptions {
            compare_fragments: true,
            ignore_whitespace: true,
            ..Default::default()
        };
        let merged = a | b;
        assert!(merged.ignore_child_order);
        assert!(merged.compare_fragments);
        assert!(merged.ignore_whitespace);
        assert!(!merged.ignore_comments);
        assert_eq!(merged | merged, merged);
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".XSD"), "xsd");
        assert_eq!(normalize_extension("xml"), "xml");
    }

    #[test]
    fn test_algorithm_deserialize() {
        let cfg: FileConfig = toml::from_str("algorithm = \"precise\"").unwrap();
        assert_eq!(cfg.algorithm, Some(AlgorithmChoice::Precise));
    }
}
