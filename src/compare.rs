//! Comparison of file pairs and batch runs over two directory roots.
//!
//! Per pair the steps are fixed: parse and canonicalize both sides, ask the
//! diff engine whether they differ, and only if they do, build the diff view
//! and write the HTML report. Equal pairs never produce a report file, so the
//! absence of `<name>_compare.html` means "no differences".
//!
//! Everything happens in memory; the report is the only file written. Pairs
//! are independent of each other, and a failing pair is recorded in the
//! summary without stopping the batch.

use crate::canonical::{canonicalize, CanonicalDocument};
use crate::diff::{ComparisonResult, DiffEngine, DiffStats};
use crate::error::{ConfigError, PairError, ParseError};
use crate::matcher::{check_directory, find_pairs, FilePair};
use crate::options::{AlgorithmChoice, DiffOptions, RunConfig};
use crate::parser::parse_file;
use crate::render::DiffRenderer;
use crate::report::{remove_stale_report, report_path, write_report, ReportBuilder};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation, checked before each pair is started.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Compares pairs with one fixed set of options.
pub struct Comparator<'a> {
    options: DiffOptions,
    algorithm: AlgorithmChoice,
    engine: &'a dyn DiffEngine,
    renderer: &'a dyn DiffRenderer,
}

impl<'a> Comparator<'a> {
    pub fn new(
        options: DiffOptions,
        algorithm: AlgorithmChoice,
        engine: &'a dyn DiffEngine,
        renderer: &'a dyn DiffRenderer,
    ) -> Self {
        Self {
            options,
            algorithm,
            engine,
            renderer,
        }
    }

    /// Canonicalizes and diffs a pair without writing anything.
    pub fn diff_pair(&self, pair: &FilePair) -> Result<ComparisonResult, ParseError> {
        let (old, new) = self.load(pair)?;
        Ok(self.engine.diff(&old, &new, &self.options, self.algorithm))
    }

    /// Compares a pair and writes its report into `results` if it differs.
    ///
    /// A report left by an earlier run is removed first, so after an equal or
    /// failed comparison no report for the pair exists.
    pub fn compare_pair(&self, pair: &FilePair, results: &Path) -> Result<ComparisonResult, PairError> {
        if remove_stale_report(results, pair)? {
            tracing::debug!(file = %pair.relative.display(), "removed stale report");
        }

        let (old, new) = self.load(pair)?;

        let result = self.engine.diff(&old, &new, &self.options, self.algorithm);
        if let ComparisonResult::Different(_) = &result {
            let view = self.engine.view(&old, &new, &self.options, self.algorithm);
            let html = ReportBuilder::new(self.renderer).render(pair, &view);
            let path = write_report(results, pair, &html)?;
            tracing::info!(report = %path.display(), "wrote report");
        }

        Ok(result)
    }

    fn load(&self, pair: &FilePair) -> Result<(CanonicalDocument, CanonicalDocument), ParseError> {
        let fragment = self.options.compare_fragments;
        let old = canonicalize(parse_file(&pair.path_a, fragment)?);
        let new = canonicalize(parse_file(&pair.path_b, fragment)?);
        Ok((old, new))
    }
}

/// A differing pair and where its report went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub file: String,
    pub report: PathBuf,
    pub stats: DiffStats,
}

/// A pair that could not be compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntry {
    pub file: String,
    pub error: String,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub compared: usize,
    pub identical: Vec<String>,
    pub different: Vec<ReportEntry>,
    pub failed: Vec<FailedEntry>,
    pub only_in_a: Vec<String>,
    pub only_in_b: Vec<String>,
    pub cancelled: bool,
}

impl BatchSummary {
    /// 0 = nothing differs, 1 = differences found, 2 = a pair failed or the
    /// run was cancelled.
    pub fn exit_code(&self) -> i32 {
        if !self.failed.is_empty() || self.cancelled {
            2
        } else if !self.different.is_empty() {
            1
        } else {
            0
        }
    }

    fn record(&mut self, pair: &FilePair, results: &Path, outcome: Result<ComparisonResult, PairError>) {
        let file = pair.relative.to_string_lossy().to_string();
        self.compared += 1;
        match outcome {
            Ok(ComparisonResult::Equal) => {
                tracing::debug!(file = %file, "identical");
                self.identical.push(file);
            }
            Ok(ComparisonResult::Different(script)) => {
                tracing::debug!(file = %file, changes = script.stats.total_changes(), "different");
                self.different.push(ReportEntry {
                    file,
                    report: report_path(results, pair),
                    stats: script.stats,
                });
            }
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "skipping pair");
                self.failed.push(FailedEntry {
                    file,
                    error: err.to_string(),
                });
            }
        }
    }
}

/// Compares every pair found under the two roots of `config`.
///
/// # Errors
///
/// Returns a `ConfigError` before any pair is touched if a root or the results
/// directory is missing or unreadable. Per-pair failures end up in
/// [`BatchSummary::failed`].
pub fn run_batch(
    config: &RunConfig,
    engine: &dyn DiffEngine,
    renderer: &dyn DiffRenderer,
    cancel: &CancelToken,
) -> Result<BatchSummary, ConfigError> {
    let pairing = find_pairs(&config.root_a, &config.root_b, &config.extension, config.recursive)?;
    check_directory("Results", &config.results)?;

    tracing::info!(
        original = %config.root_a.display(),
        compare = %config.root_b.display(),
        pairs = pairing.pairs.len(),
        "starting batch"
    );

    let comparator = Comparator::new(config.options, config.algorithm, engine, renderer);
    let mut summary = BatchSummary {
        only_in_a: pairing.only_in_a.iter().map(|p| p.to_string_lossy().to_string()).collect(),
        only_in_b: pairing.only_in_b.iter().map(|p| p.to_string_lossy().to_string()).collect(),
        ..Default::default()
    };

    for pair in &pairing.pairs {
        if cancel.is_cancelled() {
            tracing::warn!(remaining = pairing.pairs.len() - summary.compared, "batch cancelled");
            summary.cancelled = true;
            break;
        }
        let outcome = comparator.compare_pair(pair, &config.results);
        summary.record(pair, &config.results, outcome);
    }

    tracing::info!(
        compared = summary.compared,
        different = summary.different.len(),
        failed = summary.failed.len(),
        "batch finished"
    );

    Ok(summary)
}

/// Compares a single pair of files given directly on the command line.
pub fn run_single(
    pair: &FilePair,
    results: &Path,
    options: DiffOptions,
    algorithm: AlgorithmChoice,
    engine: &dyn DiffEngine,
    renderer: &dyn DiffRenderer,
) -> Result<BatchSummary, ConfigError> {
    check_directory("Results", results)?;

    let comparator = Comparator::new(options, algorithm, engine, renderer);
    let mut summary = BatchSummary::default();
    let outcome = comparator.compare_pair(pair, results);
    summary.record(pair, results, outcome);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::TreeDiffEngine;
    use crate::render::HtmlTableRenderer;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_exit_codes() {
        let mut summary = BatchSummary::default();
        assert_eq!(summary.exit_code(), 0);
        summary.different.push(ReportEntry {
            file: "a.xsd".to_string(),
            report: PathBuf::from("a.xsd_compare.html"),
            stats: DiffStats::new(),
        });
        assert_eq!(summary.exit_code(), 1);
        summary.failed.push(FailedEntry {
            file: "b.xsd".to_string(),
            error: "bad".to_string(),
        });
        assert_eq!(summary.exit_code(), 2);
    }

    #[test]
    fn test_equal_pair_removes_stale_report() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let out = dir.path().join("out");
        for d in [&a, &b, &out] {
            fs::create_dir(d).unwrap();
        }
        fs::write(a.join("s.xsd"), "<s/>").unwrap();
        fs::write(b.join("s.xsd"), "<s/>").unwrap();
        fs::write(out.join("s.xsd_compare.html"), "old").unwrap();

        let comparator = Comparator::new(
            DiffOptions::default(),
            AlgorithmChoice::Auto,
            &TreeDiffEngine,
            &HtmlTableRenderer,
        );
        let pair = FilePair::new(a.join("s.xsd"), b.join("s.xsd"));
        let result = comparator.compare_pair(&pair, &out).unwrap();
        assert!(result.is_equal());
        assert!(!out.join("s.xsd_compare.html").exists());
    }

    #[test]
    fn test_failed_pair_removes_stale_report() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(dir.path().join("a.xsd"), "<s>").unwrap();
        fs::write(dir.path().join("b.xsd"), "<s/>").unwrap();
        fs::write(out.join("a.xsd_compare.html"), "old").unwrap();

        let comparator = Comparator::new(
            DiffOptions::default(),
            AlgorithmChoice::Auto,
            &TreeDiffEngine,
            &HtmlTableRenderer,
        );
        let pair = FilePair::new(dir.path().join("a.xsd"), dir.path().join("b.xsd"));
        let err = comparator.compare_pair(&pair, &out).unwrap_err();
        assert!(matches!(err, PairError::Parse(ParseError::XmlError { .. })));
        assert!(!out.join("a.xsd_compare.html").exists());
    }

    #[test]
    fn test_missing_file_is_pair_error() {
        let dir = TempDir::new().unwrap();
        let comparator = Comparator::new(
            DiffOptions::default(),
            AlgorithmChoice::Auto,
            &TreeDiffEngine,
            &HtmlTableRenderer,
        );
        let pair = FilePair::new(dir.path().join("x.xsd"), dir.path().join("y.xsd"));
        let err = comparator.compare_pair(&pair, dir.path()).unwrap_err();
        assert!(matches!(err, PairError::Parse(ParseError::FileNotFound { .. })));
    }
}
