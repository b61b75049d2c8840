//! XMLDIFF - Batch comparison of XML and XSD files.
//!
//! Two directory trees are matched file by file. Each pair is canonicalized
//! (sibling elements sorted by name and `name` attribute, attributes and
//! namespace declarations normalized), diffed, and if anything differs a
//! color-coded side-by-side HTML report is written to the results directory.
//!
//! # Example
//!
//! ```no_run
//! use xmldiff_rs::{run_batch, CancelToken, HtmlTableRenderer, RunConfig, TreeDiffEngine};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = RunConfig::new("schemas/v1", "schemas/v2", "reports");
//! config.options.ignore_comments = true;
//!
//! let summary = run_batch(&config, &TreeDiffEngine, &HtmlTableRenderer, &CancelToken::new())?;
//! for entry in &summary.different {
//!     println!("{} -> {}", entry.file, entry.report.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod canonical;
pub mod compare;
pub mod diff;
pub mod error;
pub mod matcher;
pub mod options;
pub mod output;
pub mod parser;
pub mod render;
pub mod report;
pub mod tree;

// Re-export commonly used types for convenience
pub use canonical::{canonicalize, CanonicalDocument};
pub use compare::{run_batch, run_single, BatchSummary, CancelToken, Comparator, ReportEntry};
pub use diff::{ComparisonResult, DiffEngine, DiffScript, DiffStats, DiffView, TreeDiffEngine};
pub use error::{ConfigError, OutputError, PairError, ParseError, ReportError, XmlDiffError};
pub use matcher::{find_pairs, FilePair, Pairing};
pub use options::{load_config, AlgorithmChoice, DiffOptions, FileConfig, RunConfig};
pub use output::{format_summary, OutputFormat};
pub use parser::{parse_file, parse_str};
pub use render::{DiffRenderer, HtmlTableRenderer};
pub use report::ReportBuilder;
pub use tree::Document;
