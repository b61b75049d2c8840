//! XMLDIFF command-line interface.
//!
//! Wires the library together: builds the run configuration from the config
//! file and flags, compares either two directory trees or two files, prints
//! a summary and exits with a status code scripts can test.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use xmldiff_rs::options::normalize_extension;
use xmldiff_rs::{
    format_summary, load_config, run_batch, run_single, AlgorithmChoice, CancelToken,
    ConfigError, DiffOptions, FilePair, FileConfig, HtmlTableRenderer, OutputFormat, RunConfig,
    TreeDiffEngine,
};

/// XMLDIFF - Batch comparison of XML and XSD files
///
/// Compares every same-named file of two directories (or two single files)
/// after canonicalization and writes an HTML report for each pair that differs.
#[derive(Parser)]
#[command(name = "xmldiff-rs")]
#[command(version)]
#[command(about = "Batch XML/XSD comparison with HTML diff reports", long_about = None)]
#[command(author = "XMLDIFF Contributors")]
struct Cli {
    /// Original directory or file
    #[arg(value_name = "PATH_A")]
    path_a: Option<PathBuf>,

    /// Directory or file to compare against the original
    #[arg(value_name = "PATH_B")]
    path_b: Option<PathBuf>,

    /// Directory the HTML reports are written to
    #[arg(short = 'o', long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// File extension to compare, without the dot
    #[arg(short = 'e', long, value_name = "EXT")]
    extension: Option<String>,

    /// Descend into subdirectories and match files by relative path
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Config file (.toml, .yaml or .json)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Match child elements regardless of their order
    #[arg(long)]
    ignore_child_order: bool,

    /// Ignore processing instructions
    #[arg(long = "ignore-pi")]
    ignore_processing_instructions: bool,

    /// Ignore comments
    #[arg(long)]
    ignore_comments: bool,

    /// Ignore the XML declaration
    #[arg(long = "ignore-xml-decl")]
    ignore_xml_declaration: bool,

    /// Collapse whitespace in text and attribute values before comparing
    #[arg(long)]
    ignore_whitespace: bool,

    /// Ignore the document type declaration
    #[arg(long)]
    ignore_dtd: bool,

    /// Compare element and attribute names by local name only
    #[arg(long)]
    ignore_namespaces: bool,

    /// Compare names by namespace URI, disregarding prefixes
    #[arg(long)]
    ignore_prefixes: bool,

    /// Parse inputs as XML fragments instead of whole documents
    #[arg(long = "fragments")]
    compare_fragments: bool,

    /// Child matching algorithm
    #[arg(short = 'a', long, value_enum)]
    algorithm: Option<AlgorithmArg>,

    /// Output format of the summary
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Verbose output (log every pair)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (no summary, exit code only)
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            ignore_child_order: self.ignore_child_order,
            ignore_processing_instructions: self.ignore_processing_instructions,
            ignore_comments: self.ignore_comments,
            ignore_xml_declaration: self.ignore_xml_declaration,
            ignore_whitespace: self.ignore_whitespace,
            ignore_dtd: self.ignore_dtd,
            ignore_namespaces: self.ignore_namespaces,
            ignore_prefixes: self.ignore_prefixes,
            compare_fragments: self.compare_fragments,
        }
    }
}

/// Algorithm argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum AlgorithmArg {
    /// Pick by input size
    Auto,
    /// Most accurate matching
    Precise,
    /// Cheaper heuristic matching
    Fast,
}

impl From<AlgorithmArg> for AlgorithmChoice {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Auto => AlgorithmChoice::Auto,
            AlgorithmArg::Precise => AlgorithmChoice::Precise,
            AlgorithmArg::Fast => AlgorithmChoice::Fast,
        }
    }
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON representation
    Json,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let file_config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => FileConfig::default(),
    };

    let config = build_config(&cli, file_config)?;
    let engine = TreeDiffEngine;
    let renderer = HtmlTableRenderer;

    let summary = if config.root_a.is_file() && config.root_b.is_file() {
        let pair = FilePair::new(&config.root_a, &config.root_b);
        run_single(
            &pair,
            &config.results,
            config.options,
            config.algorithm,
            &engine,
            &renderer,
        )?
    } else {
        run_batch(&config, &engine, &renderer, &CancelToken::new())?
    };

    if !cli.quiet {
        let output = format_summary(&summary, &cli.format.into())
            .context("Failed to format summary")?;
        println!("{}", output);
    }

    Ok(summary.exit_code())
}

/// Layers the command line over the config file.
fn build_config(cli: &Cli, file: FileConfig) -> Result<RunConfig, ConfigError> {
    let (root_a, root_b) = match (&cli.path_a, &cli.path_b) {
        (Some(a), Some(b)) => (a.clone(), b.clone()),
        (Some(_), None) => {
            return Err(ConfigError::usage("expected two paths, got one"));
        }
        _ => match (file.root_a, file.root_b) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(ConfigError::usage(
                    "no paths given on the command line or in the config file",
                ))
            }
        },
    };
    check_same_kind(&root_a, &root_b)?;

    let mut config = RunConfig::new(
        root_a,
        root_b,
        cli.out.clone().or(file.results).unwrap_or_else(|| PathBuf::from(".")),
    );
    if let Some(ext) = cli.extension.as_deref().or(file.extension.as_deref()) {
        config.extension = normalize_extension(ext);
    }
    config.recursive = cli.recursive || file.recursive.unwrap_or(false);
    config.options = file.options | cli.diff_options();
    config.algorithm = cli
        .algorithm
        .map(AlgorithmChoice::from)
        .or(file.algorithm)
        .unwrap_or_default();

    Ok(config)
}

/// Two files or two directories; a mix is rejected. Missing paths are left
/// for the directory checks to report.
fn check_same_kind(a: &Path, b: &Path) -> Result<(), ConfigError> {
    if a.is_file() != b.is_file() && a.exists() && b.exists() {
        return Err(ConfigError::usage(format!(
            "cannot compare a file with a directory: {} and {}",
            a.display(),
            b.display()
        )));
    }
    Ok(())
}
