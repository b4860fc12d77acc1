//! Command-line interface module for foldersort.
//!
//! This module owns everything between the process and the sorting core:
//! - Argument parsing with clap
//! - Merging arguments with the configuration file and platform defaults
//! - Listing the source folder
//! - Printing per-file lines and the summary

use crate::candidate::{PlatformHidden, list_candidates};
use crate::config::SortConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::exclusion::ExclusionFilter;
use crate::output::OutputFormatter;
use crate::sort_key::{ExtensionGranularity, SortMode};
use crate::sorter::{RunSummary, SortOptions, run_sort, validate_source};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Sort a folder's files into date or extension subfolders.
///
/// Dry run is the default: nothing moves until --no-dry-run is given.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "foldersort", author, version, about, long_about = None)]
pub struct SortArgs {
    /// Sorting strategy [default: date]
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Folder to sort [default: desktop folder]
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Folder receiving the subfolders [default: <documents>/Sorted]
    #[arg(long)]
    pub dst: Option<PathBuf>,

    /// Extension granularity for --mode ext [default: all]
    #[arg(long, value_enum)]
    pub ext_mode: Option<ExtModeArg>,

    /// Only show planned moves (default)
    #[arg(long, conflicts_with = "no_dry_run")]
    pub dry_run: bool,

    /// Actually move the files
    #[arg(long)]
    pub no_dry_run: bool,

    /// Skip the source/destination safety checks
    #[arg(long)]
    pub force: bool,

    /// Configuration file to use instead of the default lookup
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show skipped files and debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Folder per modification day (YYYY-MM-DD)
    Date,
    /// Folder per extension
    Ext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtModeArg {
    /// Last suffix only (archive.tar.gz -> GZ)
    Last,
    /// Full compound suffix (archive.tar.gz -> TAR.GZ)
    All,
}

impl From<ExtModeArg> for ExtensionGranularity {
    fn from(arg: ExtModeArg) -> Self {
        match arg {
            ExtModeArg::Last => ExtensionGranularity::Last,
            ExtModeArg::All => ExtensionGranularity::All,
        }
    }
}

/// Runs a sort as described by `args` and prints the report.
///
/// # Examples
///
/// ```no_run
/// use foldersort::cli::{run_cli, SortArgs};
/// use std::path::PathBuf;
///
/// let args = SortArgs {
///     src: Some(PathBuf::from("/home/me/Downloads")),
///     dst: Some(PathBuf::from("/home/me/Sorted")),
///     ..Default::default()
/// };
/// match run_cli(&args) {
///     Ok(summary) => println!("{} planned", summary.succeeded),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(args: &SortArgs) -> ConfigResult<RunSummary> {
    let config = SortConfig::load(args.config.as_deref())?;
    let options = build_options(args, &config)?;
    validate_source(&options.source_root)?;

    let filter = ExclusionFilter::with_rules(&config.filters.exclude)?;
    let candidates = list_candidates(&options.source_root, &PlatformHidden)?;

    if options.force {
        OutputFormatter::warning("--force given: source/destination checks are disabled");
    }
    if options.dry_run {
        OutputFormatter::info(&format!(
            "Dry run: planning moves from {}",
            options.source_root.display()
        ));
    } else {
        OutputFormatter::info(&format!(
            "Sorting files from {}",
            options.source_root.display()
        ));
    }

    let summary = run_sort(&candidates, &filter, &options)?;

    OutputFormatter::results(&summary, args.verbose);
    OutputFormatter::summary(&summary);

    Ok(summary)
}

/// Merges arguments, configuration file and platform defaults.
///
/// Arguments win over the file, the file wins over the defaults.
pub fn build_options(args: &SortArgs, config: &SortConfig) -> ConfigResult<SortOptions> {
    let granularity = match args.ext_mode {
        Some(arg) => arg.into(),
        None => config.granularity()?.unwrap_or_default(),
    };

    let mode = match args.mode {
        Some(ModeArg::Date) => SortMode::Date,
        Some(ModeArg::Ext) => SortMode::Extension(granularity),
        None => match config.mode()?.unwrap_or_default() {
            SortMode::Date => SortMode::Date,
            SortMode::Extension(_) => SortMode::Extension(granularity),
        },
    };

    if mode == SortMode::Date && args.ext_mode.is_some() {
        tracing::debug!("--ext-mode has no effect in date mode");
    }

    let source_root = match args.src.clone().or_else(|| config.sort.source.clone()) {
        Some(path) => path,
        None => default_source()?,
    };
    let destination_root = match args.dst.clone().or_else(|| config.sort.destination.clone()) {
        Some(path) => path,
        None => default_destination()?,
    };

    Ok(SortOptions {
        source_root,
        destination_root,
        mode,
        dry_run: !args.no_dry_run,
        force: args.force,
    })
}

/// The desktop folder, or `~/Desktop` where the platform has no such notion.
fn default_source() -> ConfigResult<PathBuf> {
    dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .ok_or(ConfigError::NoDefaultDirectory { what: "source" })
}

/// `<documents>/Sorted`, or `~/Documents/Sorted` as a fallback.
fn default_destination() -> ConfigResult<PathBuf> {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .map(|documents| documents.join("Sorted"))
        .ok_or(ConfigError::NoDefaultDirectory {
            what: "destination",
        })
}
