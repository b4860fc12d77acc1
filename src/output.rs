//! Output formatting and styling module.
//!
//! All console output of the CLI goes through [`OutputFormatter`], so the
//! per-file line format and the summary live in one place.

use crate::file_organizer::{MoveOutcome, MoveResult};
use crate::sorter::RunSummary;
use colored::*;

/// Console output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints an error message in red.
    pub fn error(message: &str) {
        eprintln!("{} {}", "[ERROR]".red(), message);
    }

    /// Prints a warning message in yellow.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "[WARN]".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Renders the line for one file, or `None` for skipped files unless
    /// `show_skipped` is set.
    pub fn result_line(result: &MoveResult, show_skipped: bool) -> Option<String> {
        let destination = result
            .destination
            .as_deref()
            .map(|d| d.display().to_string())
            .unwrap_or_default();

        match &result.outcome {
            MoveOutcome::Planned => Some(format!(
                "{} {} → {}",
                "[DRY-RUN]".yellow(),
                result.source.display(),
                destination
            )),
            MoveOutcome::Moved => Some(format!(
                "{} {} → {}",
                "[MOVED]".green(),
                result.source.display(),
                destination
            )),
            MoveOutcome::Failed(reason) => Some(format!(
                "{} {}: {}",
                "[ERROR]".red(),
                result.source.display(),
                reason
            )),
            MoveOutcome::Skipped if show_skipped => {
                Some(format!("{} {}", "[SKIP]".dimmed(), result.source.display()))
            }
            MoveOutcome::Skipped => None,
        }
    }

    /// Prints one line per file. Failures go to stderr.
    pub fn results(summary: &RunSummary, show_skipped: bool) {
        for result in &summary.results {
            if let Some(line) = Self::result_line(result, show_skipped) {
                if result.is_failure() {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            }
        }
    }

    /// Renders the summary block printed after the per-file lines.
    pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
        let (heading, verb) = if summary.dry_run {
            ("DRY RUN SUMMARY", "planned")
        } else {
            ("SUMMARY", "moved")
        };

        let mut lines = vec![
            heading.bold().to_string(),
            format!(
                "  {}: {}, failed: {}, skipped: {}",
                verb,
                summary.succeeded.to_string().green(),
                if summary.failed > 0 {
                    summary.failed.to_string().red()
                } else {
                    summary.failed.to_string().normal()
                },
                summary.skipped
            ),
            format!("  Mode:        {}", summary.mode),
            format!("  Source:      {}", summary.source_root.display()),
            format!("  Destination: {}", summary.display_destination().display()),
        ];

        if summary.dry_run {
            lines.push(String::new());
            lines.push(
                "No files were modified. Run with --no-dry-run to move them."
                    .yellow()
                    .to_string(),
            );
        }
        lines
    }

    /// Prints the summary block.
    pub fn summary(summary: &RunSummary) {
        println!();
        for line in Self::summary_lines(summary) {
            println!("{}", line);
        }
    }
}
