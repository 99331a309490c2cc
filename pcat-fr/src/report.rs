//! Report generation and formatting
//!
//! Builds the end-of-batch CLI output and the optional JSON export.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use pcat_common::DocumentReport;
use serde::Serialize;

/// Result of one file of the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Ranges were rewritten and the file saved
    Rewritten { report: DocumentReport },
    /// Check mode: the file would be rewritten
    WouldChange { report: DocumentReport },
    /// Ranges already normalized
    Unchanged { report: DocumentReport },
    /// Missing, unreadable or malformed; the file was left alone
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
}

/// JSON export envelope
#[derive(Serialize)]
struct ExportedReport<'a> {
    /// Export timestamp (ISO 8601)
    timestamp: String,
    version: &'static str,
    files: &'a [FileOutcome],
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    /// Files rewritten, or that would be rewritten in check mode
    pub fn changed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Rewritten { .. } | FileStatus::WouldChange { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Unchanged { .. }))
    }

    fn count(&self, predicate: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| predicate(&f.status)).count()
    }

    /// Export report to JSON file
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let exported = ExportedReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            files: &self.files,
        };
        let json = serde_json::to_string_pretty(&exported)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}

/// CLI formatter for batch results
pub struct CliFormatter;

impl CliFormatter {
    /// One line per file
    ///
    /// Example: `[✓] prices/team.json: 3 price points rewritten in 1 container`
    pub fn format_file_outcome(outcome: &FileOutcome) -> String {
        let path = outcome.path.display();
        match &outcome.status {
            FileStatus::Rewritten { report } => format!(
                "[✓] {}: {} rewritten in {}",
                path,
                plural(report.points_rewritten(), "price point"),
                plural(report.containers_modified(), "container")
            ),
            FileStatus::WouldChange { report } => format!(
                "[!] {}: {} would be rewritten in {}",
                path,
                plural(report.points_rewritten(), "price point"),
                plural(report.containers_modified(), "container")
            ),
            FileStatus::Unchanged { .. } => format!("[=] {}: already normalized", path),
            FileStatus::Failed { error } => format!("[✗] {}: {}", path, error),
        }
    }

    /// Final summary line
    pub fn format_summary(report: &BatchReport, check: bool) -> String {
        let verb = if check { "need changes" } else { "rewritten" };
        format!(
            "{} processed: {} {}, {} unchanged, {} failed",
            plural(report.files.len(), "file"),
            report.changed(),
            verb,
            report.unchanged(),
            report.failures()
        )
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
