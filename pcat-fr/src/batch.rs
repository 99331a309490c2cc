//! Sequential batch processing of fixture files

use std::path::{Path, PathBuf};

use pcat_common::config::RangesConfig;
use pcat_common::{ConflictPolicy, DocumentError, DocumentReport, FinalBound, PriceDocument, ProcessOptions};
use tracing::{error, info};

use crate::report::{BatchReport, FileOutcome, FileStatus};

/// Whether documents are rewritten or only inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normalize and overwrite each file
    Fix,
    /// Normalize in memory only; nothing is written
    Check,
}

/// Command-line switches layered over the `[ranges]` configuration
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub collection_field: Option<String>,
    pub keep_final_max: bool,
    pub skip_conflicts: bool,
}

impl Overrides {
    pub fn apply(&self, config: &RangesConfig) -> ProcessOptions {
        let mut options = config.process_options();
        if let Some(field) = &self.collection_field {
            options.collection_field = field.clone();
        }
        if self.keep_final_max {
            options.normalize.final_bound = FinalBound::Keep;
        }
        if self.skip_conflicts {
            options.conflict_policy = ConflictPolicy::SkipGroup;
        }
        options
    }
}

/// Load, normalize and (in fix mode) save one document
///
/// The file is only written after the whole document was processed.
pub fn process_file(
    path: &Path,
    options: &ProcessOptions,
    mode: Mode,
) -> Result<DocumentReport, DocumentError> {
    let mut document = PriceDocument::load(path)?;
    let report = document.process(options)?;

    if mode == Mode::Fix {
        document.save(path)?;
    }
    Ok(report)
}

/// Process every file in order, continuing past failures
pub fn run_batch(paths: &[PathBuf], options: &ProcessOptions, mode: Mode) -> BatchReport {
    let mut batch = BatchReport::default();

    for path in paths {
        info!("Processing {}", path.display());

        let status = match process_file(path, options, mode) {
            Ok(report) => {
                info!(
                    "{}: {} containers, {} modified, {} invalid, {} price points rewritten",
                    path.display(),
                    report.containers_seen(),
                    report.containers_modified(),
                    report.containers_invalid(),
                    report.points_rewritten()
                );
                for container in report.containers.iter().filter(|c| c.changed_points() > 0) {
                    info!("  updated container {}", container.id());
                }

                match (mode, report.is_modified()) {
                    (Mode::Fix, true) => FileStatus::Rewritten { report },
                    (Mode::Check, true) => FileStatus::WouldChange { report },
                    (_, false) => FileStatus::Unchanged { report },
                }
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                FileStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        batch.files.push(FileOutcome {
            path: path.clone(),
            status,
        });
    }

    batch
}
