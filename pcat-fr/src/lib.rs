//! Quantity range fixer (pcat-fr)
//!
//! Rewrites the quantity ranges of pricing fixture files in place so that,
//! per identity group, ranges no longer overlap or leave gaps. Files are
//! processed one after another; a failing file is reported and skipped.

pub mod batch;
pub mod report;

pub use batch::{process_file, run_batch, Mode, Overrides};
pub use report::{BatchReport, CliFormatter, FileOutcome, FileStatus};
