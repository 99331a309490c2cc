//! Quantity range fixer (pcat-fr) - Main entry point
//!
//! **Usage:**
//! ```bash
//! pcat-fr [--check] [--field <NAME>] [--keep-final-max] [--skip-conflicts] <FILES>...
//! ```
//!
//! Each file is normalized and overwritten in place. Failures are reported per
//! file and never stop the batch; the exit status is 1 when any file failed
//! (or, with `--check`, when any file would change).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use pcat_common::build_info;
use pcat_common::config::ConfigResolver;
use pcat_fr::{run_batch, CliFormatter, Mode, Overrides};
use tracing::{debug, error, info};

/// Command-line arguments for pcat-fr
#[derive(Parser, Debug)]
#[command(name = "pcat-fr")]
#[command(about = "Fix overlapping quantity ranges in pricing fixture files")]
#[command(version)]
struct Args {
    /// Fixture files to rewrite in place
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Report files that need changes without writing them
    #[arg(long)]
    check: bool,

    /// Document field holding the pricing containers
    #[arg(long, value_name = "NAME")]
    field: Option<String>,

    /// Keep a finite maxQuantity on the highest range of a group
    #[arg(long)]
    keep_final_max: bool,

    /// Leave groups with duplicate minQuantity values unchanged instead of failing the file
    #[arg(long)]
    skip_conflicts: bool,

    /// Configuration file (defaults to $PCAT_CONFIG, then the per-user config)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Export per-file results to a JSON file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // No files is a usage error, not a failure
    if args.files.is_empty() {
        Args::command().print_help().context("Failed to print usage")?;
        println!();
        return Ok(ExitCode::SUCCESS);
    }

    let config = ConfigResolver::new(args.config.as_deref())
        .load()
        .context("Failed to load configuration")?;
    pcat_common::logging::init(&config.logging).context("Failed to initialize logging")?;

    debug!("{}", build_info::banner("pcat-fr", env!("CARGO_PKG_VERSION")));

    let overrides = Overrides {
        collection_field: args.field.clone(),
        keep_final_max: args.keep_final_max,
        skip_conflicts: args.skip_conflicts,
    };
    let options = overrides.apply(&config.ranges);
    let mode = if args.check { Mode::Check } else { Mode::Fix };

    info!(
        "Normalizing {} file(s), collection field '{}'",
        args.files.len(),
        options.collection_field
    );

    let batch = run_batch(&args.files, &options, mode);

    for outcome in &batch.files {
        println!("{}", CliFormatter::format_file_outcome(outcome));
    }
    println!("{}", CliFormatter::format_summary(&batch, args.check));

    if let Some(path) = &args.report {
        match batch.export_json(path) {
            Ok(()) => info!("Results exported to {}", path.display()),
            Err(e) => error!("Failed to export results to {}: {}", path.display(), e),
        }
    }

    let failed = batch.failures() > 0 || (args.check && batch.changed() > 0);
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
