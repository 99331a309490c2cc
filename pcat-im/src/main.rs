//! Spreadsheet importer (pcat-im) - Main entry point
//!
//! **Usage:**
//! ```bash
//! pbpaste | pcat-im --normalize --output fixtures/team.json
//! pcat-im prices.csv > fixtures/team.json
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pcat_common::build_info;
use pcat_common::config::ConfigResolver;
use pcat_common::FinalBound;
use pcat_im::{import_text, Delimiter, ImportOptions};
use tracing::{debug, info};

/// Command-line arguments for pcat-im
#[derive(Parser, Debug)]
#[command(name = "pcat-im")]
#[command(about = "Convert pasted spreadsheet rows into a pricing fixture document")]
#[command(version)]
struct Args {
    /// Input file (reads stdin when omitted or "-")
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Cell separator (detected from the header row by default)
    #[arg(long, value_enum)]
    delimiter: Option<Delimiter>,

    /// Column selecting the pricing container of each row
    #[arg(long, value_name = "COLUMN")]
    group_column: Option<String>,

    /// Document field holding the pricing containers
    #[arg(long, value_name = "NAME")]
    field: Option<String>,

    /// Normalize quantity ranges before writing
    #[arg(long)]
    normalize: bool,

    /// With --normalize, keep a finite maxQuantity on the highest range of a group
    #[arg(long, requires = "normalize")]
    keep_final_max: bool,

    /// Configuration file (defaults to $PCAT_CONFIG, then the per-user config)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigResolver::new(args.config.as_deref())
        .load()
        .context("Failed to load configuration")?;
    pcat_common::logging::init(&config.logging).context("Failed to initialize logging")?;

    debug!("{}", build_info::banner("pcat-im", env!("CARGO_PKG_VERSION")));

    let mut options = ImportOptions::from_config(&config.import, config.ranges.process_options());
    options.delimiter = args.delimiter;
    options.normalize = args.normalize;
    if let Some(column) = args.group_column {
        options.group_column = column;
    }
    if let Some(field) = args.field {
        options.process.collection_field = field;
    }
    if args.keep_final_max {
        options.process.normalize.final_bound = FinalBound::Keep;
    }

    let text = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    let (document, summary) = import_text(&text, &options).context("Import failed")?;

    match &args.output {
        Some(path) => {
            document
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                "Wrote {} price points in {} containers to {}",
                summary.price_points,
                summary.containers,
                path.display()
            );
        }
        None => {
            let json = document
                .to_pretty_string()
                .context("Failed to serialize document")?;
            print!("{}", json);
        }
    }

    Ok(())
}
