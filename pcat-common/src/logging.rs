//! Tracing subscriber setup shared by the binaries
//!
//! Output goes to stderr (or the configured file) so that tools printing a
//! document to stdout stay pipeable.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{Error, Result};

/// Build the log filter: RUST_LOG when set, otherwise the configured level
pub fn build_filter(config: &LoggingConfig, env_override: Option<&str>) -> Result<EnvFilter> {
    let directives = env_override
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&config.level);

    EnvFilter::try_new(directives)
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", directives, e)))
}

/// Install the global tracing subscriber
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(config, env.as_deref())?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}
