//! Configuration loading
//!
//! Configuration file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `PCAT_CONFIG` environment variable
//! 3. `<config dir>/pcat/config.toml` if it exists
//! 4. Compiled defaults (fallback)
//!
//! A file named explicitly (1 or 2) must exist. The per-user file is optional.
//! Every field of the file is optional as well; missing fields take their
//! compiled defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{ProcessOptions, DEFAULT_COLLECTION_FIELD};
use crate::normalize::{ConflictPolicy, FinalBound, NormalizeOptions};
use crate::{Error, Result};

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "PCAT_CONFIG";

/// Complete configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub ranges: RangesConfig,
    pub import: ImportConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log filter used when RUST_LOG is not set (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Quantity range normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangesConfig {
    /// Document field holding the pricing containers
    pub collection_field: String,
    pub final_bound: FinalBound,
    pub conflict_policy: ConflictPolicy,
}

impl Default for RangesConfig {
    fn default() -> Self {
        Self {
            collection_field: DEFAULT_COLLECTION_FIELD.to_string(),
            final_bound: FinalBound::default(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

impl RangesConfig {
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            collection_field: self.collection_field.clone(),
            normalize: NormalizeOptions {
                final_bound: self.final_bound,
            },
            conflict_policy: self.conflict_policy,
        }
    }
}

/// Spreadsheet import settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Column whose value selects the pricing container of a row
    pub group_column: String,

    /// Columns emitted as JSON numbers instead of strings
    pub numeric_columns: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            group_column: "priceGroupId".to_string(),
            numeric_columns: vec!["amount".to_string()],
        }
    }
}

/// Locates and loads the configuration file
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<&Path>) -> Self {
        Self {
            cli_path: cli_path.map(Path::to_path_buf),
        }
    }

    /// Pick the configuration file to read, if any
    pub fn resolve_path(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: per-user config file, only when present
        default_config_path().filter(|p| p.exists())
    }

    /// Load the resolved configuration, falling back to compiled defaults
    pub fn load(&self) -> Result<TomlConfig> {
        match self.resolve_path() {
            Some(path) => load_toml_config(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(TomlConfig::default())
            }
        }
    }
}

/// Per-user configuration file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pcat").join("config.toml"))
}

/// Read and parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ranges.collection_field, "priceGroups");
        assert_eq!(config.import.group_column, "priceGroupId");
    }

    #[test]
    fn test_partial_sections() {
        let config: TomlConfig = toml::from_str(
            r#"
            [ranges]
            final_bound = "keep"
            conflict_policy = "skip-group"

            [import]
            numeric_columns = ["amount", "listPrice"]
            "#,
        )
        .unwrap();

        assert_eq!(config.ranges.final_bound, FinalBound::Keep);
        assert_eq!(config.ranges.conflict_policy, ConflictPolicy::SkipGroup);
        assert_eq!(config.ranges.collection_field, "priceGroups");
        assert_eq!(config.import.numeric_columns, vec!["amount", "listPrice"]);
        assert_eq!(config.import.group_column, "priceGroupId");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result: std::result::Result<TomlConfig, _> =
            toml::from_str("[ranges]\nfinal_bound = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_process_options_follow_ranges_section() {
        let ranges = RangesConfig {
            collection_field: "plans".to_string(),
            final_bound: FinalBound::Keep,
            conflict_policy: ConflictPolicy::SkipGroup,
        };
        let options = ranges.process_options();
        assert_eq!(options.collection_field, "plans");
        assert_eq!(options.normalize.final_bound, FinalBound::Keep);
        assert_eq!(options.conflict_policy, ConflictPolicy::SkipGroup);
    }

    #[test]
    fn test_cli_path_wins() {
        let resolver = ConfigResolver::new(Some(Path::new("/tmp/pcat-cli.toml")));
        assert_eq!(resolver.resolve_path(), Some(PathBuf::from("/tmp/pcat-cli.toml")));
    }
}
