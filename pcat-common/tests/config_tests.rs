//! Configuration resolution tests
//!
//! Tests that set PCAT_CONFIG are marked #[serial] so they never run in
//! parallel with each other.

use std::env;
use std::fs;
use std::path::PathBuf;

use pcat_common::config::{ConfigResolver, TomlConfig, CONFIG_ENV_VAR};
use pcat_common::{ConflictPolicy, FinalBound};
use serial_test::serial;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_env_var_selects_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "env.toml", "[ranges]\nfinal_bound = \"keep\"\n");
    env::set_var(CONFIG_ENV_VAR, &path);

    let resolver = ConfigResolver::new(None);
    assert_eq!(resolver.resolve_path(), Some(path));
    let config = resolver.load().unwrap();
    assert_eq!(config.ranges.final_bound, FinalBound::Keep);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_cli_path_takes_precedence_over_env() {
    let dir = TempDir::new().unwrap();
    let env_path = write_config(&dir, "env.toml", "[ranges]\nfinal_bound = \"keep\"\n");
    let cli_path = write_config(&dir, "cli.toml", "[ranges]\nconflict_policy = \"skip-group\"\n");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let config = ConfigResolver::new(Some(&cli_path)).load().unwrap();
    assert_eq!(config.ranges.final_bound, FinalBound::Open);
    assert_eq!(config.ranges.conflict_policy, ConflictPolicy::SkipGroup);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_explicit_missing_file_is_an_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let resolver = ConfigResolver::new(Some(std::path::Path::new("/nonexistent/pcat/config.toml")));
    assert!(resolver.load().is_err());
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.toml", "[ranges\nfinal_bound = ");
    let err = ConfigResolver::new(Some(&path)).load().unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_logging_section() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "log.toml",
        "[logging]\nlevel = \"debug\"\nfile = \"/tmp/pcat.log\"\n",
    );
    let config = ConfigResolver::new(Some(&path)).load().unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/pcat.log")));
    assert_eq!(config.import, TomlConfig::default().import);
}
