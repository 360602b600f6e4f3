//! CLI command implementations for the ensemble topology builder.

pub mod check;
pub mod stage;
pub mod synth;

use anyhow::{Context, Result};
use ensemble_core::EnsembleConfig;
use std::path::{Path, PathBuf};

/// Configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ensemble.yaml";

/// The configuration file to read, if any.
///
/// An explicit path is always returned; otherwise `./ensemble.yaml` is used
/// when it exists.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

/// Load the project configuration, falling back to defaults when no file
/// is present.
pub fn load_config(explicit: Option<&Path>) -> Result<EnsembleConfig> {
    match config_path(explicit) {
        Some(path) => {
            let config = EnsembleConfig::from_file(&path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::debug!(path = %path.display(), "Loaded configuration");
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file, using defaults");
            Ok(EnsembleConfig::default())
        }
    }
}

/// Parse a `NAME=VALUE` parameter argument.
pub fn parse_parameter(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter '{}': expected NAME=VALUE", s))?;
    if name.trim().is_empty() {
        return Err(format!("invalid parameter '{}': empty name", s));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parameter() {
        assert_eq!(
            parse_parameter("/arn/notification/event-bus=arn:aws:events:x=y").unwrap(),
            (
                "/arn/notification/event-bus".to_string(),
                "arn:aws:events:x=y".to_string()
            )
        );
        assert!(parse_parameter("no-separator").is_err());
        assert!(parse_parameter("=value").is_err());
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ensemble.yaml");
        std::fs::write(&path, "app_prefix: demo\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.app_prefix, "demo");
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }
}
