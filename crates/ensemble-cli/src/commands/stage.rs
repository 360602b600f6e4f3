//! `ensemble stage` command implementation.

use anyhow::{Context, Result};
use ensemble_core::{EnsembleConfig, Stage};
use ensemble_topology::{StageResolver, stack_name};
use std::path::Path;

use super::load_config;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let stage = resolve(&config)?;

    println!("{}", stage);
    tracing::info!(stack = %stack_name(&config.stack_prefix, stage), "Resolved stage");
    Ok(())
}

/// Resolve the stage the way `synth` would without `--stage`.
pub fn resolve(config: &EnsembleConfig) -> Result<Stage> {
    let resolver = StageResolver::from_config(&config.stage);
    resolver
        .resolve()
        .with_context(|| format!("Failed to resolve stage from {}", resolver.env_var()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_signal_resolves_to_dev() {
        let mut config = EnsembleConfig::default();
        config.stage.env_var = "ENSEMBLE_TEST_UNSET_STAGE".to_string();
        config.stage.strict = true;

        assert_eq!(resolve(&config).unwrap(), Stage::Dev);
    }

    #[test]
    fn test_signal_is_read_from_configured_variable() {
        let mut config = EnsembleConfig::default();
        // PATH is always set and never a stage
        config.stage.env_var = "PATH".to_string();

        assert_eq!(resolve(&config).unwrap(), Stage::Dev);

        config.stage.strict = true;
        assert!(resolve(&config).is_err());
    }
}
