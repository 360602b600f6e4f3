//! `ensemble synth` command implementation.
//!
//! Composes the topology and publishes the manifest to stdout or a file.
//! Parameter lookups are consulted in order: `--parameter` values, the
//! `parameters` map of the configuration, then `ENSEMBLE_PARAM_*` variables.

use anyhow::{Context, Result};
use ensemble_core::{EnsembleConfig, Stage};
use ensemble_topology::{
    EnvParameters, FileSink, LookupChain, Manifest, ManifestFormat, StaticParameters, StdoutSink,
    TopologyAssembler, TopologySink,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::load_config;

/// Arguments of `ensemble synth`.
#[derive(Debug, Default)]
pub struct SynthArgs {
    pub config: Option<PathBuf>,
    pub stage: Option<Stage>,
    pub output: Option<PathBuf>,
    pub parameters: Vec<(String, String)>,
}

pub fn run(args: SynthArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let manifest = compose(config, args.stage, &args.parameters)?;

    match &args.output {
        Some(path) => FileSink::new(path)
            .publish(&manifest)
            .with_context(|| format!("Failed to write manifest to {}", path.display()))?,
        None => StdoutSink::new(ManifestFormat::Json)
            .publish(&manifest)
            .context("Failed to write manifest")?,
    }

    Ok(())
}

/// Compose a manifest. Nothing is published on failure.
pub fn compose(
    config: EnsembleConfig,
    stage: Option<Stage>,
    parameters: &[(String, String)],
) -> Result<Manifest> {
    let lookup = parameter_lookup(&config, parameters);

    let mut assembler = TopologyAssembler::new(config, lookup);
    if let Some(stage) = stage {
        assembler = assembler.with_stage(stage);
    }

    let topology = assembler
        .assemble()
        .context("Failed to compose deployment topology")?;

    let manifest = Manifest::new(topology);
    tracing::info!(run_id = %manifest.run_id, "Composed manifest");
    Ok(manifest)
}

fn parameter_lookup(config: &EnsembleConfig, parameters: &[(String, String)]) -> LookupChain {
    let cli: BTreeMap<String, String> = parameters.iter().cloned().collect();

    LookupChain::new()
        .with(StaticParameters::new(cli))
        .with(StaticParameters::new(config.parameters.clone()))
        .with(EnvParameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_core::ErrorKind;
    use ensemble_topology::AssemblyError;

    const PARAM: &str = "/arn/notification/event-bus";

    #[test]
    fn test_compose_with_cli_parameter() {
        let manifest = compose(
            EnsembleConfig::default(),
            Some(Stage::Prod),
            &[(PARAM.to_string(), "arn:cli".to_string())],
        )
        .unwrap();

        assert_eq!(manifest.topology.stage(), Stage::Prod);
        assert_eq!(manifest.topology.notification().locator(), "arn:cli");
    }

    #[test]
    fn test_cli_parameter_wins_over_config() {
        let mut config = EnsembleConfig::default();
        config
            .parameters
            .insert(PARAM.to_string(), "arn:config".to_string());

        let from_config = compose(config.clone(), Some(Stage::Dev), &[]).unwrap();
        assert_eq!(from_config.topology.notification().locator(), "arn:config");

        let from_cli = compose(
            config,
            Some(Stage::Dev),
            &[(PARAM.to_string(), "arn:cli".to_string())],
        )
        .unwrap();
        assert_eq!(from_cli.topology.notification().locator(), "arn:cli");
    }

    #[test]
    fn test_compose_without_parameter_fails() {
        let mut config = EnsembleConfig::default();
        // a parameter no environment defines
        config.notification.parameter_name = "/ensemble/test/unset-parameter".to_string();

        let err = compose(config, Some(Stage::Dev), &[]).unwrap_err();
        let assembly = err.downcast_ref::<AssemblyError>().unwrap();
        assert_eq!(assembly.kind(), ErrorKind::ExternalLookupFailure);
    }

    #[test]
    fn test_run_writes_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("topology.json");

        run(SynthArgs {
            stage: Some(Stage::Dev),
            output: Some(output.clone()),
            parameters: vec![(PARAM.to_string(), "arn:bus".to_string())],
            config: Some(write_config(&dir, "app_prefix: demo\n")),
        })
        .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written["topology"]["resources"][0]["physical_name"],
            "demo-bucket-dev"
        );
    }

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("ensemble.yaml");
        std::fs::write(&path, content).unwrap();
        path
    }
}
