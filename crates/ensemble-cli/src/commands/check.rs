//! `ensemble check` command implementation.
//!
//! Validates the project configuration before a composition run:
//! - JSON Schema validation of the configuration file
//! - provider naming rules for every name derived from the app prefix
//! - the stage signal and the notification parameter as `synth` would see them
//! - presence of the function build manifests

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

use ensemble_core::{EnsembleConfig, FunctionRole};
use ensemble_policy::check_prefix;
use ensemble_topology::{
    EnvParameters, LookupChain, StageResolver, StaticParameters, resolve_notification_target,
};

use super::config_path;

// ============================================================================
// Embedded JSON Schemas
// ============================================================================

/// Compiled into the binary so validation works without external files.
const ENSEMBLE_CONFIG_SCHEMA: &str =
    include_str!("../../../../schemas/EnsembleConfig.schema.json");

// ============================================================================
// Check Result Types
// ============================================================================

/// Severity level for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single check finding.
#[derive(Debug, Clone)]
pub struct CheckFinding {
    pub severity: Severity,
    /// Category of the check that produced this finding.
    pub category: String,
    pub message: String,
    /// Location within the configuration (e.g., "stage.env_var").
    pub location: Option<String>,
}

impl CheckFinding {
    fn new(severity: Severity, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            location: None,
        }
    }

    fn error(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, message)
    }

    fn warning(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, message)
    }

    fn info(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, message)
    }

    fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Results from running all checks.
#[derive(Debug, Default)]
pub struct CheckResults {
    pub findings: Vec<CheckFinding>,
}

impl CheckResults {
    fn extend(&mut self, findings: impl IntoIterator<Item = CheckFinding>) {
        self.findings.extend(findings);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Print human-readable summary.
    pub fn print_summary(&self) {
        for severity in [Severity::Error, Severity::Warning, Severity::Info] {
            let mut group: Vec<_> = self
                .findings
                .iter()
                .filter(|f| f.severity == severity)
                .collect();
            if group.is_empty() {
                continue;
            }
            group.sort_by(|a, b| a.category.cmp(&b.category));

            println!("\n{} ({}):", severity, group.len());
            println!("{}", "-".repeat(60));
            for finding in group {
                print_finding(finding);
            }
        }

        println!();
        println!("{}", "=".repeat(60));
        if self.error_count() == 0 && self.warning_count() == 0 {
            println!("All checks passed!");
        } else {
            println!(
                "Summary: {} error(s), {} warning(s)",
                self.error_count(),
                self.warning_count()
            );
        }
    }
}

fn print_finding(finding: &CheckFinding) {
    let location = finding
        .location
        .as_ref()
        .map(|l| format!(" [{}]", l))
        .unwrap_or_default();

    println!("  [{}]{}: {}", finding.category, location, finding.message);
}

// ============================================================================
// Main Check Runner
// ============================================================================

/// Run all checks without printing, returning the findings.
pub fn run_quiet(explicit: Option<&Path>) -> Result<CheckResults> {
    let mut results = CheckResults::default();

    let path = config_path(explicit);
    let base_dir = path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    // 1. JSON Schema validation
    let config = match &path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            results.extend(validate_against_schema(&content)?);

            // 2. Structural validation
            match EnsembleConfig::from_yaml(&content) {
                Ok(config) => config,
                Err(e) => {
                    results.extend([CheckFinding::error("config", e.to_string())]);
                    return Ok(results);
                }
            }
        }
        None => {
            results.extend([CheckFinding::info(
                "config",
                "No configuration file found, checking defaults",
            )]);
            EnsembleConfig::default()
        }
    };

    // 3. Provider naming rules
    results.extend(check_naming(&config));

    // 4. Stage signal
    results.extend(check_stage(&config));

    // 5. Notification parameter
    results.extend(check_notification(&config));

    // 6. Function build manifests
    results.extend(check_function_manifests(&config, &base_dir));

    Ok(results)
}

/// Run all checks and print the findings.
pub fn run(explicit: Option<&Path>) -> Result<()> {
    println!("Checking ensemble configuration...");

    let results = run_quiet(explicit)?;
    results.print_summary();

    if results.has_errors() {
        anyhow::bail!(
            "Configuration check failed with {} error(s)",
            results.error_count()
        );
    }

    Ok(())
}

// ============================================================================
// Check 1: JSON Schema Validation
// ============================================================================

fn validate_against_schema(content: &str) -> Result<Vec<CheckFinding>> {
    let mut findings = Vec::new();

    // An empty file is the default configuration.
    if content.trim().is_empty() {
        return Ok(findings);
    }

    let schema: JsonValue = serde_json::from_str(ENSEMBLE_CONFIG_SCHEMA)
        .context("Failed to parse embedded configuration schema")?;

    let instance: JsonValue = match serde_yaml::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            findings.push(CheckFinding::error(
                "json-schema",
                format!("Failed to parse YAML: {}", e),
            ));
            return Ok(findings);
        }
    };

    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            findings.push(CheckFinding::error(
                "json-schema",
                format!("Failed to compile JSON schema: {}", e),
            ));
            return Ok(findings);
        }
    };

    for error in validator.iter_errors(&instance) {
        let path = error.instance_path().to_string();
        let location = if path.is_empty() {
            "(root)".to_string()
        } else {
            path
        };
        findings.push(CheckFinding::error("json-schema", error.to_string()).with_location(location));
    }

    Ok(findings)
}

// ============================================================================
// Check 3: Naming Rules
// ============================================================================

fn check_naming(config: &EnsembleConfig) -> Vec<CheckFinding> {
    check_prefix(&config.app_prefix)
        .into_iter()
        .map(|v| CheckFinding::error("naming", v.to_string()).with_location("app_prefix"))
        .collect()
}

// ============================================================================
// Check 4: Stage Signal
// ============================================================================

fn check_stage(config: &EnsembleConfig) -> Vec<CheckFinding> {
    let resolver = StageResolver::from_config(&config.stage);
    let raw = std::env::var(resolver.env_var()).ok();

    match resolver.resolve_value(raw.as_deref()) {
        Ok(stage) => match raw.as_deref() {
            Some(value) if !value.is_empty() && value != stage.as_str() => {
                vec![
                    CheckFinding::warning(
                        "stage",
                        format!(
                            "{}='{}' is not a stage, synth will use '{}'",
                            resolver.env_var(),
                            value,
                            stage
                        ),
                    )
                    .with_location("stage.env_var"),
                ]
            }
            _ => vec![CheckFinding::info(
                "stage",
                format!("Stage resolves to '{}'", stage),
            )],
        },
        Err(e) => vec![CheckFinding::error("stage", e.to_string()).with_location("stage.strict")],
    }
}

// ============================================================================
// Check 5: Notification Parameter
// ============================================================================

fn check_notification(config: &EnsembleConfig) -> Vec<CheckFinding> {
    let lookup = LookupChain::new()
        .with(StaticParameters::new(config.parameters.clone()))
        .with(EnvParameters);

    match resolve_notification_target(&lookup, &config.notification.parameter_name) {
        Ok(_) => Vec::new(),
        Err(e) => vec![
            CheckFinding::warning(
                "notification",
                format!(
                    "{}; pass --parameter {}=<locator> to synth or set {}",
                    e,
                    config.notification.parameter_name,
                    EnvParameters::variable_name(&config.notification.parameter_name)
                ),
            )
            .with_location("notification.parameter_name"),
        ],
    }
}

// ============================================================================
// Check 6: Function Build Manifests
// ============================================================================

fn check_function_manifests(config: &EnsembleConfig, base_dir: &Path) -> Vec<CheckFinding> {
    FunctionRole::ALL
        .into_iter()
        .filter_map(|role| {
            let manifest_path = config.functions.manifest_path(role);
            if base_dir.join(&manifest_path).is_dir() {
                None
            } else {
                Some(
                    CheckFinding::warning(
                        "functions",
                        format!("Build manifest '{}' of the {} not found", manifest_path, role),
                    )
                    .with_location("functions.manifest_root"),
                )
            }
        })
        .collect()
}
