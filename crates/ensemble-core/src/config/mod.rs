//! Configuration types for the Exogenesis Ensemble topology builder.
//!
//! Configuration is loaded from a single YAML file (`ensemble.yaml`). Every
//! field has a default, so an empty file (or no file at all) describes the
//! standard topology.
//!
//! # Example
//!
//! ```yaml
//! app_prefix: exogenesis-ensemble
//! stage:
//!   env_var: STAGE
//!   strict: false
//! notification:
//!   parameter_name: /arn/notification/event-bus
//! functions:
//!   runtime: provided.al2
//!   manifest_root: lambdas
//! parameters:
//!   /arn/notification/event-bus: arn:aws:events:us-west-2:123456789012:event-bus/default
//! ```

pub mod functions;
pub mod notification;
pub mod stage;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub use functions::FunctionsConfig;
pub use notification::NotificationConfig;
pub use stage::StageConfig;

/// Complete project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Prefix of every physical resource name.
    #[serde(default = "default_app_prefix")]
    pub app_prefix: String,

    /// Prefix of the stack name; the stage is appended.
    #[serde(default = "default_stack_prefix")]
    pub stack_prefix: String,

    /// How the stage is resolved.
    #[serde(default)]
    pub stage: StageConfig,

    /// External notification bus lookup.
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Compute function build settings.
    #[serde(default)]
    pub functions: FunctionsConfig,

    /// Static parameter values, consulted before the process environment.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            app_prefix: default_app_prefix(),
            stack_prefix: default_stack_prefix(),
            stage: StageConfig::default(),
            notification: NotificationConfig::default(),
            functions: FunctionsConfig::default(),
            parameters: BTreeMap::new(),
        }
    }
}

fn default_app_prefix() -> String {
    "exogenesis-ensemble".to_string()
}

fn default_stack_prefix() -> String {
    "ExogenesisEnsemblePart3Redemption".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EnsembleConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    ///
    /// Blank content yields the default configuration.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks that do not depend on provider naming rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_prefix.trim().is_empty() {
            return Err(ConfigError::Config("app_prefix must not be empty".to_string()));
        }
        if self.stack_prefix.trim().is_empty() {
            return Err(ConfigError::Config(
                "stack_prefix must not be empty".to_string(),
            ));
        }
        if self.stage.env_var.trim().is_empty() {
            return Err(ConfigError::Config(
                "stage.env_var must not be empty".to_string(),
            ));
        }
        if self.notification.parameter_name.trim().is_empty() {
            return Err(ConfigError::Config(
                "notification.parameter_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Get a statically configured parameter value.
    pub fn get_parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = EnsembleConfig::from_yaml("").unwrap();
        assert_eq!(config, EnsembleConfig::default());
        assert_eq!(config.app_prefix, "exogenesis-ensemble");
        assert_eq!(config.stage.env_var, "STAGE");
        assert!(!config.stage.strict);
        assert_eq!(
            config.notification.parameter_name,
            "/arn/notification/event-bus"
        );
        assert_eq!(config.functions.runtime, "provided.al2");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
app_prefix: my-app
stage:
  strict: true
parameters:
  /arn/notification/event-bus: arn:aws:events:us-west-2:1:event-bus/default
"#;
        let config = EnsembleConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.app_prefix, "my-app");
        assert!(config.stage.strict);
        assert_eq!(config.stage.env_var, "STAGE");
        assert_eq!(config.functions.manifest_root, "lambdas");
        assert_eq!(
            config.get_parameter("/arn/notification/event-bus"),
            Some("arn:aws:events:us-west-2:1:event-bus/default")
        );
    }

    #[test]
    fn test_blank_prefix_rejected() {
        let err = EnsembleConfig::from_yaml("app_prefix: '  '").unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let err = EnsembleConfig::from_yaml("app_prefix: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
