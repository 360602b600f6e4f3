//! Stage resolution from the process environment.

use ensemble_core::{Stage, StageConfig, TopologyError};

/// Derives the deployment stage from one environment signal.
///
/// In the default (lenient) mode only the exact value `prod` selects
/// production; anything else, including an absent variable, selects `dev`.
/// Strict mode rejects present values that are neither `dev` nor `prod`.
#[derive(Debug, Clone)]
pub struct StageResolver {
    env_var: String,
    strict: bool,
}

impl StageResolver {
    /// Create a lenient resolver reading `env_var`.
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            strict: false,
        }
    }

    pub fn from_config(config: &StageConfig) -> Self {
        Self::new(config.env_var.clone()).strict(config.strict)
    }

    /// Enable or disable strict validation.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The environment variable this resolver reads.
    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    /// Resolve the stage from the process environment.
    ///
    /// Never fails in lenient mode.
    pub fn resolve(&self) -> Result<Stage, TopologyError> {
        let value = std::env::var(&self.env_var).ok();
        self.resolve_value(value.as_deref())
    }

    /// Resolve the stage from an already-read signal.
    pub fn resolve_value(&self, value: Option<&str>) -> Result<Stage, TopologyError> {
        let Some(raw) = value.filter(|v| !v.is_empty()) else {
            tracing::debug!(env_var = %self.env_var, "No stage signal, defaulting to dev");
            return Ok(Stage::Dev);
        };

        if self.strict {
            return raw.parse::<Stage>();
        }

        if raw == "prod" {
            return Ok(Stage::Prod);
        }
        if raw != "dev" {
            tracing::warn!(
                env_var = %self.env_var,
                value = %raw,
                "Unrecognized stage signal, defaulting to dev"
            );
        }
        Ok(Stage::Dev)
    }
}

impl Default for StageResolver {
    fn default() -> Self {
        Self::from_config(&StageConfig::default())
    }
}
