//! Stage resolution configuration.

use serde::{Deserialize, Serialize};

/// How the deployment stage is read from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Environment variable carrying the stage signal.
    #[serde(default = "default_env_var")]
    pub env_var: String,

    /// Reject present but unrecognized values instead of falling back to `dev`.
    #[serde(default)]
    pub strict: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            env_var: default_env_var(),
            strict: false,
        }
    }
}

fn default_env_var() -> String {
    "STAGE".to_string()
}
