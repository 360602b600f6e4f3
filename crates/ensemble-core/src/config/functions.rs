//! Compute function build settings.

use serde::{Deserialize, Serialize};

use crate::resource::FunctionRole;

/// Settings shared by both compute functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionsConfig {
    /// Runtime identifier handed to the platform.
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Directory holding one crate per function (`<root>/<role>-app`).
    #[serde(default = "default_manifest_root")]
    pub manifest_root: String,
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            manifest_root: default_manifest_root(),
        }
    }
}

impl FunctionsConfig {
    /// Path of the crate that builds the function for `role`.
    pub fn manifest_path(&self, role: FunctionRole) -> String {
        let root = self.manifest_root.trim_end_matches('/');
        format!("{}/{}-app", root, role.segment())
    }
}

fn default_runtime() -> String {
    "provided.al2".to_string()
}

fn default_manifest_root() -> String {
    "lambdas".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_path() {
        let config = FunctionsConfig::default();
        assert_eq!(
            config.manifest_path(FunctionRole::ApiHandler),
            "lambdas/web-api-app"
        );

        let config = FunctionsConfig {
            manifest_root: "functions/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.manifest_path(FunctionRole::EventHook),
            "functions/s3-hook-app"
        );
    }
}
