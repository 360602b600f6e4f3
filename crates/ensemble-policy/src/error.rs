//! Error types for naming validation.
//!
//! Grant and stage failures use [`ensemble_core::TopologyError`]; naming
//! violations are configuration problems detected before any composition run.

use thiserror::Error;

/// A derived physical name that breaks a provider naming rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{resource} name '{name}' is invalid: expected {rule}")]
pub struct NamingViolation {
    /// Resource family the rule belongs to.
    pub resource: String,
    /// The offending name.
    pub name: String,
    /// Human-readable rule description.
    pub rule: String,
}

impl NamingViolation {
    /// Create a new naming violation.
    pub fn new(resource: &str, name: &str, rule: &str) -> Self {
        Self {
            resource: resource.to_string(),
            name: name.to_string(),
            rule: rule.to_string(),
        }
    }
}
