//! Error types for topology composition.
//!
//! Every failure a composition run can produce is one of four kinds. The
//! component that detects the failure builds the error; everything above it
//! propagates it unchanged.

use thiserror::Error;

/// Error raised by a composition component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Stage signal present but not a recognized stage.
    #[error("invalid stage '{value}': expected 'dev' or 'prod'")]
    InvalidStage { value: String },

    /// A declaration references a resource or identifier that was never produced.
    #[error("missing dependency: {dependent} requires {requirement}")]
    MissingDependency {
        dependent: String,
        requirement: String,
    },

    /// A permission request exceeds the least-privilege table.
    #[error("policy violation: {message}")]
    PolicyViolation { message: String },

    /// The shared parameter lookup failed or returned an empty value.
    #[error("lookup of parameter '{parameter}' failed: {reason}")]
    ExternalLookupFailure { parameter: String, reason: String },
}

impl TopologyError {
    // =========================================================================
    // STAGE ERRORS
    // =========================================================================

    /// Create an invalid stage error.
    pub fn invalid_stage(value: &str) -> Self {
        Self::InvalidStage {
            value: value.to_string(),
        }
    }

    // =========================================================================
    // DEPENDENCY ERRORS
    // =========================================================================

    /// Create a missing dependency error.
    pub fn missing_dependency(dependent: impl Into<String>, requirement: impl Into<String>) -> Self {
        Self::MissingDependency {
            dependent: dependent.into(),
            requirement: requirement.into(),
        }
    }

    /// Create a missing identifier error for a declared resource that does
    /// not expose the requested identifier.
    pub fn missing_identifier(dependent: &str, resource: &str, identifier: &str) -> Self {
        Self::missing_dependency(
            dependent,
            format!("identifier '{}' of resource '{}'", identifier, resource),
        )
    }

    // =========================================================================
    // POLICY ERRORS
    // =========================================================================

    /// Create a policy violation error.
    pub fn policy_violation(message: impl Into<String>) -> Self {
        Self::PolicyViolation {
            message: message.into(),
        }
    }

    // =========================================================================
    // LOOKUP ERRORS
    // =========================================================================

    /// Create an external lookup failure.
    pub fn lookup_failed(parameter: &str, reason: impl Into<String>) -> Self {
        Self::ExternalLookupFailure {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TopologyError::InvalidStage { .. } => ErrorKind::InvalidStage,
            TopologyError::MissingDependency { .. } => ErrorKind::MissingDependency,
            TopologyError::PolicyViolation { .. } => ErrorKind::PolicyViolation,
            TopologyError::ExternalLookupFailure { .. } => ErrorKind::ExternalLookupFailure,
        }
    }
}

/// Categories of composition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Stage signal present but unrecognized.
    InvalidStage,
    /// Reference to a resource or identifier that was never produced.
    MissingDependency,
    /// Grant outside the least-privilege table.
    PolicyViolation,
    /// Shared parameter lookup failed or returned empty.
    ExternalLookupFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            TopologyError::invalid_stage("qa").kind(),
            ErrorKind::InvalidStage
        );
        assert_eq!(
            TopologyError::missing_dependency("WebAPIFunction", "StandardBucket").kind(),
            ErrorKind::MissingDependency
        );
        assert_eq!(
            TopologyError::policy_violation("nope").kind(),
            ErrorKind::PolicyViolation
        );
        assert_eq!(
            TopologyError::lookup_failed("/arn/x", "empty").kind(),
            ErrorKind::ExternalLookupFailure
        );
    }

    #[test]
    fn test_missing_identifier_message() {
        let err = TopologyError::missing_identifier("gateway", "StandardBucket", "invokeTarget");
        assert_eq!(
            err.to_string(),
            "missing dependency: gateway requires identifier 'invokeTarget' of resource 'StandardBucket'"
        );
    }
}
