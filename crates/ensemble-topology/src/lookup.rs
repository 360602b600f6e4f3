//! Shared parameter store lookups.
//!
//! The notification bus locator lives in a parameter store shared with other
//! systems. The lookup is injected into the assembler so a composition run
//! can be exercised without any ambient state.

use ensemble_core::{NotificationTarget, TopologyError};
use std::collections::BTreeMap;

/// Prefix of environment variables consulted by [`EnvParameters`].
pub const ENV_PARAMETER_PREFIX: &str = "ENSEMBLE_PARAM_";

/// Resolves a named parameter to its value.
pub trait ParameterLookup {
    /// Look up `name`. `Ok(None)` means the parameter does not exist.
    fn get_parameter(&self, name: &str) -> anyhow::Result<Option<String>>;
}

impl<F> ParameterLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get_parameter(&self, name: &str) -> anyhow::Result<Option<String>> {
        Ok(self(name))
    }
}

/// Parameters held in memory, typically from configuration or the CLI.
#[derive(Debug, Clone, Default)]
pub struct StaticParameters {
    values: BTreeMap<String, String>,
}

impl StaticParameters {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl ParameterLookup for StaticParameters {
    fn get_parameter(&self, name: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.get(name).cloned())
    }
}

/// Parameters read from the process environment.
///
/// `/arn/notification/event-bus` is read from
/// `ENSEMBLE_PARAM_ARN_NOTIFICATION_EVENT_BUS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvParameters;

impl EnvParameters {
    /// Environment variable name for a parameter name.
    pub fn variable_name(name: &str) -> String {
        let mut var = String::from(ENV_PARAMETER_PREFIX);
        let mut pending_sep = false;
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_sep && var.len() > ENV_PARAMETER_PREFIX.len() {
                    var.push('_');
                }
                pending_sep = false;
                var.push(c.to_ascii_uppercase());
            } else {
                pending_sep = true;
            }
        }
        var
    }
}

impl ParameterLookup for EnvParameters {
    fn get_parameter(&self, name: &str) -> anyhow::Result<Option<String>> {
        match std::env::var(Self::variable_name(name)) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(anyhow::anyhow!(e)),
        }
    }
}

/// Tries each lookup in order; the first one that knows the parameter wins.
#[derive(Default)]
pub struct LookupChain {
    lookups: Vec<Box<dyn ParameterLookup>>,
}

impl LookupChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lookup: impl ParameterLookup + 'static) -> Self {
        self.lookups.push(Box::new(lookup));
        self
    }
}

impl ParameterLookup for LookupChain {
    fn get_parameter(&self, name: &str) -> anyhow::Result<Option<String>> {
        for lookup in &self.lookups {
            if let Some(value) = lookup.get_parameter(name)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// Resolve the notification target named `parameter_name`.
///
/// A failing lookup, a missing parameter and a blank value are all
/// `ExternalLookupFailure`. The returned locator is the value exactly as the
/// lookup returned it.
pub fn resolve_notification_target<L: ParameterLookup + ?Sized>(
    lookup: &L,
    parameter_name: &str,
) -> Result<NotificationTarget, TopologyError> {
    let value = lookup
        .get_parameter(parameter_name)
        .map_err(|e| TopologyError::lookup_failed(parameter_name, e.to_string()))?
        .ok_or_else(|| TopologyError::lookup_failed(parameter_name, "parameter not found"))?;

    if value.trim().is_empty() {
        return Err(TopologyError::lookup_failed(
            parameter_name,
            "parameter is empty",
        ));
    }

    tracing::debug!(parameter = %parameter_name, "Resolved notification target");
    Ok(NotificationTarget::new(parameter_name, value))
}
