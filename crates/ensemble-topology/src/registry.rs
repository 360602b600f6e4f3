//! Declared resources of one composition run.

use ensemble_core::{BindingRef, EnvironmentBinding, ResourceDescriptor, TopologyError};

/// Resources declared so far, in declaration order.
///
/// Later steps resolve references against the registry, so a reference to a
/// resource that has not been declared yet is detected instead of assumed.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: Vec<ResourceDescriptor>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declared resource.
    ///
    /// Descriptors are never redeclared: if the logical name is already taken
    /// the first descriptor is kept and `PolicyViolation` is returned.
    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Result<(), TopologyError> {
        if self.contains(descriptor.logical_name()) {
            tracing::warn!(
                logical = %descriptor.logical_name(),
                "Rejecting redeclaration of resource"
            );
            return Err(TopologyError::policy_violation(format!(
                "resource '{}' is already declared",
                descriptor.logical_name()
            )));
        }
        self.resources.push(descriptor);
        Ok(())
    }

    pub fn contains(&self, logical_name: &str) -> bool {
        self.get(logical_name).is_some()
    }

    pub fn get(&self, logical_name: &str) -> Option<&ResourceDescriptor> {
        self.resources
            .iter()
            .find(|r| r.logical_name() == logical_name)
    }

    /// Get a declared resource on behalf of `dependent`.
    pub fn require(
        &self,
        dependent: &str,
        logical_name: &str,
    ) -> Result<&ResourceDescriptor, TopologyError> {
        self.get(logical_name).ok_or_else(|| {
            TopologyError::missing_dependency(dependent, format!("resource '{}'", logical_name))
        })
    }

    /// Resolve an environment binding against declared resources.
    pub fn resolve_binding(
        &self,
        dependent: &str,
        binding: &BindingRef,
    ) -> Result<EnvironmentBinding, TopologyError> {
        let resource = self.require(dependent, &binding.resource)?;
        let value = resource.identifier(&binding.identifier).ok_or_else(|| {
            TopologyError::missing_identifier(dependent, &binding.resource, &binding.identifier)
        })?;

        Ok(EnvironmentBinding {
            variable: binding.variable.clone(),
            resource: binding.resource.clone(),
            identifier: binding.identifier.clone(),
            value: value.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.iter()
    }

    pub fn into_resources(self) -> Vec<ResourceDescriptor> {
        self.resources
    }
}
