//! The completed topology.

use ensemble_core::{
    FunctionRole, NotificationTarget, PermissionGrant, ResourceDescriptor, Stage,
};
use serde::Serialize;

/// Output of one successful composition run.
///
/// Only the assembler builds a `Topology`, and only once every step has
/// succeeded, so a value of this type is always complete. It is serialized
/// for hand-off but never read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    stage: Stage,
    stack_name: String,
    notification: NotificationTarget,
    /// Declaration order: store, table, API handler, event hook, gateway.
    resources: Vec<ResourceDescriptor>,
    /// Wiring order.
    grants: Vec<PermissionGrant>,
}

impl Topology {
    pub(crate) fn new(
        stage: Stage,
        stack_name: String,
        notification: NotificationTarget,
        resources: Vec<ResourceDescriptor>,
        grants: Vec<PermissionGrant>,
    ) -> Self {
        Self {
            stage,
            stack_name,
            notification,
            resources,
            grants,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Name of the deployment stack, e.g. `ExogenesisEnsemblePart3Redemption-dev`.
    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    pub fn notification(&self) -> &NotificationTarget {
        &self.notification
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn grants(&self) -> &[PermissionGrant] {
        &self.grants
    }

    pub fn resource(&self, logical_name: &str) -> Option<&ResourceDescriptor> {
        self.resources
            .iter()
            .find(|r| r.logical_name() == logical_name)
    }

    pub fn function(&self, role: FunctionRole) -> Option<&ResourceDescriptor> {
        self.resources
            .iter()
            .find(|r| r.function_role() == Some(role))
    }

    /// Grants received by the function named `logical_name`.
    pub fn grants_for<'a>(
        &'a self,
        logical_name: &'a str,
    ) -> impl Iterator<Item = &'a PermissionGrant> + 'a {
        self.grants.iter().filter(move |g| g.grantee() == logical_name)
    }
}

/// Stack name for `stage`.
pub fn stack_name(stack_prefix: &str, stage: Stage) -> String {
    format!("{}-{}", stack_prefix, stage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_name() {
        assert_eq!(
            stack_name("ExogenesisEnsemblePart3Redemption", Stage::Dev),
            "ExogenesisEnsemblePart3Redemption-dev"
        );
        assert_eq!(
            stack_name("ExogenesisEnsemblePart3Redemption", Stage::Prod),
            "ExogenesisEnsemblePart3Redemption-prod"
        );
    }
}
