//! Permission grants and the external notification target.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resource::{FunctionRole, ResourceKind};

/// Access a grant confers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    Read,
    Write,
    ReadWrite,
    /// Put events onto an external bus.
    Publish,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Read => write!(f, "read"),
            AccessLevel::Write => write!(f, "write"),
            AccessLevel::ReadWrite => write!(f, "read-write"),
            AccessLevel::Publish => write!(f, "publish"),
        }
    }
}

/// What a grant gives access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    ObjectStore,
    Table,
    NotificationBus,
}

impl TargetKind {
    /// The grantable target kind of a declared resource, if any.
    pub fn from_resource(kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::ObjectStore => Some(TargetKind::ObjectStore),
            ResourceKind::Table => Some(TargetKind::Table),
            ResourceKind::Function | ResourceKind::Gateway => None,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::ObjectStore => write!(f, "object store"),
            TargetKind::Table => write!(f, "table"),
            TargetKind::NotificationBus => write!(f, "notification bus"),
        }
    }
}

/// The external event bus, resolved by name from the shared parameter store.
///
/// Only referenced by the topology, never declared by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTarget {
    parameter_name: String,
    locator: String,
}

impl NotificationTarget {
    pub fn new(parameter_name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            locator: locator.into(),
        }
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    /// Opaque locator of the bus (an ARN in practice).
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

/// The side of a grant that owns the accessed thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Grantor {
    /// A resource declared in this topology.
    Resource {
        logical_name: String,
        physical_name: String,
        kind: TargetKind,
    },
    /// The external notification bus.
    External { target: NotificationTarget },
}

impl Grantor {
    pub fn target_kind(&self) -> TargetKind {
        match self {
            Grantor::Resource { kind, .. } => *kind,
            Grantor::External { .. } => TargetKind::NotificationBus,
        }
    }

    /// Name used in logs and error messages.
    pub fn display_name(&self) -> &str {
        match self {
            Grantor::Resource { logical_name, .. } => logical_name,
            Grantor::External { target } => target.parameter_name(),
        }
    }
}

/// A directed, action-scoped access edge from a grantor to a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    grantor: Grantor,
    grantee: String,
    grantee_role: FunctionRole,
    access: AccessLevel,
    /// Provider actions the access level expands to.
    actions: Vec<String>,
    /// Provider resource locators the actions apply to.
    resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<serde_json::Value>,
}

impl PermissionGrant {
    pub fn new(
        grantor: Grantor,
        grantee: impl Into<String>,
        grantee_role: FunctionRole,
        access: AccessLevel,
        actions: Vec<String>,
        resources: Vec<String>,
    ) -> Self {
        Self {
            grantor,
            grantee: grantee.into(),
            grantee_role,
            access,
            actions,
            resources,
            condition: None,
        }
    }

    /// Attach a provider condition block.
    pub fn with_condition(mut self, condition: serde_json::Value) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn grantor(&self) -> &Grantor {
        &self.grantor
    }

    /// Logical name of the function receiving access.
    pub fn grantee(&self) -> &str {
        &self.grantee
    }

    pub fn grantee_role(&self) -> FunctionRole {
        self.grantee_role
    }

    pub fn access(&self) -> AccessLevel {
        self.access
    }

    pub fn target_kind(&self) -> TargetKind {
        self.grantor.target_kind()
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    pub fn condition(&self) -> Option<&serde_json::Value> {
        self.condition.as_ref()
    }
}
