//! Resource descriptors.
//!
//! A [`ResourceDescriptor`] is the in-memory declaration of a cloud resource
//! before the IaC platform creates it. Descriptors are immutable once built:
//! later composition steps only read them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::stage::Stage;

/// Identifier keys a resource may expose to downstream resources.
pub mod identifiers {
    /// Physical bucket name of an object store.
    pub const BUCKET_NAME: &str = "bucketName";
    /// Physical table name of a key-value table.
    pub const TABLE_NAME: &str = "tableName";
    /// Physical function name of a compute function.
    pub const FUNCTION_NAME: &str = "functionName";
    /// Identifier a gateway uses to invoke a compute function.
    pub const INVOKE_TARGET: &str = "invokeTarget";
    /// Name of the REST API exposed by a gateway.
    pub const REST_API_NAME: &str = "restApiName";
}

/// Name segments identifying the resource kind inside a physical name.
pub mod segments {
    pub const BUCKET: &str = "bucket";
    pub const TABLE: &str = "table";
    pub const GATEWAY: &str = "api-gateway";
}

/// Kinds of resources the topology declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    ObjectStore,
    Table,
    Function,
    Gateway,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::ObjectStore => write!(f, "object store"),
            ResourceKind::Table => write!(f, "table"),
            ResourceKind::Function => write!(f, "function"),
            ResourceKind::Gateway => write!(f, "gateway"),
        }
    }
}

/// What happens to a resource when its stack is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionPolicy {
    /// The resource survives teardown.
    Retain,
    /// The resource is deleted with the stack.
    DestroyOnTeardown,
}

/// Role of a compute function within the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionRole {
    /// Web-facing handler behind the HTTP gateway.
    ApiHandler,
    /// Handler triggered by object storage events.
    EventHook,
}

impl FunctionRole {
    pub const ALL: [FunctionRole; 2] = [FunctionRole::ApiHandler, FunctionRole::EventHook];

    /// Segment used in physical names and manifest paths.
    pub fn segment(&self) -> &'static str {
        match self {
            FunctionRole::ApiHandler => "web-api",
            FunctionRole::EventHook => "s3-hook",
        }
    }

    /// Segment used in the function's physical name.
    pub fn name_segment(&self) -> String {
        format!("{}-app", self.segment())
    }

    /// Logical name of the function within the topology.
    pub fn logical_name(&self) -> &'static str {
        match self {
            FunctionRole::ApiHandler => "WebAPIFunction",
            FunctionRole::EventHook => "S3HookFunction",
        }
    }
}

impl fmt::Display for FunctionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionRole::ApiHandler => write!(f, "apiHandler"),
            FunctionRole::EventHook => write!(f, "eventHook"),
        }
    }
}

/// Scalar type of a table key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Number,
}

/// A key attribute of a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }
}

/// Throughput model of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    /// On-demand capacity; nothing to provision or tune.
    PayPerRequest,
}

/// Routing rule of a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayRoute {
    /// All paths and all methods go to the target function.
    ProxyAll,
}

/// A reference from an environment variable to an identifier of another
/// resource, prior to resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingRef {
    pub variable: String,
    pub resource: String,
    pub identifier: String,
}

impl BindingRef {
    pub fn new(
        variable: impl Into<String>,
        resource: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            variable: variable.into(),
            resource: resource.into(),
            identifier: identifier.into(),
        }
    }
}

/// An environment variable resolved against an already-declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentBinding {
    /// Variable name seen by the function at runtime.
    pub variable: String,
    /// Logical name of the resource the value came from.
    pub resource: String,
    /// Identifier key on that resource.
    pub identifier: String,
    /// Resolved value.
    pub value: String,
}

/// Kind-specific attributes of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceProperties {
    ObjectStore {
        auto_delete_objects: bool,
    },
    Table {
        partition_key: KeyAttribute,
        sort_key: KeyAttribute,
        billing_mode: BillingMode,
    },
    Function {
        role: FunctionRole,
        runtime: String,
        manifest_path: String,
        environment: Vec<EnvironmentBinding>,
    },
    Gateway {
        target: String,
        invoke_target: String,
        route: GatewayRoute,
    },
}

impl ResourceProperties {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceProperties::ObjectStore { .. } => ResourceKind::ObjectStore,
            ResourceProperties::Table { .. } => ResourceKind::Table,
            ResourceProperties::Function { .. } => ResourceKind::Function,
            ResourceProperties::Gateway { .. } => ResourceKind::Gateway,
        }
    }
}

/// A declared cloud resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    logical_name: String,
    physical_name: String,
    retention: RetentionPolicy,
    #[serde(default)]
    identifiers: BTreeMap<String, String>,
    properties: ResourceProperties,
}

impl ResourceDescriptor {
    /// Create a descriptor with no exposed identifiers.
    pub fn new(
        logical_name: impl Into<String>,
        physical_name: impl Into<String>,
        retention: RetentionPolicy,
        properties: ResourceProperties,
    ) -> Self {
        Self {
            logical_name: logical_name.into(),
            physical_name: physical_name.into(),
            retention,
            identifiers: BTreeMap::new(),
            properties,
        }
    }

    /// Expose an identifier. Only usable while the descriptor is being built.
    pub fn with_identifier(mut self, key: &str, value: impl Into<String>) -> Self {
        self.identifiers.insert(key.to_string(), value.into());
        self
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn physical_name(&self) -> &str {
        &self.physical_name
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    pub fn kind(&self) -> ResourceKind {
        self.properties.kind()
    }

    pub fn properties(&self) -> &ResourceProperties {
        &self.properties
    }

    pub fn identifiers(&self) -> &BTreeMap<String, String> {
        &self.identifiers
    }

    /// Look up an exposed identifier.
    pub fn identifier(&self, key: &str) -> Option<&str> {
        self.identifiers.get(key).map(|s| s.as_str())
    }

    /// The function role, if this descriptor is a compute function.
    pub fn function_role(&self) -> Option<FunctionRole> {
        match &self.properties {
            ResourceProperties::Function { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// Resolved environment bindings (empty for non-function resources).
    pub fn environment(&self) -> &[EnvironmentBinding] {
        match &self.properties {
            ResourceProperties::Function { environment, .. } => environment,
            _ => &[],
        }
    }
}

/// Build a physical resource name.
///
/// The name is a pure function of its inputs, so composing the same stage
/// twice yields the same name.
pub fn physical_name(prefix: &str, segment: &str, stage: Stage) -> String {
    format!("{}-{}-{}", prefix, segment, stage)
}
