//! # ensemble-core
//!
//! Value types shared by every Exogenesis Ensemble crate: the deployment
//! [`Stage`], resource descriptors, permission grants, composition errors and
//! the project configuration.

pub mod config;
pub mod error;
pub mod grant;
pub mod resource;
pub mod stage;

pub use config::{ConfigError, EnsembleConfig, FunctionsConfig, NotificationConfig, StageConfig};
pub use error::{ErrorKind, TopologyError};
pub use grant::{AccessLevel, Grantor, NotificationTarget, PermissionGrant, TargetKind};
pub use resource::{
    AttributeType, BillingMode, BindingRef, EnvironmentBinding, FunctionRole, GatewayRoute,
    KeyAttribute, ResourceDescriptor, ResourceKind, ResourceProperties, RetentionPolicy,
    identifiers, physical_name, segments,
};
pub use stage::Stage;

/// Result alias for composition operations.
pub type TopologyResult<T> = Result<T, TopologyError>;
