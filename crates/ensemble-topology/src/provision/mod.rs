//! Resource provisioners.
//!
//! Each provisioner turns the stage (and, for stateful resources, the
//! storage policy) into an immutable [`ensemble_core::ResourceDescriptor`].

pub mod compute;
pub mod gateway;
pub mod object_store;
pub mod table;

pub use compute::{ComputeBindings, ComputeProvisioner, STANDARD_BUCKET_NAME_VAR, TABLE_NAME_VAR};
pub use gateway::{GATEWAY_LOGICAL_NAME, GatewayBinder};
pub use object_store::{BUCKET_LOGICAL_NAME, ObjectStoreProvisioner};
pub use table::{TABLE_LOGICAL_NAME, TableProvisioner};
