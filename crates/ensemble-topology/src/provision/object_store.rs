//! Object storage declaration.

use ensemble_core::{
    ResourceDescriptor, ResourceProperties, Stage, identifiers, physical_name, segments,
};
use ensemble_policy::StoragePolicy;

/// Logical name of the standard bucket.
pub const BUCKET_LOGICAL_NAME: &str = "StandardBucket";

/// Declares the standard bucket.
#[derive(Debug, Clone)]
pub struct ObjectStoreProvisioner {
    prefix: String,
}

impl ObjectStoreProvisioner {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Declare the bucket under `policy`.
    pub fn declare(&self, stage: Stage, policy: &StoragePolicy) -> ResourceDescriptor {
        let name = physical_name(&self.prefix, segments::BUCKET, stage);

        tracing::debug!(
            logical = BUCKET_LOGICAL_NAME,
            physical = %name,
            retention = ?policy.retention,
            "Declared object store"
        );

        ResourceDescriptor::new(
            BUCKET_LOGICAL_NAME,
            name.clone(),
            policy.retention,
            ResourceProperties::ObjectStore {
                auto_delete_objects: policy.auto_cleanup,
            },
        )
        .with_identifier(identifiers::BUCKET_NAME, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_core::{ResourceKind, RetentionPolicy};

    #[test]
    fn test_dev_bucket() {
        let provisioner = ObjectStoreProvisioner::new("exogenesis-ensemble");
        let bucket = provisioner.declare(Stage::Dev, &StoragePolicy::for_stage(Stage::Dev));

        assert_eq!(bucket.kind(), ResourceKind::ObjectStore);
        assert_eq!(bucket.physical_name(), "exogenesis-ensemble-bucket-dev");
        assert_eq!(
            bucket.identifier(identifiers::BUCKET_NAME),
            Some("exogenesis-ensemble-bucket-dev")
        );
        assert_eq!(bucket.retention(), RetentionPolicy::DestroyOnTeardown);
        assert_eq!(
            bucket.properties(),
            &ResourceProperties::ObjectStore {
                auto_delete_objects: true
            }
        );
    }

    #[test]
    fn test_declaring_twice_yields_same_name() {
        let provisioner = ObjectStoreProvisioner::new("exogenesis-ensemble");
        let policy = StoragePolicy::for_stage(Stage::Prod);
        let first = provisioner.declare(Stage::Prod, &policy);
        let second = provisioner.declare(Stage::Prod, &policy);
        assert_eq!(first.physical_name(), second.physical_name());
        assert_eq!(first, second);
    }
}
