//! Permission wiring.
//!
//! The binder checks every request against the [`LeastPrivilegeTable`] and
//! the registry of declared resources before producing a grant. It rejects;
//! it never adjusts a request to make it fit.

use ensemble_core::{
    AccessLevel, FunctionRole, Grantor, NotificationTarget, PermissionGrant, ResourceDescriptor,
    TargetKind, TopologyError, identifiers,
};
use ensemble_policy::LeastPrivilegeTable;
use ensemble_policy::actions::{object_store_locators, provider_actions, table_locators};

use crate::registry::ResourceRegistry;

/// Produces permission grants for declared resources.
pub struct PermissionBinder<'a> {
    /// Resources declared in this run.
    registry: &'a ResourceRegistry,
    table: LeastPrivilegeTable,
}

impl<'a> PermissionBinder<'a> {
    pub fn new(registry: &'a ResourceRegistry) -> Self {
        Self {
            registry,
            table: LeastPrivilegeTable::new(),
        }
    }

    /// Grant `grantee` `access` to the resource `grantor`.
    pub fn grant(
        &self,
        grantor: &ResourceDescriptor,
        grantee: &ResourceDescriptor,
        access: AccessLevel,
    ) -> Result<PermissionGrant, TopologyError> {
        let role = self.grantee_role(grantee)?;

        let target = TargetKind::from_resource(grantor.kind()).ok_or_else(|| {
            TopologyError::policy_violation(format!(
                "a {} ('{}') cannot grant access",
                grantor.kind(),
                grantor.logical_name()
            ))
        })?;

        self.require_declared(grantee.logical_name(), grantor)?;
        self.require_declared(grantor.logical_name(), grantee)?;

        self.table.check(role, target, access)?;

        let resources = match target {
            TargetKind::ObjectStore => {
                object_store_locators(self.identifier(grantee, grantor, identifiers::BUCKET_NAME)?)
            }
            TargetKind::Table => {
                table_locators(self.identifier(grantee, grantor, identifiers::TABLE_NAME)?)
            }
            TargetKind::NotificationBus => Vec::new(),
        };

        tracing::debug!(
            grantor = %grantor.logical_name(),
            grantee = %grantee.logical_name(),
            %access,
            "Granted access"
        );

        Ok(PermissionGrant::new(
            Grantor::Resource {
                logical_name: grantor.logical_name().to_string(),
                physical_name: grantor.physical_name().to_string(),
                kind: target,
            },
            grantee.logical_name(),
            role,
            access,
            provider_actions(target, access),
            resources,
        ))
    }

    /// Grant `grantee` permission to publish to the external notification bus.
    pub fn grant_external_publish(
        &self,
        grantee: &ResourceDescriptor,
        target: &NotificationTarget,
    ) -> Result<PermissionGrant, TopologyError> {
        let role = self.grantee_role(grantee)?;
        self.require_declared(target.parameter_name(), grantee)?;

        self.table
            .check(role, TargetKind::NotificationBus, AccessLevel::Publish)?;

        tracing::debug!(
            grantee = %grantee.logical_name(),
            parameter = %target.parameter_name(),
            "Granted publish to notification bus"
        );

        Ok(PermissionGrant::new(
            Grantor::External {
                target: target.clone(),
            },
            grantee.logical_name(),
            role,
            AccessLevel::Publish,
            provider_actions(TargetKind::NotificationBus, AccessLevel::Publish),
            vec![target.locator().to_string()],
        ))
    }

    /// Only compute functions receive grants.
    fn grantee_role(&self, grantee: &ResourceDescriptor) -> Result<FunctionRole, TopologyError> {
        grantee.function_role().ok_or_else(|| {
            TopologyError::policy_violation(format!(
                "only functions may receive grants, '{}' is a {}",
                grantee.logical_name(),
                grantee.kind()
            ))
        })
    }

    fn require_declared(
        &self,
        dependent: &str,
        resource: &ResourceDescriptor,
    ) -> Result<(), TopologyError> {
        self.registry.require(dependent, resource.logical_name())?;
        Ok(())
    }

    fn identifier<'d>(
        &self,
        grantee: &ResourceDescriptor,
        grantor: &'d ResourceDescriptor,
        key: &str,
    ) -> Result<&'d str, TopologyError> {
        grantor.identifier(key).ok_or_else(|| {
            TopologyError::missing_identifier(grantee.logical_name(), grantor.logical_name(), key)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::{
        ComputeBindings, ComputeProvisioner, ObjectStoreProvisioner, TableProvisioner,
    };
    use ensemble_core::{ErrorKind, FunctionsConfig, Stage};
    use ensemble_policy::StoragePolicy;

    struct Fixture {
        registry: ResourceRegistry,
        bucket: ResourceDescriptor,
        table: ResourceDescriptor,
        api: ResourceDescriptor,
        hook: ResourceDescriptor,
    }

    fn fixture() -> Fixture {
        let stage = Stage::Dev;
        let policy = StoragePolicy::for_stage(stage);
        let bucket = ObjectStoreProvisioner::new("app").declare(stage, &policy);
        let table = TableProvisioner::new("app").declare(stage, &policy);

        let mut registry = ResourceRegistry::new();
        registry.register(bucket.clone()).unwrap();
        registry.register(table.clone()).unwrap();

        let (api, hook) = ComputeProvisioner::new("app", FunctionsConfig::default())
            .declare(stage, &registry, &ComputeBindings::standard())
            .unwrap();
        registry.register(api.clone()).unwrap();
        registry.register(hook.clone()).unwrap();

        Fixture {
            registry,
            bucket,
            table,
            api,
            hook,
        }
    }

    #[test]
    fn test_grant_required_pairs() {
        let f = fixture();
        let binder = PermissionBinder::new(&f.registry);

        let grant = binder
            .grant(&f.bucket, &f.api, AccessLevel::ReadWrite)
            .unwrap();
        assert_eq!(grant.grantee(), "WebAPIFunction");
        assert_eq!(grant.target_kind(), TargetKind::ObjectStore);
        assert!(grant.actions().contains(&"s3:PutObject".to_string()));
        assert_eq!(
            grant.resources(),
            &[
                "arn:aws:s3:::app-bucket-dev".to_string(),
                "arn:aws:s3:::app-bucket-dev/*".to_string()
            ]
        );

        binder.grant(&f.bucket, &f.hook, AccessLevel::Read).unwrap();
        binder.grant(&f.table, &f.api, AccessLevel::Read).unwrap();
        let grant = binder
            .grant(&f.table, &f.hook, AccessLevel::ReadWrite)
            .unwrap();
        assert_eq!(grant.resources(), &["arn:aws:dynamodb:*:*:table/app-table-dev".to_string()]);
    }

    #[test]
    fn test_grant_outside_table_is_rejected() {
        let f = fixture();
        let binder = PermissionBinder::new(&f.registry);

        let err = binder
            .grant(&f.table, &f.api, AccessLevel::ReadWrite)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);

        let err = binder
            .grant(&f.bucket, &f.hook, AccessLevel::ReadWrite)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    }

    #[test]
    fn test_non_function_grantee_is_rejected() {
        let f = fixture();
        let binder = PermissionBinder::new(&f.registry);
        let err = binder
            .grant(&f.bucket, &f.table, AccessLevel::Read)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    }

    #[test]
    fn test_function_grantor_is_rejected() {
        let f = fixture();
        let binder = PermissionBinder::new(&f.registry);
        let err = binder.grant(&f.api, &f.hook, AccessLevel::Read).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    }

    #[test]
    fn test_undeclared_grantee_is_missing_dependency() {
        let f = fixture();
        let mut partial = ResourceRegistry::new();
        partial.register(f.bucket.clone()).unwrap();

        let binder = PermissionBinder::new(&partial);
        let err = binder
            .grant(&f.bucket, &f.api, AccessLevel::ReadWrite)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);
    }

    #[test]
    fn test_external_publish() {
        let f = fixture();
        let binder = PermissionBinder::new(&f.registry);
        let target = NotificationTarget::new("/arn/notification/event-bus", "arn:bus");

        let grant = binder.grant_external_publish(&f.hook, &target).unwrap();
        assert_eq!(grant.access(), AccessLevel::Publish);
        assert_eq!(grant.target_kind(), TargetKind::NotificationBus);
        assert_eq!(grant.actions(), &["events:PutEvents".to_string()]);
        assert_eq!(grant.resources(), &["arn:bus".to_string()]);

        let err = binder
            .grant_external_publish(&f.bucket, &target)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    }
}
