//! Compute function declaration.
//!
//! Both functions consume identifiers of the storage resources as environment
//! bindings, so storage must be declared first. This is the one hard ordering
//! rule of the topology and it is checked here against the registry rather
//! than assumed.

use ensemble_core::{
    BindingRef, FunctionRole, FunctionsConfig, ResourceDescriptor, ResourceProperties,
    RetentionPolicy, Stage, TopologyError, identifiers, physical_name,
};

use crate::provision::object_store::BUCKET_LOGICAL_NAME;
use crate::provision::table::TABLE_LOGICAL_NAME;
use crate::registry::ResourceRegistry;

/// Variable carrying the bucket name at runtime.
pub const STANDARD_BUCKET_NAME_VAR: &str = "STANDARD_BUCKET_NAME";
/// Variable carrying the table name at runtime.
pub const TABLE_NAME_VAR: &str = "TABLE_NAME";

/// Environment bindings requested for each function.
#[derive(Debug, Clone, Default)]
pub struct ComputeBindings {
    pub api_handler: Vec<BindingRef>,
    pub event_hook: Vec<BindingRef>,
}

impl ComputeBindings {
    /// The bindings of the standard topology: the API handler sees the bucket
    /// and the table, the event hook sees the table only.
    pub fn standard() -> Self {
        Self {
            api_handler: vec![
                BindingRef::new(
                    STANDARD_BUCKET_NAME_VAR,
                    BUCKET_LOGICAL_NAME,
                    identifiers::BUCKET_NAME,
                ),
                BindingRef::new(TABLE_NAME_VAR, TABLE_LOGICAL_NAME, identifiers::TABLE_NAME),
            ],
            event_hook: vec![BindingRef::new(
                TABLE_NAME_VAR,
                TABLE_LOGICAL_NAME,
                identifiers::TABLE_NAME,
            )],
        }
    }

    fn for_role(&self, role: FunctionRole) -> &[BindingRef] {
        match role {
            FunctionRole::ApiHandler => &self.api_handler,
            FunctionRole::EventHook => &self.event_hook,
        }
    }
}

/// Declares the API handler and the event hook.
#[derive(Debug, Clone)]
pub struct ComputeProvisioner {
    prefix: String,
    functions: FunctionsConfig,
}

impl ComputeProvisioner {
    pub fn new(prefix: impl Into<String>, functions: FunctionsConfig) -> Self {
        Self {
            prefix: prefix.into(),
            functions,
        }
    }

    /// Declare both functions, resolving their bindings against `registry`.
    ///
    /// Returns `(api_handler, event_hook)`.
    pub fn declare(
        &self,
        stage: Stage,
        registry: &ResourceRegistry,
        bindings: &ComputeBindings,
    ) -> Result<(ResourceDescriptor, ResourceDescriptor), TopologyError> {
        let api_handler = self.declare_function(stage, FunctionRole::ApiHandler, registry, bindings)?;
        let event_hook = self.declare_function(stage, FunctionRole::EventHook, registry, bindings)?;
        Ok((api_handler, event_hook))
    }

    fn declare_function(
        &self,
        stage: Stage,
        role: FunctionRole,
        registry: &ResourceRegistry,
        bindings: &ComputeBindings,
    ) -> Result<ResourceDescriptor, TopologyError> {
        let logical = role.logical_name();

        registry.require(logical, BUCKET_LOGICAL_NAME)?;
        registry.require(logical, TABLE_LOGICAL_NAME)?;

        let environment = bindings
            .for_role(role)
            .iter()
            .map(|b| registry.resolve_binding(logical, b))
            .collect::<Result<Vec<_>, _>>()?;

        let name = physical_name(&self.prefix, &role.name_segment(), stage);

        tracing::debug!(
            logical,
            physical = %name,
            bindings = environment.len(),
            "Declared compute function"
        );

        Ok(ResourceDescriptor::new(
            logical,
            name.clone(),
            RetentionPolicy::DestroyOnTeardown,
            ResourceProperties::Function {
                role,
                runtime: self.functions.runtime.clone(),
                manifest_path: self.functions.manifest_path(role),
                environment,
            },
        )
        .with_identifier(identifiers::INVOKE_TARGET, invoke_target(&name))
        .with_identifier(identifiers::FUNCTION_NAME, name))
    }
}

/// Locator by which a gateway invokes the function.
fn invoke_target(function_name: &str) -> String {
    format!("arn:aws:lambda:*:*:function:{}", function_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::object_store::ObjectStoreProvisioner;
    use crate::provision::table::TableProvisioner;
    use ensemble_core::ErrorKind;
    use ensemble_policy::StoragePolicy;

    const PREFIX: &str = "exogenesis-ensemble";

    fn registry_with_storage(stage: Stage) -> ResourceRegistry {
        let policy = StoragePolicy::for_stage(stage);
        let mut registry = ResourceRegistry::new();
        registry
            .register(ObjectStoreProvisioner::new(PREFIX).declare(stage, &policy))
            .unwrap();
        registry
            .register(TableProvisioner::new(PREFIX).declare(stage, &policy))
            .unwrap();
        registry
    }

    #[test]
    fn test_declare_after_storage() {
        let registry = registry_with_storage(Stage::Dev);
        let provisioner = ComputeProvisioner::new(PREFIX, FunctionsConfig::default());

        let (api, hook) = provisioner
            .declare(Stage::Dev, &registry, &ComputeBindings::standard())
            .unwrap();

        assert_eq!(api.physical_name(), "exogenesis-ensemble-web-api-app-dev");
        assert_eq!(hook.physical_name(), "exogenesis-ensemble-s3-hook-app-dev");
        assert_eq!(api.function_role(), Some(FunctionRole::ApiHandler));
        assert_eq!(hook.function_role(), Some(FunctionRole::EventHook));

        let api_vars: Vec<(&str, &str)> = api
            .environment()
            .iter()
            .map(|b| (b.variable.as_str(), b.value.as_str()))
            .collect();
        assert_eq!(
            api_vars,
            vec![
                ("STANDARD_BUCKET_NAME", "exogenesis-ensemble-bucket-dev"),
                ("TABLE_NAME", "exogenesis-ensemble-table-dev"),
            ]
        );

        assert_eq!(hook.environment().len(), 1);
        assert_eq!(hook.environment()[0].variable, "TABLE_NAME");
        assert_eq!(hook.environment()[0].value, "exogenesis-ensemble-table-dev");

        assert!(api.identifier(identifiers::INVOKE_TARGET).is_some());
    }

    #[test]
    fn test_declare_before_storage_fails() {
        let registry = ResourceRegistry::new();
        let provisioner = ComputeProvisioner::new(PREFIX, FunctionsConfig::default());

        let err = provisioner
            .declare(Stage::Dev, &registry, &ComputeBindings::standard())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);
    }

    #[test]
    fn test_declare_with_only_bucket_fails() {
        let policy = StoragePolicy::for_stage(Stage::Dev);
        let mut registry = ResourceRegistry::new();
        registry
            .register(ObjectStoreProvisioner::new(PREFIX).declare(Stage::Dev, &policy))
            .unwrap();

        let provisioner = ComputeProvisioner::new(PREFIX, FunctionsConfig::default());
        let err = provisioner
            .declare(Stage::Dev, &registry, &ComputeBindings::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TopologyError::MissingDependency { ref requirement, .. } if requirement.contains("CollectionTable")
        ));
    }

    #[test]
    fn test_function_build_settings() {
        let registry = registry_with_storage(Stage::Prod);
        let provisioner = ComputeProvisioner::new(PREFIX, FunctionsConfig::default());
        let (api, _) = provisioner
            .declare(Stage::Prod, &registry, &ComputeBindings::standard())
            .unwrap();

        let ResourceProperties::Function {
            runtime,
            manifest_path,
            ..
        } = api.properties()
        else {
            panic!("expected function properties");
        };
        assert_eq!(runtime, "provided.al2");
        assert_eq!(manifest_path, "lambdas/web-api-app");
        assert_eq!(api.retention(), RetentionPolicy::DestroyOnTeardown);
    }
}
