//! Composition state machine.
//!
//! The assembler owns every descriptor of one run and drives the components
//! in dependency order:
//!
//! ```text
//! Uninitialized -> StageResolved -> StorageDeclared -> ComputeDeclared
//!     -> GatewayBound -> PermissionsGranted -> Complete
//! ```
//!
//! Each transition is an explicit method call. A step called out of order,
//! or after an earlier step failed, is reported as `MissingDependency`.

use std::fmt;

use ensemble_core::{
    AccessLevel, EnsembleConfig, ErrorKind, FunctionRole, NotificationTarget, PermissionGrant,
    ResourceDescriptor, Stage, TopologyError,
};
use ensemble_policy::StoragePolicy;
use thiserror::Error;

use crate::lookup::{ParameterLookup, resolve_notification_target};
use crate::permissions::PermissionBinder;
use crate::provision::{
    BUCKET_LOGICAL_NAME, ComputeBindings, ComputeProvisioner, GATEWAY_LOGICAL_NAME, GatewayBinder,
    ObjectStoreProvisioner, TABLE_LOGICAL_NAME, TableProvisioner,
};
use crate::registry::ResourceRegistry;
use crate::resolver::StageResolver;
use crate::topology::{Topology, stack_name};

/// Internal grants of the standard topology, in wiring order.
const INTERNAL_GRANTS: [(&str, FunctionRole, AccessLevel); 4] = [
    (BUCKET_LOGICAL_NAME, FunctionRole::ApiHandler, AccessLevel::ReadWrite),
    (BUCKET_LOGICAL_NAME, FunctionRole::EventHook, AccessLevel::Read),
    (TABLE_LOGICAL_NAME, FunctionRole::ApiHandler, AccessLevel::Read),
    (TABLE_LOGICAL_NAME, FunctionRole::EventHook, AccessLevel::ReadWrite),
];

/// Position of the assembler in the composition sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssemblyState {
    Uninitialized,
    StageResolved,
    StorageDeclared,
    ComputeDeclared,
    GatewayBound,
    PermissionsGranted,
    Complete,
}

impl AssemblyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::StageResolved => "StageResolved",
            Self::StorageDeclared => "StorageDeclared",
            Self::ComputeDeclared => "ComputeDeclared",
            Self::GatewayBound => "GatewayBound",
            Self::PermissionsGranted => "PermissionsGranted",
            Self::Complete => "Complete",
        }
    }
}

impl fmt::Display for AssemblyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed composition run: the originating error and the state the
/// assembler was in when it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("composition aborted in state {state}: {source}")]
pub struct AssemblyError {
    pub state: AssemblyState,
    pub source: TopologyError,
}

impl AssemblyError {
    pub fn new(state: AssemblyState, source: TopologyError) -> Self {
        Self { state, source }
    }

    /// Kind of the originating error.
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Composes the deployment topology for one stage.
pub struct TopologyAssembler<L> {
    config: EnsembleConfig,
    lookup: L,
    stage_override: Option<Stage>,

    state: AssemblyState,
    failed: bool,
    stage: Stage,
    registry: ResourceRegistry,
    notification: Option<NotificationTarget>,
    grants: Vec<PermissionGrant>,
}

impl<L: ParameterLookup> TopologyAssembler<L> {
    pub fn new(config: EnsembleConfig, lookup: L) -> Self {
        Self {
            config,
            lookup,
            stage_override: None,
            state: AssemblyState::Uninitialized,
            failed: false,
            stage: Stage::default(),
            registry: ResourceRegistry::new(),
            notification: None,
            grants: Vec::new(),
        }
    }

    /// Use `stage` instead of reading the stage signal.
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage_override = Some(stage);
        self
    }

    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// The resolved stage, once the first step has run.
    pub fn stage(&self) -> Option<Stage> {
        (self.state >= AssemblyState::StageResolved).then_some(self.stage)
    }

    /// Resources declared so far.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Grants produced so far. Empty until the permission step succeeds.
    pub fn grants(&self) -> &[PermissionGrant] {
        &self.grants
    }

    /// Run every step and return the completed topology.
    pub fn assemble(mut self) -> Result<Topology, AssemblyError> {
        let span = tracing::info_span!("compose", stage = tracing::field::Empty);
        let _enter = span.enter();

        let stage = self.resolve_stage()?;
        span.record("stage", stage.as_str());

        self.declare_storage()?;
        self.declare_compute()?;
        self.bind_gateway()?;
        self.grant_permissions()?;
        let topology = self.complete()?;

        tracing::info!(
            stack = %topology.stack_name(),
            resources = topology.resources().len(),
            grants = topology.grants().len(),
            "Topology composed"
        );
        Ok(topology)
    }

    /// `Uninitialized -> StageResolved`
    pub fn resolve_stage(&mut self) -> Result<Stage, AssemblyError> {
        self.enter("stage resolution", AssemblyState::Uninitialized)?;

        let stage = match self.stage_override {
            Some(stage) => stage,
            None => StageResolver::from_config(&self.config.stage)
                .resolve()
                .map_err(|e| self.fail(e))?,
        };

        self.stage = stage;
        self.advance(AssemblyState::StageResolved);
        Ok(stage)
    }

    /// `StageResolved -> StorageDeclared`
    pub fn declare_storage(&mut self) -> Result<(), AssemblyError> {
        self.enter("storage declaration", AssemblyState::StageResolved)?;

        let policy = StoragePolicy::for_stage(self.stage);
        let prefix = &self.config.app_prefix;
        let bucket = ObjectStoreProvisioner::new(prefix.as_str()).declare(self.stage, &policy);
        let table = TableProvisioner::new(prefix.as_str()).declare(self.stage, &policy);

        self.registry.register(bucket).map_err(|e| self.fail(e))?;
        self.registry.register(table).map_err(|e| self.fail(e))?;
        self.advance(AssemblyState::StorageDeclared);
        Ok(())
    }

    /// `StorageDeclared -> ComputeDeclared`
    pub fn declare_compute(&mut self) -> Result<(), AssemblyError> {
        self.enter("compute declaration", AssemblyState::StorageDeclared)?;

        let provisioner =
            ComputeProvisioner::new(self.config.app_prefix.as_str(), self.config.functions.clone());
        let (api_handler, event_hook) = provisioner
            .declare(self.stage, &self.registry, &ComputeBindings::standard())
            .map_err(|e| self.fail(e))?;

        self.registry.register(api_handler).map_err(|e| self.fail(e))?;
        self.registry.register(event_hook).map_err(|e| self.fail(e))?;
        self.advance(AssemblyState::ComputeDeclared);
        Ok(())
    }

    /// `ComputeDeclared -> GatewayBound`
    pub fn bind_gateway(&mut self) -> Result<(), AssemblyError> {
        self.enter("gateway binding", AssemblyState::ComputeDeclared)?;

        let gateway = self
            .registry
            .require(GATEWAY_LOGICAL_NAME, FunctionRole::ApiHandler.logical_name())
            .and_then(|handler| {
                GatewayBinder::new(self.config.app_prefix.as_str()).expose_http(self.stage, handler)
            })
            .map_err(|e| self.fail(e))?;

        self.registry.register(gateway).map_err(|e| self.fail(e))?;
        self.advance(AssemblyState::GatewayBound);
        Ok(())
    }

    /// `GatewayBound -> PermissionsGranted`
    ///
    /// The notification target is looked up before any grant is produced, so
    /// a failed lookup leaves the run without grants.
    pub fn grant_permissions(&mut self) -> Result<(), AssemblyError> {
        self.enter("permission wiring", AssemblyState::GatewayBound)?;

        let (notification, grants) = self.wire().map_err(|e| self.fail(e))?;

        self.notification = Some(notification);
        self.grants = grants;
        self.advance(AssemblyState::PermissionsGranted);
        Ok(())
    }

    /// `PermissionsGranted -> Complete`
    pub fn complete(mut self) -> Result<Topology, AssemblyError> {
        self.enter("completion", AssemblyState::PermissionsGranted)?;

        let Some(notification) = self.notification.take() else {
            return Err(self.fail(TopologyError::missing_dependency(
                "completion",
                "a resolved notification target",
            )));
        };

        self.advance(AssemblyState::Complete);
        Ok(Topology::new(
            self.stage,
            stack_name(&self.config.stack_prefix, self.stage),
            notification,
            self.registry.into_resources(),
            self.grants,
        ))
    }

    fn wire(&self) -> Result<(NotificationTarget, Vec<PermissionGrant>), TopologyError> {
        let notification =
            resolve_notification_target(&self.lookup, &self.config.notification.parameter_name)?;

        let binder = PermissionBinder::new(&self.registry);
        let mut grants = Vec::with_capacity(INTERNAL_GRANTS.len() + FunctionRole::ALL.len());

        for (grantor, role, access) in INTERNAL_GRANTS {
            let grantee = self.function(role)?;
            let grantor = self.registry.require(grantee.logical_name(), grantor)?;
            grants.push(binder.grant(grantor, grantee, access)?);
        }

        for role in FunctionRole::ALL {
            let grantee = self.function(role)?;
            grants.push(binder.grant_external_publish(grantee, &notification)?);
        }

        Ok((notification, grants))
    }

    fn function(&self, role: FunctionRole) -> Result<&ResourceDescriptor, TopologyError> {
        self.registry.require("permission wiring", role.logical_name())
    }

    fn enter(&self, step: &str, required: AssemblyState) -> Result<(), AssemblyError> {
        if self.failed {
            return Err(AssemblyError::new(
                self.state,
                TopologyError::missing_dependency(step, "a run that has not failed"),
            ));
        }
        if self.state != required {
            return Err(AssemblyError::new(
                self.state,
                TopologyError::missing_dependency(step, format!("state {}", required)),
            ));
        }
        Ok(())
    }

    fn advance(&mut self, next: AssemblyState) {
        tracing::debug!(from = %self.state, to = %next, "Assembler transition");
        self.state = next;
    }

    fn fail(&mut self, source: TopologyError) -> AssemblyError {
        tracing::warn!(state = %self.state, error = %source, "Composition aborted");
        self.failed = true;
        AssemblyError::new(self.state, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::StaticParameters;
    use ensemble_core::TargetKind;

    const BUS: &str = "arn:aws:events:us-west-2:123456789012:event-bus/default";

    fn lookup() -> StaticParameters {
        StaticParameters::default().with("/arn/notification/event-bus", BUS)
    }

    fn assembler(stage: Stage) -> TopologyAssembler<StaticParameters> {
        TopologyAssembler::new(EnsembleConfig::default(), lookup()).with_stage(stage)
    }

    #[test]
    fn test_steps_advance_in_order() {
        let mut a = assembler(Stage::Dev);
        assert_eq!(a.state(), AssemblyState::Uninitialized);
        assert_eq!(a.stage(), None);

        assert_eq!(a.resolve_stage().unwrap(), Stage::Dev);
        assert_eq!(a.state(), AssemblyState::StageResolved);

        a.declare_storage().unwrap();
        assert_eq!(a.registry().len(), 2);

        a.declare_compute().unwrap();
        assert_eq!(a.registry().len(), 4);

        a.bind_gateway().unwrap();
        assert_eq!(a.registry().len(), 5);
        assert!(a.grants().is_empty());

        a.grant_permissions().unwrap();
        assert_eq!(a.state(), AssemblyState::PermissionsGranted);
        assert_eq!(a.grants().len(), 6);

        let topology = a.complete().unwrap();
        assert_eq!(topology.stack_name(), "ExogenesisEnsemblePart3Redemption-dev");
        assert_eq!(topology.notification().locator(), BUS);
    }

    #[test]
    fn test_out_of_order_step_is_missing_dependency() {
        let mut a = assembler(Stage::Dev);
        a.resolve_stage().unwrap();

        let err = a.declare_compute().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);
        assert_eq!(err.state, AssemblyState::StageResolved);
        // out-of-order calls do not poison the run
        a.declare_storage().unwrap();
        a.declare_compute().unwrap();
    }

    #[test]
    fn test_steps_are_not_revisited() {
        let mut a = assembler(Stage::Prod);
        a.resolve_stage().unwrap();
        a.declare_storage().unwrap();

        let err = a.resolve_stage().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);
        assert_eq!(a.stage(), Some(Stage::Prod));
    }

    #[test]
    fn test_lookup_failure_aborts_before_grants() {
        let mut a = TopologyAssembler::new(EnsembleConfig::default(), StaticParameters::default())
            .with_stage(Stage::Dev);
        a.resolve_stage().unwrap();
        a.declare_storage().unwrap();
        a.declare_compute().unwrap();
        a.bind_gateway().unwrap();

        let err = a.grant_permissions().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalLookupFailure);
        assert_eq!(err.state, AssemblyState::GatewayBound);
        assert!(a.grants().is_empty());

        // a failed run cannot be resumed
        let err = a.grant_permissions().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);
        let err = a.complete().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);
    }

    #[test]
    fn test_error_message_carries_state() {
        let err = TopologyAssembler::new(EnsembleConfig::default(), StaticParameters::default())
            .with_stage(Stage::Dev)
            .assemble()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("composition aborted in state GatewayBound"));
        assert!(message.contains("/arn/notification/event-bus"));
    }

    #[test]
    fn test_grants_in_wiring_order() {
        let topology = assembler(Stage::Dev).assemble().unwrap();
        let wiring: Vec<(TargetKind, &str, AccessLevel)> = topology
            .grants()
            .iter()
            .map(|g| (g.target_kind(), g.grantee(), g.access()))
            .collect();

        assert_eq!(
            wiring,
            vec![
                (TargetKind::ObjectStore, "WebAPIFunction", AccessLevel::ReadWrite),
                (TargetKind::ObjectStore, "S3HookFunction", AccessLevel::Read),
                (TargetKind::Table, "WebAPIFunction", AccessLevel::Read),
                (TargetKind::Table, "S3HookFunction", AccessLevel::ReadWrite),
                (TargetKind::NotificationBus, "WebAPIFunction", AccessLevel::Publish),
                (TargetKind::NotificationBus, "S3HookFunction", AccessLevel::Publish),
            ]
        );
    }

    #[test]
    fn test_custom_prefix() {
        let config = EnsembleConfig {
            app_prefix: "demo".to_string(),
            ..Default::default()
        };
        let topology = TopologyAssembler::new(config, lookup())
            .with_stage(Stage::Prod)
            .assemble()
            .unwrap();
        assert_eq!(
            topology.resource(BUCKET_LOGICAL_NAME).unwrap().physical_name(),
            "demo-bucket-prod"
        );
        assert_eq!(
            topology.resource(GATEWAY_LOGICAL_NAME).unwrap().physical_name(),
            "demo-api-gateway-prod"
        );
    }
}
