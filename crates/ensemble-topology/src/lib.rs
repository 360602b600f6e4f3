//! # ensemble-topology
//!
//! Deployment topology builder for Exogenesis Ensemble.
//!
//! [`TopologyAssembler`] is the entry point: it resolves the stage, declares
//! storage, compute and the HTTP gateway, wires least-privilege grants and
//! returns a complete [`Topology`]. A failure at any step aborts the run with
//! an [`AssemblyError`]; no partial topology is ever produced.
//!
//! ```no_run
//! use ensemble_core::EnsembleConfig;
//! use ensemble_topology::{EnvParameters, Manifest, StdoutSink, TopologyAssembler, TopologySink};
//!
//! # fn main() -> anyhow::Result<()> {
//! let topology = TopologyAssembler::new(EnsembleConfig::default(), EnvParameters).assemble()?;
//! StdoutSink::default().publish(&Manifest::new(topology))?;
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod handoff;
pub mod lookup;
pub mod permissions;
pub mod provision;
pub mod registry;
pub mod resolver;
pub mod topology;

pub use assembler::{AssemblyError, AssemblyState, TopologyAssembler};
pub use handoff::{
    FileSink, HandoffError, MANIFEST_SCHEMA_VERSION, Manifest, ManifestFormat, StdoutSink,
    TopologySink,
};
pub use lookup::{
    ENV_PARAMETER_PREFIX, EnvParameters, LookupChain, ParameterLookup, StaticParameters,
    resolve_notification_target,
};
pub use permissions::PermissionBinder;
pub use provision::{
    BUCKET_LOGICAL_NAME, ComputeBindings, ComputeProvisioner, GATEWAY_LOGICAL_NAME, GatewayBinder,
    ObjectStoreProvisioner, STANDARD_BUCKET_NAME_VAR, TABLE_LOGICAL_NAME, TABLE_NAME_VAR,
    TableProvisioner,
};
pub use registry::ResourceRegistry;
pub use resolver::StageResolver;
pub use topology::{Topology, stack_name};
