//! Least-privilege table.
//!
//! The table fixes which function role may access which target kind, and how:
//! - the API handler is the read/write front door for objects and only reads
//!   derived state in the table;
//! - the event hook reads raw objects and owns writes to derived state;
//! - both may publish to the external notification bus.
//!
//! A request is allowed only if its exact `(role, target, access)` triple is
//! in the table. Requests are never widened or narrowed to fit.

use ensemble_core::{AccessLevel, FunctionRole, TargetKind, TopologyError};
use serde::Serialize;

/// One allowed access pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PrivilegeEntry {
    pub role: FunctionRole,
    pub target: TargetKind,
    pub access: AccessLevel,
}

impl PrivilegeEntry {
    const fn new(role: FunctionRole, target: TargetKind, access: AccessLevel) -> Self {
        Self {
            role,
            target,
            access,
        }
    }
}

/// The grants this topology requires, in the order they are wired.
static ENTRIES: [PrivilegeEntry; 6] = [
    PrivilegeEntry::new(
        FunctionRole::ApiHandler,
        TargetKind::ObjectStore,
        AccessLevel::ReadWrite,
    ),
    PrivilegeEntry::new(
        FunctionRole::EventHook,
        TargetKind::ObjectStore,
        AccessLevel::Read,
    ),
    PrivilegeEntry::new(FunctionRole::ApiHandler, TargetKind::Table, AccessLevel::Read),
    PrivilegeEntry::new(
        FunctionRole::EventHook,
        TargetKind::Table,
        AccessLevel::ReadWrite,
    ),
    PrivilegeEntry::new(
        FunctionRole::ApiHandler,
        TargetKind::NotificationBus,
        AccessLevel::Publish,
    ),
    PrivilegeEntry::new(
        FunctionRole::EventHook,
        TargetKind::NotificationBus,
        AccessLevel::Publish,
    ),
];

/// Validates grant requests against the fixed access table.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastPrivilegeTable;

impl LeastPrivilegeTable {
    pub fn new() -> Self {
        Self
    }

    /// All allowed entries, in wiring order.
    pub fn entries(&self) -> &'static [PrivilegeEntry] {
        &ENTRIES
    }

    /// Entries that grant access to resources declared in the topology.
    pub fn internal_entries(&self) -> impl Iterator<Item = &'static PrivilegeEntry> {
        ENTRIES
            .iter()
            .filter(|e| e.target != TargetKind::NotificationBus)
    }

    /// Entries that grant access to external targets.
    pub fn external_entries(&self) -> impl Iterator<Item = &'static PrivilegeEntry> {
        ENTRIES
            .iter()
            .filter(|e| e.target == TargetKind::NotificationBus)
    }

    /// Whether the exact triple is allowed.
    pub fn permits(&self, role: FunctionRole, target: TargetKind, access: AccessLevel) -> bool {
        ENTRIES
            .iter()
            .any(|e| e.role == role && e.target == target && e.access == access)
    }

    /// The single access level a role holds on a target, if any.
    pub fn allowed_access(&self, role: FunctionRole, target: TargetKind) -> Option<AccessLevel> {
        ENTRIES
            .iter()
            .find(|e| e.role == role && e.target == target)
            .map(|e| e.access)
    }

    /// Reject a request that is not in the table.
    pub fn check(
        &self,
        role: FunctionRole,
        target: TargetKind,
        access: AccessLevel,
    ) -> Result<(), TopologyError> {
        if self.permits(role, target, access) {
            return Ok(());
        }

        let message = match self.allowed_access(role, target) {
            Some(allowed) => format!(
                "{} may only be granted {} access to the {}, requested {}",
                role, allowed, target, access
            ),
            None => format!("{} may not be granted any access to the {}", role, target),
        };
        tracing::warn!(%role, %target, %access, "Rejected grant outside least-privilege table");
        Err(TopologyError::policy_violation(message))
    }
}
