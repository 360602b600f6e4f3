//! Stage-conditioned policy for stateful resources.

use ensemble_core::{RetentionPolicy, Stage};
use serde::{Deserialize, Serialize};

/// Retention and cleanup behavior of stateful resources.
///
/// Production state must survive an accidental teardown; development state
/// must not pile up as orphaned storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePolicy {
    pub retention: RetentionPolicy,
    /// Empty the resource on teardown so it can be destroyed.
    pub auto_cleanup: bool,
}

impl StoragePolicy {
    /// The policy for a stage. Total over [`Stage`].
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Prod => Self {
                retention: RetentionPolicy::Retain,
                auto_cleanup: false,
            },
            Stage::Dev => Self {
                retention: RetentionPolicy::DestroyOnTeardown,
                auto_cleanup: true,
            },
        }
    }
}
