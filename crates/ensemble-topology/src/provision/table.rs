//! Key-value table declaration.

use ensemble_core::{
    AttributeType, BillingMode, KeyAttribute, ResourceDescriptor, ResourceProperties, Stage,
    identifiers, physical_name, segments,
};
use ensemble_policy::StoragePolicy;

/// Logical name of the collection table.
pub const TABLE_LOGICAL_NAME: &str = "CollectionTable";

pub const PARTITION_KEY: &str = "PK";
pub const SORT_KEY: &str = "SK";

/// Declares the collection table.
///
/// The schema is fixed: string partition key `PK`, numeric sort key `SK`,
/// on-demand billing.
#[derive(Debug, Clone)]
pub struct TableProvisioner {
    prefix: String,
}

impl TableProvisioner {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Declare the table under `policy`.
    ///
    /// `auto_cleanup` has no table-level counterpart; deleting the table
    /// deletes its items.
    pub fn declare(&self, stage: Stage, policy: &StoragePolicy) -> ResourceDescriptor {
        let name = physical_name(&self.prefix, segments::TABLE, stage);

        tracing::debug!(
            logical = TABLE_LOGICAL_NAME,
            physical = %name,
            retention = ?policy.retention,
            "Declared table"
        );

        ResourceDescriptor::new(
            TABLE_LOGICAL_NAME,
            name.clone(),
            policy.retention,
            ResourceProperties::Table {
                partition_key: KeyAttribute::new(PARTITION_KEY, AttributeType::String),
                sort_key: KeyAttribute::new(SORT_KEY, AttributeType::Number),
                billing_mode: BillingMode::PayPerRequest,
            },
        )
        .with_identifier(identifiers::TABLE_NAME, name)
    }
}
