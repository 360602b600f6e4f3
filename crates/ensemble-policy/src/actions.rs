//! Expansion of access levels into provider actions and resource locators.

use ensemble_core::{AccessLevel, TargetKind};

const OBJECT_STORE_READ: &[&str] = &["s3:GetObject*", "s3:GetBucket*", "s3:List*"];

const OBJECT_STORE_WRITE: &[&str] = &[
    "s3:DeleteObject*",
    "s3:PutObject",
    "s3:PutObjectLegalHold",
    "s3:PutObjectRetention",
    "s3:PutObjectTagging",
    "s3:PutObjectVersionTagging",
    "s3:Abort*",
];

const TABLE_READ: &[&str] = &[
    "dynamodb:BatchGetItem",
    "dynamodb:GetRecords",
    "dynamodb:GetShardIterator",
    "dynamodb:Query",
    "dynamodb:GetItem",
    "dynamodb:Scan",
    "dynamodb:ConditionCheckItem",
    "dynamodb:DescribeTable",
];

const TABLE_WRITE: &[&str] = &[
    "dynamodb:BatchWriteItem",
    "dynamodb:PutItem",
    "dynamodb:UpdateItem",
    "dynamodb:DeleteItem",
    "dynamodb:DescribeTable",
];

const BUS_PUBLISH: &[&str] = &["events:PutEvents"];

/// Provider actions for an access level on a target kind.
///
/// Combinations with no meaning (publishing to a bucket, reading a bus)
/// expand to nothing. Duplicates are dropped, first occurrence wins.
pub fn provider_actions(target: TargetKind, access: AccessLevel) -> Vec<String> {
    let groups: &[&[&str]] = match (target, access) {
        (TargetKind::ObjectStore, AccessLevel::Read) => &[OBJECT_STORE_READ],
        (TargetKind::ObjectStore, AccessLevel::Write) => &[OBJECT_STORE_WRITE],
        (TargetKind::ObjectStore, AccessLevel::ReadWrite) => {
            &[OBJECT_STORE_READ, OBJECT_STORE_WRITE]
        }
        (TargetKind::Table, AccessLevel::Read) => &[TABLE_READ],
        (TargetKind::Table, AccessLevel::Write) => &[TABLE_WRITE],
        (TargetKind::Table, AccessLevel::ReadWrite) => &[TABLE_READ, TABLE_WRITE],
        (TargetKind::NotificationBus, AccessLevel::Publish) => &[BUS_PUBLISH],
        _ => &[],
    };

    let mut actions: Vec<String> = Vec::new();
    for action in groups.iter().flat_map(|g| g.iter()) {
        if !actions.iter().any(|a| a == action) {
            actions.push((*action).to_string());
        }
    }
    actions
}

/// Provider locators an object-store grant applies to: the bucket and its objects.
pub fn object_store_locators(bucket_name: &str) -> Vec<String> {
    vec![
        format!("arn:aws:s3:::{}", bucket_name),
        format!("arn:aws:s3:::{}/*", bucket_name),
    ]
}

/// Provider locators a table grant applies to.
///
/// Region and account are left to the platform.
pub fn table_locators(table_name: &str) -> Vec<String> {
    vec![format!("arn:aws:dynamodb:*:*:table/{}", table_name)]
}
