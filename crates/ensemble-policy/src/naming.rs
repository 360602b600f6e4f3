//! Provider naming rules.
//!
//! Physical names are derived from the application prefix, so a prefix that
//! breaks a provider rule breaks every stage at once. [`check_prefix`]
//! derives every physical name for every stage and reports each violation.

use ensemble_core::{FunctionRole, Stage, physical_name, segments};

use crate::error::NamingViolation;

/// A naming rule for one resource family.
struct NamingRule {
    resource: &'static str,
    pattern: &'static str,
    description: &'static str,
}

const PREFIX_RULE: NamingRule = NamingRule {
    resource: "app prefix",
    pattern: r"^[a-z0-9][a-z0-9-]*[a-z0-9]$",
    description: "lowercase letters, digits and inner hyphens",
};

const BUCKET_RULE: NamingRule = NamingRule {
    resource: "bucket",
    pattern: r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$",
    description: "3-63 lowercase letters, digits, dots or hyphens",
};

const TABLE_RULE: NamingRule = NamingRule {
    resource: "table",
    pattern: r"^[a-zA-Z0-9_.-]{3,255}$",
    description: "3-255 letters, digits, underscores, dots or hyphens",
};

const FUNCTION_RULE: NamingRule = NamingRule {
    resource: "function",
    pattern: r"^[a-zA-Z0-9_-]{1,64}$",
    description: "1-64 letters, digits, underscores or hyphens",
};

impl NamingRule {
    /// Check a name, returning a violation if it does not match.
    fn check(&self, name: &str) -> Option<NamingViolation> {
        match regex::Regex::new(self.pattern) {
            Ok(re) => {
                if re.is_match(name) {
                    None
                } else {
                    Some(NamingViolation::new(self.resource, name, self.description))
                }
            }
            Err(_) => {
                tracing::warn!(
                    "Invalid naming pattern for {}: {}",
                    self.resource,
                    self.pattern
                );
                None
            }
        }
    }
}

/// Check an application prefix and every name derived from it.
///
/// Returns an empty list when all names are valid.
pub fn check_prefix(prefix: &str) -> Vec<NamingViolation> {
    let mut violations = Vec::new();

    if let Some(v) = PREFIX_RULE.check(prefix) {
        violations.push(v);
    }

    for stage in Stage::ALL {
        let bucket = physical_name(prefix, segments::BUCKET, stage);
        violations.extend(BUCKET_RULE.check(&bucket));

        let table = physical_name(prefix, segments::TABLE, stage);
        violations.extend(TABLE_RULE.check(&table));

        for role in FunctionRole::ALL {
            let function = physical_name(prefix, &role.name_segment(), stage);
            violations.extend(FUNCTION_RULE.check(&function));
        }
    }

    violations
}
