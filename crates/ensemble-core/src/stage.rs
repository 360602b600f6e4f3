//! Deployment stage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TopologyError;

/// The deployment stage a topology is composed for.
///
/// Every policy decision downstream (retention, cleanup, physical names)
/// is a function of this value and nothing else.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Dev,
    Prod,
}

impl Stage {
    /// All stages, in declaration order.
    pub const ALL: [Stage; 2] = [Stage::Dev, Stage::Prod];

    /// The lowercase name used in physical resource names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Dev => "dev",
            Stage::Prod => "prod",
        }
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Stage::Prod)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing: only `dev` and `prod` are accepted.
impl FromStr for Stage {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Stage::Dev),
            "prod" => Ok(Stage::Prod),
            other => Err(TopologyError::invalid_stage(other)),
        }
    }
}
