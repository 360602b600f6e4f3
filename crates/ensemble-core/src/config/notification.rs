//! Notification bus configuration.

use serde::{Deserialize, Serialize};

/// Where the external notification bus locator is looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Name of the shared parameter holding the bus locator.
    #[serde(default = "default_parameter_name")]
    pub parameter_name: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            parameter_name: default_parameter_name(),
        }
    }
}

fn default_parameter_name() -> String {
    "/arn/notification/event-bus".to_string()
}
