//! HTTP gateway binding.

use ensemble_core::{
    FunctionRole, GatewayRoute, ResourceDescriptor, ResourceProperties, RetentionPolicy, Stage, TopologyError,
    identifiers, physical_name, segments,
};

/// Logical name of the gateway in front of the API handler.
pub const GATEWAY_LOGICAL_NAME: &str = "WebAPIFunctionGateway";

/// Exposes the API handler behind an HTTP entry point.
///
/// Every path and method is forwarded to the handler; dispatch happens
/// inside the function.
#[derive(Debug, Clone)]
pub struct GatewayBinder {
    prefix: String,
}

impl GatewayBinder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Declare a gateway forwarding to `handler`.
    ///
    /// Only the API handler may be exposed. Any other descriptor, or a
    /// handler without an invoke target, fails with `MissingDependency`.
    pub fn expose_http(
        &self,
        stage: Stage,
        handler: &ResourceDescriptor,
    ) -> Result<ResourceDescriptor, TopologyError> {
        if handler.function_role() != Some(FunctionRole::ApiHandler) {
            tracing::warn!(
                target = %handler.logical_name(),
                "Refusing to expose a resource other than the API handler"
            );
            return Err(TopologyError::missing_dependency(
                GATEWAY_LOGICAL_NAME,
                format!(
                    "the API handler '{}', got '{}'",
                    FunctionRole::ApiHandler.logical_name(),
                    handler.logical_name()
                ),
            ));
        }

        let invoke_target = handler
            .identifier(identifiers::INVOKE_TARGET)
            .ok_or_else(|| {
                TopologyError::missing_identifier(
                    GATEWAY_LOGICAL_NAME,
                    handler.logical_name(),
                    identifiers::INVOKE_TARGET,
                )
            })?;

        let name = physical_name(&self.prefix, segments::GATEWAY, stage);

        tracing::debug!(
            logical = GATEWAY_LOGICAL_NAME,
            physical = %name,
            target = %handler.logical_name(),
            "Bound HTTP gateway"
        );

        Ok(ResourceDescriptor::new(
            GATEWAY_LOGICAL_NAME,
            name.clone(),
            RetentionPolicy::DestroyOnTeardown,
            ResourceProperties::Gateway {
                target: handler.logical_name().to_string(),
                invoke_target: invoke_target.to_string(),
                route: GatewayRoute::ProxyAll,
            },
        )
        .with_identifier(identifiers::REST_API_NAME, name))
    }
}
