//! Route 53 ARC cluster endpoint reads.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_route53recoverycluster::error::DisplayErrorContext;
use aws_sdk_route53recoverycluster::types::RoutingControlState as ArcState;
use aws_sdk_route53recoverycluster::{config, Client};
use regionguard_core::{CoreError, CoreResult, Region, RoutingControlReader, RoutingControlState};

/// Client bound to one regional routing-control cluster endpoint.
pub struct RoutingControlEndpoint {
    region: Region,
    client: Client,
}

impl RoutingControlEndpoint {
    /// Creates a client for the endpoint URL in `region`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidParameter` for an empty URL.
    pub async fn new(region: Region, endpoint_url: &str) -> CoreResult<Self> {
        if endpoint_url.trim().is_empty() {
            return Err(CoreError::invalid_parameter(
                "ClusterEndpoints",
                format!("empty endpoint for region {region}"),
            ));
        }

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.as_str().to_string()))
            .load()
            .await;
        let arc_config = config::Builder::from(&shared)
            .endpoint_url(endpoint_url)
            .build();

        Ok(Self {
            region,
            client: Client::from_conf(arc_config),
        })
    }
}

fn map_state(state: &ArcState) -> Option<RoutingControlState> {
    state.as_str().parse().ok()
}

#[async_trait]
impl RoutingControlReader for RoutingControlEndpoint {
    async fn get_routing_control_state(
        &self,
        routing_control_id: &str,
    ) -> CoreResult<RoutingControlState> {
        let output = self
            .client
            .get_routing_control_state()
            .routing_control_arn(routing_control_id)
            .send()
            .await
            .map_err(|err| {
                CoreError::routing_control(
                    self.region.as_str(),
                    DisplayErrorContext(&err).to_string(),
                )
            })?;

        let state = output.routing_control_state();
        map_state(state).ok_or_else(|| {
            CoreError::routing_control(
                self.region.as_str(),
                format!("unrecognized routing control state {}", state.as_str()),
            )
        })
    }
}
