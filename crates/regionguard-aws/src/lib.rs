//! AWS adapters for RegionGuard.
//!
//! - [`RdsControlPlane`]: Aurora global cluster topology and failover via RDS
//! - [`RoutingControlEndpoint`]: Route 53 Application Recovery Controller
//!   cluster endpoints for routing-control reads

mod rds;
mod routing_control;

pub use rds::RdsControlPlane;
pub use routing_control::RoutingControlEndpoint;

use std::sync::Arc;

use regionguard_core::{CoreResult, FailoverParams, Region, RoutingControlReader};
use regionguard_engine::FailoverClients;
use tracing::info;

/// Region used for the RDS client when none is configured.
pub const DEFAULT_CONTROL_PLANE_REGION: &str = "us-east-1";

/// Builds the process-wide client set.
///
/// One RDS client in `control_plane_region`, plus one routing-control client
/// per configured endpoint, pinned to that endpoint's region and URL.
pub async fn build_clients(
    params: &FailoverParams,
    control_plane_region: &str,
) -> CoreResult<FailoverClients> {
    let control_plane = RdsControlPlane::new(control_plane_region).await;

    let mut routing_endpoints: Vec<(Region, Arc<dyn RoutingControlReader>)> =
        Vec::with_capacity(params.endpoints.len());
    for (region, url) in &params.endpoints {
        let endpoint = RoutingControlEndpoint::new(region.clone(), url).await?;
        routing_endpoints.push((region.clone(), Arc::new(endpoint)));
    }

    info!(
        control_plane_region,
        endpoints = routing_endpoints.len(),
        "AWS clients initialized"
    );

    Ok(FailoverClients {
        control_plane: Arc::new(control_plane),
        routing_endpoints,
    })
}
