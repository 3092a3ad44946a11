use async_trait::async_trait;

use crate::cluster::GlobalClusterDescription;
use crate::error::CoreResult;
use crate::routing::RoutingControlState;

/// Database control plane that owns global cluster topology.
#[async_trait]
pub trait GlobalClusterControlPlane: Send + Sync {
    /// Describes the global clusters matching `global_cluster_id`.
    ///
    /// A well-formed answer contains exactly one cluster; callers decide how
    /// to treat any other count.
    async fn describe_global_cluster(
        &self,
        global_cluster_id: &str,
    ) -> CoreResult<Vec<GlobalClusterDescription>>;

    /// Submits a failover promoting `target_cluster_id` to writer.
    ///
    /// Returns once the request is accepted; the failover itself completes
    /// asynchronously in the control plane.
    async fn failover_global_cluster(
        &self,
        global_cluster_id: &str,
        target_cluster_id: &str,
    ) -> CoreResult<()>;
}

/// One regional endpoint of the routing-control service.
///
/// Each endpoint can read every region's control.
#[async_trait]
pub trait RoutingControlReader: Send + Sync {
    /// Reads the current state of a routing control.
    async fn get_routing_control_state(
        &self,
        routing_control_id: &str,
    ) -> CoreResult<RoutingControlState>;
}
