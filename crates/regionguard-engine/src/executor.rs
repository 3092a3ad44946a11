use std::sync::Arc;

use regionguard_core::{CoreResult, GlobalClusterControlPlane};
use tracing::{error, info};

/// Submits global cluster failovers.
///
/// One request per call: no polling for completion, no retry.
pub struct FailoverExecutor {
    control_plane: Arc<dyn GlobalClusterControlPlane>,
}

impl FailoverExecutor {
    pub fn new(control_plane: Arc<dyn GlobalClusterControlPlane>) -> Self {
        Self { control_plane }
    }

    /// Requests promotion of `target_cluster_id` within `global_cluster_id`.
    pub async fn request_failover(
        &self,
        global_cluster_id: &str,
        target_cluster_id: &str,
    ) -> CoreResult<()> {
        info!(
            global_cluster_id,
            target_cluster_id, "Database is not active in target region, initiating failover"
        );

        match self
            .control_plane
            .failover_global_cluster(global_cluster_id, target_cluster_id)
            .await
        {
            Ok(()) => {
                info!(global_cluster_id, target_cluster_id, "Failover request accepted");
                Ok(())
            }
            Err(err) => {
                error!(
                    global_cluster_id,
                    target_cluster_id,
                    error = %err,
                    "Failover request failed"
                );
                Err(err)
            }
        }
    }
}
