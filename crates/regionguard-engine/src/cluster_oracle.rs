use std::sync::Arc;

use regionguard_core::{ClusterState, ClusterStatus, GlobalClusterControlPlane};
use tracing::{debug, error};

/// Reads global cluster topology from the database control plane.
pub struct ClusterStatusOracle {
    control_plane: Arc<dyn GlobalClusterControlPlane>,
    global_cluster_id: String,
}

impl ClusterStatusOracle {
    pub fn new(
        control_plane: Arc<dyn GlobalClusterControlPlane>,
        global_cluster_id: impl Into<String>,
    ) -> Self {
        Self {
            control_plane,
            global_cluster_id: global_cluster_id.into(),
        }
    }

    /// Queries the cluster state and member writer flags.
    ///
    /// Never fails: transport errors and any cluster count other than one
    /// yield a status whose state is [`ClusterState::Error`].
    pub async fn query_global_cluster_status(&self) -> ClusterStatus {
        let clusters = match self
            .control_plane
            .describe_global_cluster(&self.global_cluster_id)
            .await
        {
            Ok(clusters) => clusters,
            Err(err) => {
                error!(
                    global_cluster_id = %self.global_cluster_id,
                    error = %err,
                    "Error querying global cluster status"
                );
                return ClusterStatus::error();
            }
        };

        let [cluster] = clusters.as_slice() else {
            error!(
                global_cluster_id = %self.global_cluster_id,
                count = clusters.len(),
                "Unexpected global cluster count"
            );
            return ClusterStatus::error();
        };

        let status = cluster.members.iter().fold(
            ClusterStatus::new(ClusterState::from_status(&cluster.status)),
            |status, member| status.with_member(member.cluster_id.clone(), member.is_writer),
        );

        debug!(
            global_cluster_id = %self.global_cluster_id,
            state = %status.state,
            writer = status.writer().unwrap_or("none"),
            members = status.members.len(),
            "Global cluster status"
        );
        status
    }
}
