//! Aurora global cluster control plane backed by the RDS API.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::types::GlobalCluster;
use aws_sdk_rds::Client;
use regionguard_core::{
    CoreError, CoreResult, GlobalClusterControlPlane, GlobalClusterDescription,
    GlobalClusterMember,
};
use tracing::debug;

/// RDS client scoped to one control-plane region.
pub struct RdsControlPlane {
    client: Client,
}

impl RdsControlPlane {
    /// Creates a client using environment credentials.
    pub async fn new(region: &str) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self::from_client(Client::new(&aws_config))
    }

    /// Wraps an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn describe(cluster: &GlobalCluster) -> GlobalClusterDescription {
    GlobalClusterDescription {
        status: cluster.status().unwrap_or_default().to_string(),
        members: cluster
            .global_cluster_members()
            .iter()
            .filter_map(|member| {
                member.db_cluster_arn().map(|arn| {
                    GlobalClusterMember::new(arn, member.is_writer().unwrap_or(false))
                })
            })
            .collect(),
    }
}

#[async_trait]
impl GlobalClusterControlPlane for RdsControlPlane {
    async fn describe_global_cluster(
        &self,
        global_cluster_id: &str,
    ) -> CoreResult<Vec<GlobalClusterDescription>> {
        let output = self
            .client
            .describe_global_clusters()
            .global_cluster_identifier(global_cluster_id)
            .send()
            .await
            .map_err(|err| CoreError::ControlPlane(DisplayErrorContext(&err).to_string()))?;

        Ok(output.global_clusters().iter().map(describe).collect())
    }

    async fn failover_global_cluster(
        &self,
        global_cluster_id: &str,
        target_cluster_id: &str,
    ) -> CoreResult<()> {
        let output = self
            .client
            .failover_global_cluster()
            .global_cluster_identifier(global_cluster_id)
            .target_db_cluster_identifier(target_cluster_id)
            .send()
            .await
            .map_err(|err| CoreError::ControlPlane(DisplayErrorContext(&err).to_string()))?;

        debug!(
            global_cluster_id,
            status = output
                .global_cluster()
                .and_then(GlobalCluster::status)
                .unwrap_or("unknown"),
            "Failover response"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_rds::types::GlobalClusterMember as RdsMember;

    #[test]
    fn describe_maps_members_and_status() {
        let cluster = GlobalCluster::builder()
            .status("available")
            .global_cluster_members(
                RdsMember::builder()
                    .db_cluster_arn("arn:east")
                    .is_writer(true)
                    .build(),
            )
            .global_cluster_members(
                RdsMember::builder()
                    .db_cluster_arn("arn:west")
                    .is_writer(false)
                    .build(),
            )
            .global_cluster_members(RdsMember::builder().is_writer(false).build())
            .build();

        let description = describe(&cluster);

        assert_eq!(description.status, "available");
        assert_eq!(
            description.members,
            vec![
                GlobalClusterMember::new("arn:east", true),
                GlobalClusterMember::new("arn:west", false),
            ]
        );
    }

    #[test]
    fn describe_tolerates_missing_fields() {
        let description = describe(&GlobalCluster::builder().build());
        assert_eq!(description.status, "");
        assert!(description.members.is_empty());
    }
}
