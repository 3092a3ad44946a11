use std::sync::Arc;

use regionguard_core::{
    ClusterState, ClusterStatus, CoreResult, DecisionOutcome, FailoverParams,
    GlobalClusterControlPlane, Region, RoutingControlReader,
};
use tracing::{info, warn};

use crate::cluster_oracle::ClusterStatusOracle;
use crate::decision::{decide, Decision};
use crate::executor::FailoverExecutor;
use crate::routing_oracle::RoutingControlOracle;

/// External clients shared by every invocation.
///
/// Built once at startup and only ever read afterwards.
#[derive(Clone)]
pub struct FailoverClients {
    /// Database control plane.
    pub control_plane: Arc<dyn GlobalClusterControlPlane>,
    /// Routing-control endpoints in the order they are tried.
    pub routing_endpoints: Vec<(Region, Arc<dyn RoutingControlReader>)>,
}

/// Evaluates the cluster against its routing controls and fails over when
/// they disagree.
///
/// Holds no state between evaluations; every call re-reads both sources.
pub struct FailoverEngine {
    params: FailoverParams,
    cluster_oracle: ClusterStatusOracle,
    routing_oracle: RoutingControlOracle,
    executor: FailoverExecutor,
}

impl FailoverEngine {
    pub fn new(params: FailoverParams, clients: FailoverClients) -> Self {
        let cluster_oracle = ClusterStatusOracle::new(
            Arc::clone(&clients.control_plane),
            params.global_cluster_id.clone(),
        );
        let routing_oracle =
            RoutingControlOracle::new(clients.routing_endpoints, params.routing_controls.clone());
        let executor = FailoverExecutor::new(clients.control_plane);

        Self {
            params,
            cluster_oracle,
            routing_oracle,
            executor,
        }
    }

    pub fn params(&self) -> &FailoverParams {
        &self.params
    }

    /// Runs one evaluation.
    ///
    /// Cluster status is read first so that a cluster already failing over,
    /// or unreadable, ends the evaluation without touching routing controls.
    pub async fn evaluate(&self) -> CoreResult<DecisionOutcome> {
        let status = self.cluster_oracle.query_global_cluster_status().await;
        if let Some(outcome) = early_outcome(&status) {
            return Ok(outcome);
        }

        let routing = self.routing_oracle.query_routing_control_states().await;
        let regions_on: Vec<&str> =
            routing.regions_on().into_iter().map(Region::as_str).collect();
        info!(
            target_region = ?regions_on,
            error = routing.has_error(),
            "Routing control target"
        );

        match decide(&status, &routing, &self.params.cluster_ids)? {
            Decision::Settled(outcome) => {
                log_settled(outcome);
                Ok(outcome)
            }
            Decision::Failover {
                region,
                target_cluster_id,
            } => {
                info!(region = %region, "Target region does not hold the writer");
                let outcome = match self
                    .executor
                    .request_failover(&self.params.global_cluster_id, &target_cluster_id)
                    .await
                {
                    Ok(()) => DecisionOutcome::RequestedFailover,
                    Err(_) => DecisionOutcome::ErrorRequestingFailover,
                };
                Ok(outcome)
            }
        }
    }
}

fn early_outcome(status: &ClusterStatus) -> Option<DecisionOutcome> {
    let outcome = match status.state {
        ClusterState::FailingOver => DecisionOutcome::DatabaseAlreadyFailingOver,
        ClusterState::Error => DecisionOutcome::DatabaseStatusError,
        ClusterState::Available | ClusterState::Other(_) => return None,
    };
    log_settled(outcome);
    Some(outcome)
}

fn log_settled(outcome: DecisionOutcome) {
    match outcome {
        DecisionOutcome::DatabaseAlreadyFailingOver => {
            info!("Database cluster already failing over, taking no action")
        }
        DecisionOutcome::DatabaseStatusError => {
            warn!("Database cluster status error, taking no action")
        }
        DecisionOutcome::TargetDatabaseUnclear => {
            warn!("Target database cluster unclear, taking no action")
        }
        DecisionOutcome::NoActionRequired => {
            info!("Database is active in target region, taking no action")
        }
        other => info!(outcome = %other, "Evaluation settled"),
    }
}
