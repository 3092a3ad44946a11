use std::collections::BTreeMap;

use regionguard_core::{
    ClusterState, ClusterStatus, CoreError, CoreResult, DecisionOutcome, Region,
    RoutingControlStates,
};

/// What the engine should do after reading both status sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing to submit; the evaluation ends with this outcome.
    Settled(DecisionOutcome),
    /// Promote `target_cluster_id`, the cluster of `region`, to writer.
    Failover {
        region: Region,
        target_cluster_id: String,
    },
}

/// Reconciles cluster topology with routing controls.
///
/// Precedence is fixed: cluster-level conditions first, then the routing
/// controls, then the writer comparison. `cluster_ids` maps each region to its
/// regional cluster identifier.
///
/// # Errors
///
/// Returns `CoreError::Internal` when the single target region has no entry in
/// `cluster_ids`. Resolved parameters never produce this.
pub fn decide(
    status: &ClusterStatus,
    routing: &RoutingControlStates,
    cluster_ids: &BTreeMap<Region, String>,
) -> CoreResult<Decision> {
    match status.state {
        ClusterState::FailingOver => {
            return Ok(Decision::Settled(
                DecisionOutcome::DatabaseAlreadyFailingOver,
            ))
        }
        ClusterState::Error => {
            return Ok(Decision::Settled(DecisionOutcome::DatabaseStatusError))
        }
        ClusterState::Available | ClusterState::Other(_) => {}
    }

    if routing.has_error() {
        return Ok(Decision::Settled(DecisionOutcome::TargetDatabaseUnclear));
    }

    let region = match routing.regions_on().as_slice() {
        [region] => (*region).clone(),
        _ => return Ok(Decision::Settled(DecisionOutcome::TargetDatabaseUnclear)),
    };

    let target_cluster_id = cluster_ids.get(&region).ok_or_else(|| {
        CoreError::internal(format!("no cluster configured for target region {region}"))
    })?;

    if status.is_writer(target_cluster_id) {
        Ok(Decision::Settled(DecisionOutcome::NoActionRequired))
    } else {
        Ok(Decision::Failover {
            region,
            target_cluster_id: target_cluster_id.clone(),
        })
    }
}
