//! In-memory control plane and routing-control endpoints for testing.
//!
//! Both mocks answer from fixed, replaceable responses and record every call
//! so tests can assert exactly which external requests an evaluation made.
//!
//! # Examples
//!
//! ```rust
//! use regionguard_core::{GlobalClusterControlPlane, GlobalClusterDescription};
//! use regionguard_engine::mock::MockControlPlane;
//!
//! # async fn example() -> regionguard_core::CoreResult<()> {
//! let control_plane = MockControlPlane::with_clusters(vec![GlobalClusterDescription {
//!     status: "available".to_string(),
//!     members: vec![],
//! }])
//! .failing_failover("InvalidGlobalClusterStateFault");
//!
//! assert_eq!(control_plane.describe_global_cluster("global").await?.len(), 1);
//! assert!(control_plane.failover_global_cluster("global", "arn").await.is_err());
//! assert_eq!(control_plane.failover_calls().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use regionguard_core::{
    CoreError, CoreResult, GlobalClusterControlPlane, GlobalClusterDescription,
    RoutingControlReader, RoutingControlState,
};

/// One recorded call against a mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallHistoryEntry {
    /// Operation name: "describe", "failover" or "get_state".
    pub operation: &'static str,
    /// Arguments in call order.
    pub args: Vec<String>,
    /// Whether the call succeeded.
    pub success: bool,
}

/// Mock database control plane.
pub struct MockControlPlane {
    describe_response: RwLock<Result<Vec<GlobalClusterDescription>, String>>,
    failover_failure: RwLock<Option<String>>,
    call_history: RwLock<Vec<CallHistoryEntry>>,
}

impl MockControlPlane {
    /// Control plane that describes the given clusters and accepts failovers.
    pub fn with_clusters(clusters: Vec<GlobalClusterDescription>) -> Self {
        Self {
            describe_response: RwLock::new(Ok(clusters)),
            failover_failure: RwLock::new(None),
            call_history: RwLock::new(Vec::new()),
        }
    }

    /// Control plane whose describe call always fails.
    pub fn describe_failing(error: impl Into<String>) -> Self {
        let mock = Self::with_clusters(Vec::new());
        *mock.describe_response.write() = Err(error.into());
        mock
    }

    /// Makes every failover request fail with `error`.
    #[must_use]
    pub fn failing_failover(self, error: impl Into<String>) -> Self {
        *self.failover_failure.write() = Some(error.into());
        self
    }

    /// Replaces the clusters returned by subsequent describe calls.
    pub fn set_clusters(&self, clusters: Vec<GlobalClusterDescription>) {
        *self.describe_response.write() = Ok(clusters);
    }

    /// Full call history in order.
    pub fn call_history(&self) -> Vec<CallHistoryEntry> {
        self.call_history.read().clone()
    }

    /// Global cluster ids passed to describe, in order.
    pub fn describe_calls(&self) -> Vec<String> {
        self.calls_of("describe")
            .map(|entry| entry.args[0].clone())
            .collect()
    }

    /// `(global_cluster_id, target_cluster_id)` pairs passed to failover.
    pub fn failover_calls(&self) -> Vec<(String, String)> {
        self.calls_of("failover")
            .map(|entry| (entry.args[0].clone(), entry.args[1].clone()))
            .collect()
    }

    fn calls_of(&self, operation: &'static str) -> impl Iterator<Item = CallHistoryEntry> {
        self.call_history()
            .into_iter()
            .filter(move |entry| entry.operation == operation)
    }

    fn record(&self, operation: &'static str, args: &[&str], success: bool) {
        self.call_history.write().push(CallHistoryEntry {
            operation,
            args: args.iter().map(|arg| arg.to_string()).collect(),
            success,
        });
    }
}

#[async_trait]
impl GlobalClusterControlPlane for MockControlPlane {
    async fn describe_global_cluster(
        &self,
        global_cluster_id: &str,
    ) -> CoreResult<Vec<GlobalClusterDescription>> {
        let response = self.describe_response.read().clone();
        self.record("describe", &[global_cluster_id], response.is_ok());
        response.map_err(CoreError::ControlPlane)
    }

    async fn failover_global_cluster(
        &self,
        global_cluster_id: &str,
        target_cluster_id: &str,
    ) -> CoreResult<()> {
        let failure = self.failover_failure.read().clone();
        self.record(
            "failover",
            &[global_cluster_id, target_cluster_id],
            failure.is_none(),
        );
        match failure {
            Some(message) => Err(CoreError::ControlPlane(message)),
            None => Ok(()),
        }
    }
}

/// Mock regional routing-control endpoint.
///
/// Controls that were never configured fail to read, like an endpoint that
/// does not know the identifier.
#[derive(Default)]
pub struct MockRoutingEndpoint {
    responses: RwLock<HashMap<String, Result<RoutingControlState, String>>>,
    call_history: RwLock<Vec<CallHistoryEntry>>,
}

impl MockRoutingEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers reads of `routing_control_id` with `state`.
    #[must_use]
    pub fn with_state(self, routing_control_id: &str, state: RoutingControlState) -> Self {
        self.set_state(routing_control_id, state);
        self
    }

    /// Fails reads of `routing_control_id` with `error`.
    #[must_use]
    pub fn with_failure(self, routing_control_id: &str, error: impl Into<String>) -> Self {
        self.responses
            .write()
            .insert(routing_control_id.to_string(), Err(error.into()));
        self
    }

    /// Changes the state subsequent reads will return.
    pub fn set_state(&self, routing_control_id: &str, state: RoutingControlState) {
        self.responses
            .write()
            .insert(routing_control_id.to_string(), Ok(state));
    }

    /// Number of reads served, successful or not.
    pub fn call_count(&self) -> usize {
        self.call_history.read().len()
    }

    /// Full call history in order.
    pub fn call_history(&self) -> Vec<CallHistoryEntry> {
        self.call_history.read().clone()
    }
}

#[async_trait]
impl RoutingControlReader for MockRoutingEndpoint {
    async fn get_routing_control_state(
        &self,
        routing_control_id: &str,
    ) -> CoreResult<RoutingControlState> {
        let response = self
            .responses
            .read()
            .get(routing_control_id)
            .cloned()
            .unwrap_or_else(|| Err(format!("unknown routing control {routing_control_id}")));

        self.call_history.write().push(CallHistoryEntry {
            operation: "get_state",
            args: vec![routing_control_id.to_string()],
            success: response.is_ok(),
        });

        response.map_err(|message| CoreError::routing_control("mock", message))
    }
}
