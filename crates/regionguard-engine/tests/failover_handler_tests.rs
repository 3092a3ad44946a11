//! End-to-end evaluation tests against mock collaborators.
//!
//! Covers:
//! 1. Missing parameters abort before any external call
//! 2. Cluster-level short circuits (failing over, status error)
//! 3. Unclear targets (zero/two controls on, endpoint errors)
//! 4. Writer comparison and failover submission
//! 5. Endpoint fallthrough and idempotent re-evaluation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use regionguard_core::RoutingControlState::{self, Off, On};
use regionguard_core::{
    DecisionOutcome, GlobalClusterDescription, GlobalClusterMember, InvocationContext,
    ParameterResolver, Region, RoutingControlReader,
};
use regionguard_engine::mock::{MockControlPlane, MockRoutingEndpoint};
use regionguard_engine::{FailoverClients, FailoverHandler};
use serde_json::json;

const EAST_CLUSTER: &str = "arn:aws:rds:us-east-1:123456789012:cluster:orders-east";
const WEST_CLUSTER: &str = "arn:aws:rds:us-west-2:123456789012:cluster:orders-west";

fn environment() -> Vec<(&'static str, String)> {
    vec![
        ("DeploymentRegions", json!(["us-east-1", "us-west-2"]).to_string()),
        ("AuroraGlobalClusterId", json!("orders-global").to_string()),
        (
            "AuroraClusterArns",
            json!({ "us-east-1": EAST_CLUSTER, "us-west-2": WEST_CLUSTER }).to_string(),
        ),
        (
            "RoutingControlArns",
            json!({ "us-east-1": "rc-east", "us-west-2": "rc-west" }).to_string(),
        ),
        (
            "ClusterEndpoints",
            json!({
                "us-east-1": "https://host-east.example",
                "us-west-2": "https://host-west.example"
            })
            .to_string(),
        ),
    ]
}

fn cluster(status: &str, east_writer: bool) -> GlobalClusterDescription {
    GlobalClusterDescription {
        status: status.to_string(),
        members: vec![
            GlobalClusterMember::new(EAST_CLUSTER, east_writer),
            GlobalClusterMember::new(WEST_CLUSTER, !east_writer),
        ],
    }
}

fn routing(east: RoutingControlState, west: RoutingControlState) -> MockRoutingEndpoint {
    MockRoutingEndpoint::new()
        .with_state("rc-east", east)
        .with_state("rc-west", west)
}

struct Fixture {
    control_plane: Arc<MockControlPlane>,
    east: Arc<MockRoutingEndpoint>,
    west: Arc<MockRoutingEndpoint>,
    handler: FailoverHandler,
}

impl Fixture {
    async fn new(
        control_plane: MockControlPlane,
        east: MockRoutingEndpoint,
        west: MockRoutingEndpoint,
    ) -> Self {
        let control_plane = Arc::new(control_plane);
        let east = Arc::new(east);
        let west = Arc::new(west);

        let clients = FailoverClients {
            control_plane: control_plane.clone(),
            routing_endpoints: vec![
                (Region::new("us-east-1"), east.clone() as Arc<dyn RoutingControlReader>),
                (Region::new("us-west-2"), west.clone() as Arc<dyn RoutingControlReader>),
            ],
        };

        let resolved = ParameterResolver::with_source(environment()).resolve();
        let handler =
            FailoverHandler::from_resolution(resolved, move |_| async move { Ok(clients) })
                .await
                .expect("handler builds");

        Self {
            control_plane,
            east,
            west,
            handler,
        }
    }

    async fn invoke(&self) -> DecisionOutcome {
        self.handler
            .handle(&json!({ "source": "test" }), &InvocationContext::new("test"))
            .await
            .expect("evaluation succeeds")
    }

    fn routing_calls(&self) -> usize {
        self.east.call_count() + self.west.call_count()
    }
}

#[tokio::test]
async fn test_missing_parameters_makes_no_external_call() {
    let mut env = environment();
    env.retain(|(name, _)| *name != "RoutingControlArns");
    let resolved = ParameterResolver::with_source(env).resolve();

    let built = Arc::new(AtomicBool::new(false));
    let control_plane = Arc::new(MockControlPlane::with_clusters(vec![cluster(
        "available", false,
    )]));

    let handler = {
        let built = built.clone();
        let control_plane = control_plane.clone();
        FailoverHandler::from_resolution(resolved, move |_| async move {
            built.store(true, Ordering::SeqCst);
            Ok(FailoverClients {
                control_plane,
                routing_endpoints: Vec::new(),
            })
        })
        .await
        .unwrap()
    };

    assert_eq!(handler.missing_parameters(), ["RoutingControlArns".to_string()]);

    let outcome = handler
        .handle(&json!({}), &InvocationContext::new("test"))
        .await
        .unwrap();

    assert_eq!(outcome, DecisionOutcome::ParametersMissing);
    assert!(!built.load(Ordering::SeqCst), "clients must not be built");
    assert!(control_plane.call_history().is_empty());
}

#[tokio::test]
async fn test_already_failing_over_ignores_routing() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("failing-over", false)]),
        routing(On, Off),
        routing(On, Off),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::DatabaseAlreadyFailingOver);
    assert_eq!(fixture.routing_calls(), 0);
    assert!(fixture.control_plane.failover_calls().is_empty());
}

#[tokio::test]
async fn test_cluster_status_error() {
    let fixture = Fixture::new(
        MockControlPlane::describe_failing("ThrottlingException"),
        routing(On, Off),
        routing(On, Off),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::DatabaseStatusError);
    assert_eq!(fixture.routing_calls(), 0);
    assert!(fixture.control_plane.failover_calls().is_empty());
}

#[tokio::test]
async fn test_ambiguous_cluster_count_is_status_error() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![
            cluster("available", true),
            cluster("available", true),
        ]),
        routing(On, Off),
        routing(On, Off),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::DatabaseStatusError);
}

#[tokio::test]
async fn test_no_region_on_is_unclear() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("available", false)]),
        routing(Off, Off),
        routing(Off, Off),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::TargetDatabaseUnclear);
    assert!(fixture.control_plane.failover_calls().is_empty());
}

#[tokio::test]
async fn test_both_regions_on_is_unclear() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("available", false)]),
        routing(On, On),
        routing(On, On),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::TargetDatabaseUnclear);
    assert!(fixture.control_plane.failover_calls().is_empty());
}

#[tokio::test]
async fn test_all_endpoints_failing_is_unclear() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("available", false)]),
        MockRoutingEndpoint::new()
            .with_state("rc-east", On)
            .with_failure("rc-west", "AccessDeniedException"),
        MockRoutingEndpoint::new()
            .with_failure("rc-east", "EndpointTemporarilyUnavailableException")
            .with_state("rc-west", Off),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::TargetDatabaseUnclear);
    assert_eq!(fixture.east.call_count(), 2);
    assert_eq!(fixture.west.call_count(), 2);
    assert!(fixture.control_plane.failover_calls().is_empty());
}

#[tokio::test]
async fn test_writer_in_target_region_needs_no_action() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("available", true)]),
        routing(On, Off),
        routing(On, Off),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::NoActionRequired);
    assert!(fixture.control_plane.failover_calls().is_empty());
    assert_eq!(fixture.west.call_count(), 0);
}

#[tokio::test]
async fn test_writer_elsewhere_requests_failover_once() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("available", false)]),
        routing(On, Off),
        routing(On, Off),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::RequestedFailover);
    assert_eq!(
        fixture.control_plane.failover_calls(),
        vec![("orders-global".to_string(), EAST_CLUSTER.to_string())]
    );
}

#[tokio::test]
async fn test_rejected_failover_is_reported_not_retried() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("available", true)])
            .failing_failover("InvalidGlobalClusterStateFault"),
        routing(Off, On),
        routing(Off, On),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::ErrorRequestingFailover);
    assert_eq!(
        fixture.control_plane.failover_calls(),
        vec![("orders-global".to_string(), WEST_CLUSTER.to_string())]
    );
}

#[tokio::test]
async fn test_first_endpoint_error_falls_through() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("available", true)]),
        MockRoutingEndpoint::new()
            .with_failure("rc-east", "connection timed out")
            .with_state("rc-west", Off),
        routing(Off, On),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::RequestedFailover);
    assert_eq!(fixture.east.call_count(), 2);
    assert_eq!(fixture.west.call_count(), 2);
    assert_eq!(
        fixture.control_plane.failover_calls(),
        vec![("orders-global".to_string(), WEST_CLUSTER.to_string())]
    );
}

#[tokio::test]
async fn test_other_cluster_state_still_evaluates() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("modifying", true)]),
        routing(On, Off),
        routing(On, Off),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::NoActionRequired);
}

#[tokio::test]
async fn test_repeated_invocation_is_idempotent() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("available", true)]),
        routing(Off, On),
        routing(Off, On),
    )
    .await;

    let first = fixture.invoke().await;
    let second = fixture.invoke().await;

    assert_eq!(first, DecisionOutcome::RequestedFailover);
    assert_eq!(first, second);
    assert_eq!(fixture.control_plane.describe_calls().len(), 2);
}

#[tokio::test]
async fn test_reevaluation_observes_external_change() {
    let fixture = Fixture::new(
        MockControlPlane::with_clusters(vec![cluster("available", true)]),
        routing(Off, On),
        routing(Off, On),
    )
    .await;

    assert_eq!(fixture.invoke().await, DecisionOutcome::RequestedFailover);

    fixture.control_plane.set_clusters(vec![cluster("failing-over", true)]);
    assert_eq!(fixture.invoke().await, DecisionOutcome::DatabaseAlreadyFailingOver);

    fixture.control_plane.set_clusters(vec![cluster("available", false)]);
    assert_eq!(fixture.invoke().await, DecisionOutcome::NoActionRequired);

    fixture.east.set_state("rc-east", On);
    assert_eq!(fixture.invoke().await, DecisionOutcome::TargetDatabaseUnclear);

    assert_eq!(fixture.control_plane.failover_calls().len(), 1);
}
