//! Failover decision engine for a multi-region global database cluster.
//!
//! Each invocation reads the cluster topology, then the routing controls,
//! reconciles them into a single target region and submits a failover only
//! when the writer is elsewhere. Every ambiguous or failed read resolves to a
//! no-action [`DecisionOutcome`](regionguard_core::DecisionOutcome).

pub mod cluster_oracle;
pub mod decision;
pub mod engine;
pub mod executor;
pub mod handler;
pub mod mock;
pub mod routing_oracle;

pub use cluster_oracle::ClusterStatusOracle;
pub use decision::{decide, Decision};
pub use engine::{FailoverClients, FailoverEngine};
pub use executor::FailoverExecutor;
pub use handler::FailoverHandler;
pub use routing_oracle::RoutingControlOracle;
