//! Core domain types and traits for RegionGuard global database failover.

pub mod cluster;
pub mod config;
pub mod error;
pub mod invocation;
pub mod outcome;
pub mod region;
pub mod routing;
pub mod traits;

pub use cluster::{ClusterState, ClusterStatus, GlobalClusterDescription, GlobalClusterMember};
pub use self::config::{FailoverParams, ParameterResolver, ResolvedParameters};
pub use error::{CoreError, CoreResult};
pub use invocation::InvocationContext;
pub use outcome::DecisionOutcome;
pub use region::Region;
pub use routing::{RoutingControlState, RoutingControlStates};
pub use traits::{GlobalClusterControlPlane, RoutingControlReader};
