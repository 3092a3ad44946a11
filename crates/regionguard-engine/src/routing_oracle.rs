use std::sync::Arc;

use regionguard_core::{Region, RoutingControlReader, RoutingControlStates};
use tracing::{debug, error, warn};

/// Reads routing-control states through regional endpoints.
///
/// Endpoints are tried in order. Every endpoint reads every control, and the
/// first endpoint that answers all reads cleanly wins. Results are never
/// merged across endpoints.
pub struct RoutingControlOracle {
    endpoints: Vec<(Region, Arc<dyn RoutingControlReader>)>,
    routing_controls: Vec<(Region, String)>,
}

impl RoutingControlOracle {
    /// `routing_controls` maps each owning region to its control identifier.
    pub fn new(
        endpoints: Vec<(Region, Arc<dyn RoutingControlReader>)>,
        routing_controls: Vec<(Region, String)>,
    ) -> Self {
        Self {
            endpoints,
            routing_controls,
        }
    }

    /// Queries routing-control states, falling through endpoints on error.
    ///
    /// When no endpoint yields a clean pass, the result of the last pass is
    /// returned with its error sentinel set.
    pub async fn query_routing_control_states(&self) -> RoutingControlStates {
        let mut states = RoutingControlStates::new().with_error();

        for (endpoint_region, endpoint) in &self.endpoints {
            states = self.read_all(endpoint_region, endpoint.as_ref()).await;
            if !states.has_error() {
                debug!(
                    endpoint = %endpoint_region,
                    readings = states.len(),
                    "Routing control states read"
                );
                return states;
            }
            warn!(
                endpoint = %endpoint_region,
                "Routing control read incomplete, trying next endpoint"
            );
        }

        error!(
            endpoints = self.endpoints.len(),
            "No endpoint returned a complete routing control read"
        );
        states
    }

    async fn read_all(
        &self,
        endpoint_region: &Region,
        endpoint: &dyn RoutingControlReader,
    ) -> RoutingControlStates {
        let mut states = RoutingControlStates::new();

        for (control_region, control_id) in &self.routing_controls {
            match endpoint.get_routing_control_state(control_id).await {
                Ok(state) => states.insert(control_region.clone(), state),
                Err(err) => {
                    error!(
                        endpoint = %endpoint_region,
                        region = %control_region,
                        routing_control = %control_id,
                        error = %err,
                        "Error reading routing control state"
                    );
                    states.mark_error();
                }
            }
        }

        states
    }
}
