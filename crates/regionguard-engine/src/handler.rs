use std::future::Future;

use regionguard_core::{
    CoreError, CoreResult, DecisionOutcome, FailoverParams, InvocationContext, ResolvedParameters,
};
use serde_json::Value;
use tracing::{debug, error, info, info_span, Instrument};

use crate::engine::{FailoverClients, FailoverEngine};

/// Top-level entry point for one failover invocation.
///
/// A handler built from incomplete parameters answers every invocation with
/// [`DecisionOutcome::ParametersMissing`] and never contacts a collaborator.
pub struct FailoverHandler {
    state: HandlerState,
}

enum HandlerState {
    Ready(FailoverEngine),
    Misconfigured(Vec<String>),
}

impl FailoverHandler {
    pub fn ready(engine: FailoverEngine) -> Self {
        Self {
            state: HandlerState::Ready(engine),
        }
    }

    pub fn misconfigured(missing: Vec<String>) -> Self {
        Self {
            state: HandlerState::Misconfigured(missing),
        }
    }

    /// Builds a handler from resolved parameters.
    ///
    /// `build_clients` runs only when every parameter resolved.
    ///
    /// # Errors
    ///
    /// Propagates client construction errors.
    pub async fn from_resolution<F, Fut>(
        resolved: ResolvedParameters,
        build_clients: F,
    ) -> CoreResult<Self>
    where
        F: FnOnce(FailoverParams) -> Fut,
        Fut: Future<Output = CoreResult<FailoverClients>>,
    {
        match resolved.into_params() {
            Ok(params) => {
                let clients = build_clients(params.clone()).await?;
                Ok(Self::ready(FailoverEngine::new(params, clients)))
            }
            Err(CoreError::ParametersMissing(missing)) => Ok(Self::misconfigured(missing)),
            Err(err) => Err(err),
        }
    }

    /// Names of missing parameters; empty when the handler is ready.
    pub fn missing_parameters(&self) -> &[String] {
        match &self.state {
            HandlerState::Ready(_) => &[],
            HandlerState::Misconfigured(missing) => missing.as_slice(),
        }
    }

    /// Handles one invocation. `event` is logged but not interpreted.
    ///
    /// # Errors
    ///
    /// Returns an error only for internal inconsistencies that map to no
    /// result code; every external failure resolves to an outcome.
    pub async fn handle(
        &self,
        event: &Value,
        ctx: &InvocationContext,
    ) -> CoreResult<DecisionOutcome> {
        let span = info_span!(
            "failover_invocation",
            invocation_id = %ctx.invocation_id,
            trigger = %ctx.trigger
        );
        self.handle_inner(event, ctx).instrument(span).await
    }

    async fn handle_inner(
        &self,
        event: &Value,
        ctx: &InvocationContext,
    ) -> CoreResult<DecisionOutcome> {
        let engine = match &self.state {
            HandlerState::Ready(engine) => engine,
            HandlerState::Misconfigured(missing) => {
                error!("{} parameters are missing, aborting", missing.join(", "));
                return Ok(DecisionOutcome::ParametersMissing);
            }
        };

        info!(
            version = env!("CARGO_PKG_VERSION"),
            invoked_at = %ctx.invoked_at,
            global_cluster_id = %engine.params().global_cluster_id,
            "Global cluster failover triggered"
        );
        debug!(event = %event, "Invocation event");

        match engine.evaluate().await {
            Ok(outcome) => {
                info!(outcome = %outcome, "Failover evaluation complete");
                Ok(outcome)
            }
            Err(err) => {
                error!(error = %err, "Failover evaluation failed");
                Err(err)
            }
        }
    }
}
