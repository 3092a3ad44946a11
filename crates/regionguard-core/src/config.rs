//! Failover parameter resolution.
//!
//! The five required parameters are read from the process environment through
//! the `config` crate. Each value is deployed as serialized JSON; the global
//! cluster identifier may also be given as a bare string. Problems are
//! collected by parameter name rather than raised, so the caller can decide to
//! abort before any external call is made.

use std::collections::{BTreeMap, HashMap};

use config::{Config, Environment};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::region::Region;

/// Ordered deployment regions (JSON array).
pub const DEPLOYMENT_REGIONS: &str = "DeploymentRegions";
/// Global cluster identifier (JSON string or bare string).
pub const AURORA_GLOBAL_CLUSTER_ID: &str = "AuroraGlobalClusterId";
/// Region to regional cluster identifier (JSON object).
pub const AURORA_CLUSTER_ARNS: &str = "AuroraClusterArns";
/// Region to routing-control identifier (JSON object).
pub const ROUTING_CONTROL_ARNS: &str = "RoutingControlArns";
/// Region to routing-control endpoint URL (JSON object).
pub const CLUSTER_ENDPOINTS: &str = "ClusterEndpoints";

/// Raw parameter strings as found in the environment.
///
/// The environment source lowercases keys, so each field accepts both spellings.
#[derive(Debug, Default, Deserialize)]
struct RawParameters {
    #[serde(alias = "DeploymentRegions", alias = "deploymentregions")]
    deployment_regions: Option<String>,
    #[serde(alias = "AuroraGlobalClusterId", alias = "auroraglobalclusterid")]
    aurora_global_cluster_id: Option<String>,
    #[serde(alias = "AuroraClusterArns", alias = "auroraclusterarns")]
    aurora_cluster_arns: Option<String>,
    #[serde(alias = "RoutingControlArns", alias = "routingcontrolarns")]
    routing_control_arns: Option<String>,
    #[serde(alias = "ClusterEndpoints", alias = "clusterendpoints")]
    cluster_endpoints: Option<String>,
}

/// Reads failover parameters from an environment source.
#[derive(Debug, Clone, Default)]
pub struct ParameterResolver {
    source: Option<HashMap<String, String>>,
}

impl ParameterResolver {
    /// Resolver over the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self { source: None }
    }

    /// Resolver over an explicit set of variables instead of the process
    /// environment.
    #[must_use]
    pub fn with_source<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Reads and parses every parameter, collecting the names of those that
    /// are missing or unusable.
    #[must_use]
    pub fn resolve(&self) -> ResolvedParameters {
        let raw = match self.load_raw() {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    error = %err,
                    "Failed to read environment, treating all parameters as missing"
                );
                RawParameters::default()
            }
        };

        let mut resolved = ResolvedParameters::default();

        resolved.deployment_regions = resolved.take(
            DEPLOYMENT_REGIONS,
            raw.deployment_regions.as_deref(),
            parse_regions,
        );
        resolved.global_cluster_id = resolved.take(
            AURORA_GLOBAL_CLUSTER_ID,
            raw.aurora_global_cluster_id.as_deref(),
            parse_identifier,
        );
        resolved.cluster_ids = resolved.take(
            AURORA_CLUSTER_ARNS,
            raw.aurora_cluster_arns.as_deref(),
            parse_region_map,
        );
        resolved.routing_controls = resolved.take(
            ROUTING_CONTROL_ARNS,
            raw.routing_control_arns.as_deref(),
            parse_region_map,
        );
        resolved.endpoints = resolved.take(
            CLUSTER_ENDPOINTS,
            raw.cluster_endpoints.as_deref(),
            parse_region_map,
        );

        resolved.cross_validate();
        resolved
    }

    fn load_raw(&self) -> Result<RawParameters, config::ConfigError> {
        Config::builder()
            .add_source(Environment::default().source(self.source.clone()))
            .build()?
            .try_deserialize()
    }
}

/// Outcome of parameter resolution: whatever parsed, plus the names that did not.
#[derive(Debug, Clone, Default)]
pub struct ResolvedParameters {
    deployment_regions: Option<Vec<Region>>,
    global_cluster_id: Option<String>,
    cluster_ids: Option<Vec<(Region, String)>>,
    routing_controls: Option<Vec<(Region, String)>>,
    endpoints: Option<Vec<(Region, String)>>,
    errors: Vec<String>,
}

impl ResolvedParameters {
    /// Names of parameters that are missing or invalid, in declaration order.
    ///
    /// Empty means every parameter resolved.
    #[must_use]
    pub fn validate(&self) -> &[String] {
        &self.errors
    }

    /// Converts into typed parameters.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ParametersMissing` with every offending name when
    /// [`validate`](Self::validate) is non-empty.
    pub fn into_params(self) -> CoreResult<FailoverParams> {
        match self {
            Self {
                deployment_regions: Some(deployment_regions),
                global_cluster_id: Some(global_cluster_id),
                cluster_ids: Some(cluster_ids),
                routing_controls: Some(routing_controls),
                endpoints: Some(endpoints),
                errors,
            } if errors.is_empty() => Ok(FailoverParams {
                deployment_regions,
                global_cluster_id,
                cluster_ids: cluster_ids.into_iter().collect(),
                routing_controls,
                endpoints,
            }),
            Self { errors, .. } => Err(CoreError::ParametersMissing(errors)),
        }
    }

    fn take<T>(
        &mut self,
        name: &'static str,
        raw: Option<&str>,
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            debug!(parameter = name, "Parameter not set");
            self.push_error(name);
            return None;
        };

        let parsed = parse(raw);
        if parsed.is_none() {
            debug!(parameter = name, "Parameter could not be parsed");
            self.push_error(name);
        }
        parsed
    }

    fn push_error(&mut self, name: &str) {
        if !self.errors.iter().any(|existing| existing == name) {
            self.errors.push(name.to_string());
        }
    }

    /// Every deployment region needs a cluster and a routing control, and every
    /// routing control must map to a cluster.
    fn cross_validate(&mut self) {
        let mut missing = Vec::new();

        if let (Some(regions), Some(cluster_ids)) = (&self.deployment_regions, &self.cluster_ids) {
            if regions.iter().any(|r| !contains_region(cluster_ids, r)) {
                missing.push(AURORA_CLUSTER_ARNS);
            }
        }
        if let (Some(regions), Some(controls)) =
            (&self.deployment_regions, &self.routing_controls)
        {
            if regions.iter().any(|r| !contains_region(controls, r)) {
                missing.push(ROUTING_CONTROL_ARNS);
            }
        }
        if let (Some(controls), Some(cluster_ids)) = (&self.routing_controls, &self.cluster_ids) {
            if controls.iter().any(|(r, _)| !contains_region(cluster_ids, r)) {
                missing.push(AURORA_CLUSTER_ARNS);
            }
        }

        for name in missing {
            warn!(parameter = name, "Parameter does not cover every configured region");
            self.push_error(name);
        }
    }
}

/// Fully resolved failover parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailoverParams {
    /// Deployment regions in configured order.
    pub deployment_regions: Vec<Region>,
    /// Global cluster identifier.
    pub global_cluster_id: String,
    /// Regional cluster identifier per region.
    pub cluster_ids: BTreeMap<Region, String>,
    /// Routing-control identifier per owning region, in configured order.
    pub routing_controls: Vec<(Region, String)>,
    /// Routing-control endpoint URL per region, in configured order. Endpoints
    /// are tried in this order.
    pub endpoints: Vec<(Region, String)>,
}

impl FailoverParams {
    /// Regional cluster identifier for `region`.
    #[must_use]
    pub fn cluster_id(&self, region: &Region) -> Option<&str> {
        self.cluster_ids.get(region).map(String::as_str)
    }
}

fn contains_region(entries: &[(Region, String)], region: &Region) -> bool {
    entries.iter().any(|(r, _)| r == region)
}

fn parse_regions(raw: &str) -> Option<Vec<Region>> {
    let regions: Vec<String> = serde_json::from_str(raw).ok()?;
    if regions.is_empty() || regions.iter().any(|r| r.trim().is_empty()) {
        return None;
    }
    Some(regions.into_iter().map(Region::from).collect())
}

fn parse_identifier(raw: &str) -> Option<String> {
    let id = match serde_json::from_str::<Value>(raw) {
        Ok(Value::String(id)) => id,
        Ok(_) => return None,
        Err(_) => raw.to_string(),
    };
    (!id.trim().is_empty()).then_some(id)
}

fn parse_region_map(raw: &str) -> Option<Vec<(Region, String)>> {
    let map: serde_json::Map<String, Value> = serde_json::from_str(raw).ok()?;
    if map.is_empty() {
        return None;
    }
    map.into_iter()
        .map(|(region, value)| match value {
            Value::String(s) if !s.trim().is_empty() => Some((Region::from(region), s)),
            _ => None,
        })
        .collect()
}
