use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Result code of one failover evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionOutcome {
    /// Required configuration is missing; nothing was queried.
    ParametersMissing,
    /// The global cluster is already failing over.
    DatabaseAlreadyFailingOver,
    /// The global cluster status could not be determined.
    DatabaseStatusError,
    /// Routing controls do not name exactly one target region.
    TargetDatabaseUnclear,
    /// The target region already holds the writer.
    NoActionRequired,
    /// A failover was submitted to the control plane.
    RequestedFailover,
    /// The control plane rejected the failover request.
    ErrorRequestingFailover,
}

impl DecisionOutcome {
    /// All outcome codes.
    pub const ALL: [Self; 7] = [
        Self::ParametersMissing,
        Self::DatabaseAlreadyFailingOver,
        Self::DatabaseStatusError,
        Self::TargetDatabaseUnclear,
        Self::NoActionRequired,
        Self::RequestedFailover,
        Self::ErrorRequestingFailover,
    ];

    /// Returns the result code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ParametersMissing => "PARAMETERS_MISSING",
            Self::DatabaseAlreadyFailingOver => "DATABASE_ALREADY_FAILING_OVER",
            Self::DatabaseStatusError => "DATABASE_STATUS_ERROR",
            Self::TargetDatabaseUnclear => "TARGET_DATABASE_UNCLEAR",
            Self::NoActionRequired => "NO_ACTION_REQUIRED",
            Self::RequestedFailover => "REQUESTED_FAILOVER",
            Self::ErrorRequestingFailover => "ERROR_REQUESTING_FAILOVER",
        }
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionOutcome {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_result_codes() {
        for outcome in DecisionOutcome::ALL {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome.as_str()));
            assert_eq!(outcome.as_str().parse::<DecisionOutcome>(), Ok(outcome));
        }
    }
}
