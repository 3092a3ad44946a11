use thiserror::Error;

/// Canonical error type for failover evaluation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more required parameters are absent or unparsable.
    #[error("parameters missing: {}", .0.join(", "))]
    ParametersMissing(Vec<String>),

    /// A parameter was present but its value is unusable.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Parameter name as it appears in the environment.
        name: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// The database control plane rejected or failed a request.
    #[error("control plane error: {0}")]
    ControlPlane(String),

    /// A routing-control endpoint failed to answer a read.
    #[error("routing control endpoint `{endpoint}` error: {message}")]
    RoutingControl {
        /// Region of the endpoint that was queried.
        endpoint: String,
        /// Human-readable details.
        message: String,
    },

    /// Unexpected internal inconsistency.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable details for debugging purposes.
        message: String,
    },
}

impl CoreError {
    /// Creates an `InvalidParameter` variant.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Creates a `RoutingControl` variant.
    #[must_use]
    pub fn routing_control(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RoutingControl {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates an `Internal` variant.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convenient result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
