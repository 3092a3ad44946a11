use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Operational state of a global database cluster.
///
/// The control plane reports an open-ended status string. The states the
/// decision engine branches on are named; everything else is carried verbatim
/// in [`ClusterState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterState {
    /// Cluster is serving traffic normally.
    Available,
    /// A failover is already in progress.
    FailingOver,
    /// The status could not be determined.
    Error,
    /// Any other control-plane status (e.g. `modifying`, `upgrading`).
    Other(String),
}

impl ClusterState {
    /// Maps a control-plane status string onto a cluster state.
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        match status {
            "available" => Self::Available,
            "failing-over" => Self::FailingOver,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the status string as reported by the control plane.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "available",
            Self::FailingOver => "failing-over",
            Self::Error => "error",
            Self::Other(status) => status,
        }
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a global cluster's state and member writer flags.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatus {
    /// Overall cluster state.
    pub state: ClusterState,
    /// Member cluster identifier to writer flag.
    pub members: BTreeMap<String, bool>,
}

impl ClusterStatus {
    /// Status with the given state and no members.
    #[must_use]
    pub fn new(state: ClusterState) -> Self {
        Self {
            state,
            members: BTreeMap::new(),
        }
    }

    /// Status representing a failed or ambiguous read.
    #[must_use]
    pub fn error() -> Self {
        Self::new(ClusterState::Error)
    }

    /// Adds a member and its writer flag.
    #[must_use]
    pub fn with_member(mut self, cluster_id: impl Into<String>, is_writer: bool) -> Self {
        self.members.insert(cluster_id.into(), is_writer);
        self
    }

    /// Returns true when the given member is currently the writer.
    ///
    /// Members absent from the topology are not writers.
    #[must_use]
    pub fn is_writer(&self, cluster_id: &str) -> bool {
        self.members.get(cluster_id).copied().unwrap_or(false)
    }

    /// Identifier of the current writer member, if any.
    #[must_use]
    pub fn writer(&self) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, is_writer)| **is_writer)
            .map(|(id, _)| id.as_str())
    }
}

/// One global cluster as returned by the control plane's describe call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalClusterDescription {
    /// Raw control-plane status string.
    pub status: String,
    /// Regional member clusters.
    pub members: Vec<GlobalClusterMember>,
}

/// Regional member of a global cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalClusterMember {
    /// Regional cluster identifier (ARN).
    pub cluster_id: String,
    /// Whether this member currently holds the writer.
    pub is_writer: bool,
}

impl GlobalClusterMember {
    /// Creates a member entry.
    #[must_use]
    pub fn new(cluster_id: impl Into<String>, is_writer: bool) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            is_writer,
        }
    }
}
