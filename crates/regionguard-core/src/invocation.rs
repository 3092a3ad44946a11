use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ambient context of one evaluation, used only for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    /// Unique id for correlating log lines of one invocation.
    pub invocation_id: Uuid,
    /// When the invocation started.
    pub invoked_at: DateTime<Utc>,
    /// What triggered the invocation (e.g. `cli`, `schedule`, `alarm`).
    pub trigger: String,
}

impl InvocationContext {
    /// New context stamped with the current time.
    #[must_use]
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            invoked_at: Utc::now(),
            trigger: trigger.into(),
        }
    }
}
