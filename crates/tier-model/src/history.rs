//! Append-only audit records
//!
//! [`TierChangeHistory`] answers "why did this agent's commission change".
//! [`TierConfigHistory`] answers the same for the global commission table.
//! Neither type has mutators; once built they are only ever appended.

use crate::agent::AgentId;
use crate::caller::ActorId;
use crate::config::ConfigField;
use crate::metrics::PerformanceMetrics;
use crate::tier::{AgentTier, TierDirection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// History row identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(pub Ulid);

impl HistoryId {
    /// Generate new history ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for HistoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HistoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One accepted tier change for one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierChangeHistory {
    /// Row ID
    pub id: HistoryId,
    /// Agent whose tier changed
    pub agent_id: AgentId,
    /// Tier before the change; `None` on initial assignment
    pub previous_tier: Option<AgentTier>,
    /// Tier after the change
    pub new_tier: AgentTier,
    /// Admin-supplied justification
    pub reason: String,
    /// When the change took effect
    pub effective_date: DateTime<Utc>,
    /// Admin who made the change
    pub promoted_by: ActorId,
    /// Metrics at the time of the change, if supplied
    pub performance_metrics: Option<PerformanceMetrics>,
}

impl TierChangeHistory {
    /// Direction of this change
    ///
    /// Rows are only written for real changes, so a missing direction never
    /// occurs for stored history; it is mapped to initial assignment.
    #[must_use]
    pub fn direction(&self) -> TierDirection {
        TierDirection::classify(self.previous_tier, self.new_tier)
            .unwrap_or(TierDirection::InitialAssignment)
    }
}

/// Whether a configuration row was created or modified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigChangeType {
    /// Row did not exist before
    Create,
    /// Existing row modified
    Update,
}

/// Before/after value of one configuration field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field that changed
    pub field: ConfigField,
    /// Value before; `None` when the row was created
    pub previous: Option<serde_json::Value>,
    /// Value after
    pub new: serde_json::Value,
}

/// One edit of the global tier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfigHistory {
    /// Row ID
    pub id: HistoryId,
    /// Tier whose row was edited
    pub tier: AgentTier,
    /// Create or update
    pub change_type: ConfigChangeType,
    /// Changed fields
    pub changes: Vec<FieldChange>,
    /// Admin-supplied justification
    pub change_reason: String,
    /// Admin who made the change
    pub changed_by: ActorId,
    /// When the change was committed
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_direction_is_derived() {
        let row = TierChangeHistory {
            id: HistoryId::new(),
            agent_id: AgentId::new(),
            previous_tier: Some(AgentTier::TeamLeader),
            new_tier: AgentTier::SalesLeader,
            reason: "missed quarterly targets".to_string(),
            effective_date: Utc::now(),
            promoted_by: ActorId::new("admin-1"),
            performance_metrics: None,
        };
        assert!(row.direction().is_demotion());
    }

    #[test]
    fn history_ids_sort_by_creation() {
        let first = HistoryId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = HistoryId::new();
        assert!(first < second);
    }
}
