//! Agent records as seen by the tier engine
//!
//! Agents are owned by the wider back-office; the engine reads and updates
//! only the tier-related columns.

use crate::tier::{AgentTier, DEFAULT_TIER};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique agent identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Generate new agent ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AgentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Tier-relevant view of an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Agent ID
    pub id: AgentId,
    /// Name shown on dashboards
    pub display_name: String,
    /// Explicitly assigned tier; `None` before the first assignment
    pub agent_tier: Option<AgentTier>,
    /// Per-agent split override, percent
    pub company_commission_split: Option<u8>,
    /// Optimistic concurrency token, bumped on every tier change
    pub revision: u64,
}

impl Agent {
    /// New agent with no tier assignment
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: AgentId::new(),
            display_name: display_name.into(),
            agent_tier: None,
            company_commission_split: None,
            revision: 0,
        }
    }

    /// With an explicit ID
    #[must_use]
    pub fn with_id(mut self, id: AgentId) -> Self {
        self.id = id;
        self
    }

    /// With an assigned tier
    #[must_use]
    pub fn with_tier(mut self, tier: AgentTier) -> Self {
        self.agent_tier = Some(tier);
        self
    }

    /// With a split override
    #[must_use]
    pub fn with_commission_split(mut self, split: u8) -> Self {
        self.company_commission_split = Some(split);
        self
    }

    /// Tier used for commission purposes
    #[inline]
    #[must_use]
    pub fn effective_tier(&self) -> AgentTier {
        effective_tier(self.agent_tier)
    }
}

/// Resolve a possibly-unassigned tier to the one that governs commission
#[inline]
#[must_use]
pub fn effective_tier(assigned: Option<AgentTier>) -> AgentTier {
    assigned.unwrap_or(DEFAULT_TIER)
}

/// Row of the paginated agent listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTierSummary {
    /// Agent record
    pub agent: Agent,
    /// Effective tier
    pub tier: AgentTier,
    /// Effective split (override, else tier default), percent
    pub commission_split: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unassigned_agent_is_advisor() {
        let agent = Agent::new("Dana");
        assert_eq!(agent.agent_tier, None);
        assert_eq!(agent.effective_tier(), AgentTier::Advisor);
    }

    #[test]
    fn assigned_tier_wins() {
        let agent = Agent::new("Dana").with_tier(AgentTier::GroupLeader);
        assert_eq!(agent.effective_tier(), AgentTier::GroupLeader);
    }

    #[test]
    fn agent_id_round_trips_through_str() {
        let id = AgentId::new();
        let parsed: AgentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
