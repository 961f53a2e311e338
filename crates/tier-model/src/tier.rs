//! Agent tier ladder ordering
//!
//! Tiers form a fixed total order. Every promotion/demotion decision is made
//! by comparing positions in this order, never by commission magnitude.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tier assigned to agents that have never been explicitly assigned one
pub const DEFAULT_TIER: AgentTier = AgentTier::Advisor;

/// Named agent rank, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentTier {
    /// Base tier
    Advisor,
    /// First leadership rung, earned on personal sales
    SalesLeader,
    /// Leads a small team
    TeamLeader,
    /// Leads several teams
    GroupLeader,
    /// Top of the ladder
    SupremeLeader,
}

impl AgentTier {
    /// Number of tiers on the ladder
    pub const COUNT: usize = 5;

    /// Every tier in ladder order
    pub const ALL: [AgentTier; Self::COUNT] = [
        AgentTier::Advisor,
        AgentTier::SalesLeader,
        AgentTier::TeamLeader,
        AgentTier::GroupLeader,
        AgentTier::SupremeLeader,
    ];

    /// Highest tier
    pub const MAX: AgentTier = AgentTier::SupremeLeader;

    /// Position in the ladder (0 = advisor)
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Tier immediately above this one, `None` at the top
    #[inline]
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Tier immediately below this one, `None` at the base
    #[inline]
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Whether this is the terminal tier
    #[inline]
    #[must_use]
    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    /// Wire name (`snake_case`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AgentTier::Advisor => "advisor",
            AgentTier::SalesLeader => "sales_leader",
            AgentTier::TeamLeader => "team_leader",
            AgentTier::GroupLeader => "group_leader",
            AgentTier::SupremeLeader => "supreme_leader",
        }
    }
}

impl Default for AgentTier {
    fn default() -> Self {
        DEFAULT_TIER
    }
}

impl fmt::Display for AgentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unknown tier name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown agent tier: '{0}'")]
pub struct ParseTierError(pub String);

impl FromStr for AgentTier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| ParseTierError(s.to_string()))
    }
}

/// Direction of a tier change, derived at call time and never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierDirection {
    /// First explicit assignment (no previous tier)
    InitialAssignment,
    /// Moved up the ladder
    Promotion,
    /// Moved down the ladder
    Demotion,
}

impl TierDirection {
    /// Classify a change; `None` when the tier does not change
    #[must_use]
    pub fn classify(previous: Option<AgentTier>, new: AgentTier) -> Option<Self> {
        match previous {
            None => Some(Self::InitialAssignment),
            Some(prev) if new.index() > prev.index() => Some(Self::Promotion),
            Some(prev) if new.index() < prev.index() => Some(Self::Demotion),
            Some(_) => None,
        }
    }

    /// Moved up
    #[inline]
    #[must_use]
    pub fn is_promotion(self) -> bool {
        self == Self::Promotion
    }

    /// Moved down
    #[inline]
    #[must_use]
    pub fn is_demotion(self) -> bool {
        self == Self::Demotion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn next_walks_the_ladder() {
        assert_eq!(AgentTier::Advisor.next(), Some(AgentTier::SalesLeader));
        assert_eq!(AgentTier::SalesLeader.next(), Some(AgentTier::TeamLeader));
        assert_eq!(AgentTier::TeamLeader.next(), Some(AgentTier::GroupLeader));
        assert_eq!(AgentTier::GroupLeader.next(), Some(AgentTier::SupremeLeader));
        assert_eq!(AgentTier::SupremeLeader.next(), None);
    }

    #[test]
    fn previous_stops_at_base() {
        assert_eq!(AgentTier::Advisor.previous(), None);
        assert_eq!(AgentTier::SupremeLeader.previous(), Some(AgentTier::GroupLeader));
    }

    #[test]
    fn parse_accepts_wire_and_loose_names() {
        assert_eq!("team_leader".parse::<AgentTier>(), Ok(AgentTier::TeamLeader));
        assert_eq!("Team-Leader".parse::<AgentTier>(), Ok(AgentTier::TeamLeader));
        assert!("broker".parse::<AgentTier>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&AgentTier::SupremeLeader).unwrap();
        assert_eq!(json, "\"supreme_leader\"");
        let tier: AgentTier = serde_json::from_str("\"sales_leader\"").unwrap();
        assert_eq!(tier, AgentTier::SalesLeader);
    }

    #[test]
    fn classify_directions() {
        use AgentTier::*;
        assert_eq!(
            TierDirection::classify(None, Advisor),
            Some(TierDirection::InitialAssignment)
        );
        assert_eq!(
            TierDirection::classify(Some(Advisor), GroupLeader),
            Some(TierDirection::Promotion)
        );
        assert_eq!(
            TierDirection::classify(Some(SupremeLeader), SalesLeader),
            Some(TierDirection::Demotion)
        );
        assert_eq!(TierDirection::classify(Some(TeamLeader), TeamLeader), None);
    }

    fn any_tier() -> impl Strategy<Value = AgentTier> {
        (0..AgentTier::ALL.len()).prop_map(|i| AgentTier::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_next_is_one_step_up(tier in any_tier()) {
            match tier.next() {
                Some(next) => prop_assert_eq!(next.index(), tier.index() + 1),
                None => prop_assert!(tier.is_max()),
            }
        }

        #[test]
        fn prop_ord_matches_index(a in any_tier(), b in any_tier()) {
            prop_assert_eq!(a.cmp(&b), a.index().cmp(&b.index()));
        }
    }
}
