//! Resolved tier ladder
//!
//! Provides [`TierLadder`], the complete configuration table used for every
//! lookup. Stored rows overlay the built-in defaults, so each tier always has
//! exactly one configuration even before an admin has created its row.

use crate::error::ValidationError;
use tier_model::{Agent, AgentTier, TierConfiguration};

/// Complete per-tier configuration, indexed by ladder position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierLadder {
    rows: [TierConfiguration; AgentTier::COUNT],
    stored: [bool; AgentTier::COUNT],
}

impl TierLadder {
    /// Ladder made only of built-in defaults
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            rows: AgentTier::ALL.map(TierConfiguration::default_for),
            stored: [false; AgentTier::COUNT],
        }
    }

    /// Overlay stored rows on the defaults
    ///
    /// If a tier appears more than once, the last row wins.
    #[must_use]
    pub fn resolve<I>(stored_rows: I) -> Self
    where
        I: IntoIterator<Item = TierConfiguration>,
    {
        let mut ladder = Self::defaults();
        for row in stored_rows {
            let idx = row.tier.index();
            ladder.rows[idx] = row;
            ladder.stored[idx] = true;
        }
        ladder
    }

    /// Configuration for a tier
    #[inline]
    #[must_use]
    pub fn config(&self, tier: AgentTier) -> &TierConfiguration {
        &self.rows[tier.index()]
    }

    /// Configuration of the tier above, `None` at the top
    #[inline]
    #[must_use]
    pub fn next_config(&self, tier: AgentTier) -> Option<&TierConfiguration> {
        tier.next().map(|next| self.config(next))
    }

    /// Whether the tier has a stored row (as opposed to a built-in default)
    #[inline]
    #[must_use]
    pub fn is_stored(&self, tier: AgentTier) -> bool {
        self.stored[tier.index()]
    }

    /// Rows in ladder order
    pub fn iter(&self) -> impl Iterator<Item = &TierConfiguration> {
        self.rows.iter()
    }

    /// Owned rows in ladder order
    #[must_use]
    pub fn to_vec(&self) -> Vec<TierConfiguration> {
        self.rows.to_vec()
    }

    /// Copy of this ladder with one row replaced
    #[must_use]
    pub fn with_row(&self, row: TierConfiguration) -> Self {
        let mut ladder = self.clone();
        let idx = row.tier.index();
        ladder.rows[idx] = row;
        ladder.stored[idx] = true;
        ladder
    }

    /// Split that applies to an agent: their override, else the tier default
    #[must_use]
    pub fn effective_commission_split(&self, agent: &Agent) -> u8 {
        agent
            .company_commission_split
            .unwrap_or_else(|| self.config(agent.effective_tier()).commission_split)
    }

    /// Check the ladder invariants
    ///
    /// - percentages within [0, 100]
    /// - base tier earns no leadership bonus
    /// - split and both requirements non-decreasing up the ladder
    ///
    /// # Errors
    /// Returns the first violated invariant as a field-level error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for row in &self.rows {
            if row.commission_split > 100 {
                return Err(ValidationError::new(
                    "commission_split",
                    format!("{} split {}% exceeds 100%", row.tier, row.commission_split),
                ));
            }
            if row.leadership_bonus_rate > 100 {
                return Err(ValidationError::new(
                    "leadership_bonus_rate",
                    format!(
                        "{} bonus {}% exceeds 100%",
                        row.tier, row.leadership_bonus_rate
                    ),
                ));
            }
        }

        let base = &self.rows[0];
        if base.leadership_bonus_rate != 0 {
            return Err(ValidationError::new(
                "leadership_bonus_rate",
                format!("{} is the base tier and cannot earn a leadership bonus", base.tier),
            ));
        }

        for pair in self.rows.windows(2) {
            let (lower, higher) = (&pair[0], &pair[1]);
            if higher.commission_split < lower.commission_split {
                return Err(ValidationError::new(
                    "commission_split",
                    format!(
                        "{} split {}% would be below {} split {}%",
                        higher.tier, higher.commission_split, lower.tier, lower.commission_split
                    ),
                ));
            }
            if higher.requirements.monthly_sales < lower.requirements.monthly_sales {
                return Err(ValidationError::new(
                    "requirements",
                    format!(
                        "{} monthly sales requirement {} would be below {} requirement {}",
                        higher.tier,
                        higher.requirements.monthly_sales,
                        lower.tier,
                        lower.requirements.monthly_sales
                    ),
                ));
            }
            if higher.requirements.team_members < lower.requirements.team_members {
                return Err(ValidationError::new(
                    "requirements",
                    format!(
                        "{} team size requirement {} would be below {} requirement {}",
                        higher.tier,
                        higher.requirements.team_members,
                        lower.tier,
                        lower.requirements.team_members
                    ),
                ));
            }
        }

        Ok(())
    }
}

impl Default for TierLadder {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tier_model::TierRequirements;

    #[test]
    fn defaults_validate() {
        assert!(TierLadder::defaults().validate().is_ok());
    }

    #[test]
    fn resolve_overlays_stored_rows() {
        let mut row = TierConfiguration::default_for(AgentTier::TeamLeader);
        row.commission_split = 77;

        let ladder = TierLadder::resolve(vec![row]);

        assert_eq!(ladder.config(AgentTier::TeamLeader).commission_split, 77);
        assert!(ladder.is_stored(AgentTier::TeamLeader));
        assert!(!ladder.is_stored(AgentTier::Advisor));
        assert_eq!(ladder.iter().count(), AgentTier::ALL.len());
    }

    #[test]
    fn next_config_is_none_at_top() {
        let ladder = TierLadder::defaults();
        assert_eq!(
            ladder.next_config(AgentTier::Advisor).map(|c| c.tier),
            Some(AgentTier::SalesLeader)
        );
        assert!(ladder.next_config(AgentTier::SupremeLeader).is_none());
    }

    #[test]
    fn lower_split_above_is_rejected() {
        let mut row = TierConfiguration::default_for(AgentTier::GroupLeader);
        row.commission_split = 50;

        let err = TierLadder::defaults().with_row(row).validate().unwrap_err();
        assert_eq!(err.field, "commission_split");
    }

    #[test]
    fn lower_requirement_above_is_rejected() {
        let mut row = TierConfiguration::default_for(AgentTier::TeamLeader);
        row.requirements = TierRequirements::new(2, 3);

        let err = TierLadder::defaults().with_row(row).validate().unwrap_err();
        assert_eq!(err.field, "requirements");
    }

    #[test]
    fn base_tier_bonus_is_rejected() {
        let mut row = TierConfiguration::default_for(AgentTier::Advisor);
        row.leadership_bonus_rate = 1;

        let err = TierLadder::defaults().with_row(row).validate().unwrap_err();
        assert_eq!(err.field, "leadership_bonus_rate");
    }

    #[test]
    fn effective_split_prefers_override() {
        let ladder = TierLadder::defaults();
        let plain = Agent::new("A").with_tier(AgentTier::TeamLeader);
        let custom = Agent::new("B")
            .with_tier(AgentTier::TeamLeader)
            .with_commission_split(90);
        let unassigned = Agent::new("C");

        assert_eq!(ladder.effective_commission_split(&plain), 75);
        assert_eq!(ladder.effective_commission_split(&custom), 90);
        assert_eq!(ladder.effective_commission_split(&unassigned), 60);
    }
}
