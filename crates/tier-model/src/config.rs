//! Per-tier commission configuration
//!
//! One [`TierConfiguration`] row exists per [`AgentTier`]. Rows are shared
//! reference data: read by every dashboard, written only through the
//! admin-gated configuration editor.

use crate::tier::AgentTier;
use serde::{Deserialize, Serialize};

/// Thresholds an agent must reach to qualify for a tier from the one below
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TierRequirements {
    /// Closed transactions per month
    pub monthly_sales: u32,
    /// Active agents recruited into the downline
    pub team_members: u32,
}

impl TierRequirements {
    /// Create requirements
    #[inline]
    #[must_use]
    pub const fn new(monthly_sales: u32, team_members: u32) -> Self {
        Self {
            monthly_sales,
            team_members,
        }
    }

    /// True when both thresholds are zero
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monthly_sales == 0 && self.team_members == 0
    }
}

/// Commission settings for one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfiguration {
    /// Tier this row configures
    pub tier: AgentTier,
    /// Presentation name
    pub display_name: String,
    /// Presentation blurb
    pub description: String,
    /// Agent's share of commission on a closed transaction, percent
    pub commission_split: u8,
    /// Override earned on downline production, percent
    pub leadership_bonus_rate: u8,
    /// Qualification thresholds
    pub requirements: TierRequirements,
}

impl TierConfiguration {
    /// Built-in configuration for a tier
    #[must_use]
    pub fn default_for(tier: AgentTier) -> Self {
        let (display_name, description, split, bonus, requirements) = match tier {
            AgentTier::Advisor => (
                "Advisor",
                "Entry tier for licensed agents",
                60,
                0,
                TierRequirements::new(0, 0),
            ),
            AgentTier::SalesLeader => (
                "Sales Leader",
                "Consistent personal producer",
                70,
                0,
                TierRequirements::new(5, 0),
            ),
            AgentTier::TeamLeader => (
                "Team Leader",
                "Producer leading a small team",
                75,
                5,
                TierRequirements::new(10, 3),
            ),
            AgentTier::GroupLeader => (
                "Group Leader",
                "Leader of several teams",
                80,
                8,
                TierRequirements::new(20, 10),
            ),
            AgentTier::SupremeLeader => (
                "Supreme Leader",
                "Top of the brokerage ladder",
                85,
                10,
                TierRequirements::new(40, 25),
            ),
        };

        Self {
            tier,
            display_name: display_name.to_string(),
            description: description.to_string(),
            commission_split: split,
            leadership_bonus_rate: bonus,
            requirements,
        }
    }

    /// Apply a partial update, returning the fields that actually changed
    ///
    /// Percentages are narrowed to `u8` by the caller after range checks,
    /// so values here are taken as-is.
    pub fn apply(&mut self, patch: &ValidatedPatch) -> Vec<ConfigField> {
        let mut changed = Vec::new();

        if let Some(name) = &patch.display_name {
            if *name != self.display_name {
                self.display_name.clone_from(name);
                changed.push(ConfigField::DisplayName);
            }
        }
        if let Some(description) = &patch.description {
            if *description != self.description {
                self.description.clone_from(description);
                changed.push(ConfigField::Description);
            }
        }
        if let Some(split) = patch.commission_split {
            if split != self.commission_split {
                self.commission_split = split;
                changed.push(ConfigField::CommissionSplit);
            }
        }
        if let Some(bonus) = patch.leadership_bonus_rate {
            if bonus != self.leadership_bonus_rate {
                self.leadership_bonus_rate = bonus;
                changed.push(ConfigField::LeadershipBonusRate);
            }
        }
        if let Some(requirements) = patch.requirements {
            if requirements != self.requirements {
                self.requirements = requirements;
                changed.push(ConfigField::Requirements);
            }
        }

        changed
    }

    /// Current value of a field as JSON, for audit records
    #[must_use]
    pub fn field_value(&self, field: ConfigField) -> serde_json::Value {
        match field {
            ConfigField::DisplayName => serde_json::Value::from(self.display_name.clone()),
            ConfigField::Description => serde_json::Value::from(self.description.clone()),
            ConfigField::CommissionSplit => serde_json::Value::from(self.commission_split),
            ConfigField::LeadershipBonusRate => {
                serde_json::Value::from(self.leadership_bonus_rate)
            }
            ConfigField::Requirements => serde_json::json!({
                "monthly_sales": self.requirements.monthly_sales,
                "team_members": self.requirements.team_members,
            }),
        }
    }
}

/// The built-in ladder, one row per tier in order
#[must_use]
pub fn default_table() -> Vec<TierConfiguration> {
    AgentTier::ALL
        .into_iter()
        .map(TierConfiguration::default_for)
        .collect()
}

/// Editable configuration fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    /// `display_name`
    DisplayName,
    /// `description`
    Description,
    /// `commission_split`
    CommissionSplit,
    /// `leadership_bonus_rate`
    LeadershipBonusRate,
    /// `requirements`
    Requirements,
}

impl ConfigField {
    /// Every editable field
    pub const ALL: [ConfigField; 5] = [
        ConfigField::DisplayName,
        ConfigField::Description,
        ConfigField::CommissionSplit,
        ConfigField::LeadershipBonusRate,
        ConfigField::Requirements,
    ];

    /// Field name as it appears on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ConfigField::DisplayName => "display_name",
            ConfigField::Description => "description",
            ConfigField::CommissionSplit => "commission_split",
            ConfigField::LeadershipBonusRate => "leadership_bonus_rate",
            ConfigField::Requirements => "requirements",
        }
    }
}

/// Partial replacement of one tier's configuration, as submitted
///
/// Percentages are wide signed integers so out-of-range input survives
/// deserialization and can be rejected with a field-level message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfigPatch {
    /// New display name
    pub display_name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New commission split, percent
    pub commission_split: Option<i64>,
    /// New leadership bonus rate, percent
    pub leadership_bonus_rate: Option<i64>,
    /// New requirements
    pub requirements: Option<TierRequirements>,
}

impl TierConfigPatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With display name
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With commission split
    #[must_use]
    pub fn with_commission_split(mut self, split: i64) -> Self {
        self.commission_split = Some(split);
        self
    }

    /// With leadership bonus rate
    #[must_use]
    pub fn with_leadership_bonus_rate(mut self, rate: i64) -> Self {
        self.leadership_bonus_rate = Some(rate);
        self
    }

    /// With requirements
    #[must_use]
    pub fn with_requirements(mut self, requirements: TierRequirements) -> Self {
        self.requirements = Some(requirements);
        self
    }
}

/// A patch whose percentages have passed range checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedPatch {
    /// New display name
    pub display_name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New commission split, percent in [0, 100]
    pub commission_split: Option<u8>,
    /// New leadership bonus rate, percent in [0, 100]
    pub leadership_bonus_rate: Option<u8>,
    /// New requirements
    pub requirements: Option<TierRequirements>,
}
