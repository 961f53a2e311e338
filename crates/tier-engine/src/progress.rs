//! Advisory progress toward the next tier
//!
//! Progress is derived on every read from current metrics and is never
//! persisted. It never triggers a tier change; transitions are always an
//! explicit admin action.
//!
//! # Averaging
//!
//! The headline `overall` figure averages only the dimensions whose
//! requirement is non-zero. A zero requirement is trivially met (100%) but
//! would otherwise inflate the headline number. When every requirement of the
//! next tier is zero, `overall` is 100.

use crate::ladder::TierLadder;
use serde::{Deserialize, Serialize};
use tier_model::{AgentTier, PerformanceMetrics};

/// Progress on one qualification dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionProgress {
    /// Agent's (clamped) value
    pub actual: u64,
    /// Next tier's threshold
    pub required: u32,
    /// Completion in [0, 100]
    pub percent: f64,
}

impl DimensionProgress {
    fn measure(actual: u64, required: u32) -> Self {
        let percent = if required == 0 {
            100.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let ratio = actual as f64 / f64::from(required);
            (ratio * 100.0).clamp(0.0, 100.0)
        };
        Self {
            actual,
            required,
            percent,
        }
    }

    /// Whether the next tier asks for anything on this dimension
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required > 0
    }

    /// Threshold reached
    #[inline]
    #[must_use]
    pub fn is_met(&self) -> bool {
        self.actual >= u64::from(self.required)
    }
}

/// Progress toward a concrete next tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextTierProgress {
    /// Tier the agent holds
    pub current: AgentTier,
    /// Tier being worked toward
    pub next: AgentTier,
    /// Monthly sales dimension
    pub sales: DimensionProgress,
    /// Team size dimension
    pub team: DimensionProgress,
    /// Average of the required dimensions, in [0, 100]
    pub overall: f64,
    /// Every threshold met
    pub eligible: bool,
}

/// Result of the progress calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TierProgress {
    /// Terminal state: no tier above
    MaxTierReached {
        /// Tier the agent holds
        current: AgentTier,
    },
    /// Numeric progress toward the next tier
    InProgress(NextTierProgress),
}

impl TierProgress {
    /// Numeric progress, `None` at the top tier
    #[inline]
    #[must_use]
    pub fn as_next(&self) -> Option<&NextTierProgress> {
        match self {
            Self::InProgress(progress) => Some(progress),
            Self::MaxTierReached { .. } => None,
        }
    }

    /// Whether the agent already holds the top tier
    #[inline]
    #[must_use]
    pub fn is_max_tier(&self) -> bool {
        matches!(self, Self::MaxTierReached { .. })
    }
}

/// Compute progress from `current` toward the tier above
#[must_use]
pub fn calculate_progress(
    ladder: &TierLadder,
    current: AgentTier,
    metrics: PerformanceMetrics,
) -> TierProgress {
    let Some(next) = ladder.next_config(current) else {
        return TierProgress::MaxTierReached { current };
    };

    let metrics = metrics.clamped();
    let sales = DimensionProgress::measure(metrics.sales_count(), next.requirements.monthly_sales);
    let team = DimensionProgress::measure(metrics.team_count(), next.requirements.team_members);

    let required: Vec<f64> = [sales, team]
        .iter()
        .filter(|d| d.is_required())
        .map(|d| d.percent)
        .collect();
    let overall = if required.is_empty() {
        100.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mean = required.iter().sum::<f64>() / required.len() as f64;
        mean.clamp(0.0, 100.0)
    };

    TierProgress::InProgress(NextTierProgress {
        current,
        next: next.tier,
        sales,
        team,
        overall,
        eligible: sales.is_met() && team.is_met(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tier_model::{TierConfiguration, TierRequirements};

    fn ladder_with(tier: AgentTier, requirements: TierRequirements) -> TierLadder {
        let mut row = TierConfiguration::default_for(tier);
        row.requirements = requirements;
        TierLadder::defaults().with_row(row)
    }

    #[test]
    fn advisor_meeting_sales_target_is_complete() {
        let ladder = TierLadder::defaults();
        let progress = calculate_progress(
            &ladder,
            AgentTier::Advisor,
            PerformanceMetrics::new(5, 0),
        );

        let next = progress.as_next().unwrap();
        assert_eq!(next.next, AgentTier::SalesLeader);
        assert_eq!(next.sales.percent, 100.0);
        assert_eq!(next.team.percent, 100.0);
        assert_eq!(next.overall, 100.0);
        assert!(next.eligible);
    }

    #[test]
    fn supreme_leader_is_terminal() {
        let progress = calculate_progress(
            &TierLadder::defaults(),
            AgentTier::SupremeLeader,
            PerformanceMetrics::new(1_000, 1_000),
        );
        assert_eq!(
            progress,
            TierProgress::MaxTierReached {
                current: AgentTier::SupremeLeader
            }
        );
        assert!(progress.as_next().is_none());
    }

    #[test]
    fn zero_requirement_dimension_is_excluded_from_overall() {
        // sales_leader requires 5 sales and no team
        let progress = calculate_progress(
            &TierLadder::defaults(),
            AgentTier::Advisor,
            PerformanceMetrics::new(2, 0),
        );
        let next = progress.as_next().unwrap();
        assert_eq!(next.team.percent, 100.0);
        assert!((next.sales.percent - 40.0).abs() < 1e-9);
        assert!((next.overall - 40.0).abs() < 1e-9);
        assert!(!next.eligible);
    }

    #[test]
    fn all_zero_requirements_report_complete() {
        let ladder = ladder_with(AgentTier::SalesLeader, TierRequirements::new(0, 0));
        let progress = calculate_progress(&ladder, AgentTier::Advisor, PerformanceMetrics::default());
        let next = progress.as_next().unwrap();
        assert_eq!(next.overall, 100.0);
        assert!(next.eligible);
    }

    #[test]
    fn both_dimensions_required_are_averaged() {
        // team_leader requires 10 sales and 3 members
        let progress = calculate_progress(
            &TierLadder::defaults(),
            AgentTier::SalesLeader,
            PerformanceMetrics::new(5, 3),
        );
        let next = progress.as_next().unwrap();
        assert!((next.sales.percent - 50.0).abs() < 1e-9);
        assert_eq!(next.team.percent, 100.0);
        assert!((next.overall - 75.0).abs() < 1e-9);
    }

    #[test]
    fn negative_metrics_are_clamped() {
        let progress = calculate_progress(
            &TierLadder::defaults(),
            AgentTier::TeamLeader,
            PerformanceMetrics::new(-10, -3),
        );
        let next = progress.as_next().unwrap();
        assert_eq!(next.sales.actual, 0);
        assert_eq!(next.sales.percent, 0.0);
        assert_eq!(next.overall, 0.0);
    }

    #[test]
    fn overshoot_is_capped() {
        let progress = calculate_progress(
            &TierLadder::defaults(),
            AgentTier::GroupLeader,
            PerformanceMetrics::new(400, 250),
        );
        let next = progress.as_next().unwrap();
        assert_eq!(next.sales.percent, 100.0);
        assert_eq!(next.overall, 100.0);
    }
}
