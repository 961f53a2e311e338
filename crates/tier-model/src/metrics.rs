//! Agent performance metrics
//!
//! Metrics are computed outside this workspace from transaction history.
//! They arrive as signed integers; malformed negatives are clamped to zero
//! rather than rejected.

use serde::{Deserialize, Serialize};

/// Snapshot of an agent's performance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Closed transactions this month
    pub monthly_sales: i64,
    /// Active downline agents
    pub team_members: i64,
}

impl PerformanceMetrics {
    /// Create metrics
    #[inline]
    #[must_use]
    pub const fn new(monthly_sales: i64, team_members: i64) -> Self {
        Self {
            monthly_sales,
            team_members,
        }
    }

    /// Copy with negative values raised to zero
    #[inline]
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            monthly_sales: self.monthly_sales.max(0),
            team_members: self.team_members.max(0),
        }
    }

    /// Sales as a non-negative count
    #[inline]
    #[must_use]
    pub fn sales_count(&self) -> u64 {
        u64::try_from(self.monthly_sales).unwrap_or(0)
    }

    /// Team size as a non-negative count
    #[inline]
    #[must_use]
    pub fn team_count(&self) -> u64 {
        u64::try_from(self.team_members).unwrap_or(0)
    }
}
