//! Engine settings
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! min_reason_length = 10
//! apply_tier_split_on_change = true
//! conflict_retries = 1
//!
//! [[tiers]]
//! tier = "sales_leader"
//! display_name = "Sales Leader"
//! description = "Consistent personal producer"
//! commission_split = 70
//! leadership_bonus_rate = 0
//! requirements = { monthly_sales = 5, team_members = 0 }
//! ```

use crate::ladder::TierLadder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tier_model::TierConfiguration;

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for these settings
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but are unusable
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Tier engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Minimum trimmed length of `reason` / `change_reason`
    pub min_reason_length: usize,
    /// Reset an agent's split override to the new tier's default on change
    pub apply_tier_split_on_change: bool,
    /// Automatic retries after a concurrency conflict
    pub conflict_retries: u32,
    /// Cap on configuration history page size
    pub max_history_limit: usize,
    /// Cap on agent listing page size
    pub max_page_size: usize,
    /// How long a resolved ladder is served from cache
    pub ladder_cache_ttl_secs: u64,
    /// Rows used to seed an empty store
    pub tiers: Vec<TierConfiguration>,
}

impl EngineSettings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With minimum reason length
    #[inline]
    #[must_use]
    pub fn with_min_reason_length(mut self, len: usize) -> Self {
        self.min_reason_length = len;
        self
    }

    /// With split reset policy
    #[inline]
    #[must_use]
    pub fn with_apply_tier_split(mut self, apply: bool) -> Self {
        self.apply_tier_split_on_change = apply;
        self
    }

    /// With conflict retry count
    #[inline]
    #[must_use]
    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = retries;
        self
    }

    /// With ladder cache TTL
    #[inline]
    #[must_use]
    pub fn with_ladder_cache_ttl(mut self, ttl: Duration) -> Self {
        self.ladder_cache_ttl_secs = ttl.as_secs();
        self
    }

    /// With seed rows
    #[must_use]
    pub fn with_tiers(mut self, tiers: Vec<TierConfiguration>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Ladder cache TTL
    #[inline]
    #[must_use]
    pub fn ladder_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.ladder_cache_ttl_secs)
    }

    /// Parse settings from TOML text and validate them
    ///
    /// # Errors
    /// Parse failures or invalid values.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file and validate them
    ///
    /// # Errors
    /// IO, parse, or validation failures.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Ladder the seed rows resolve to
    #[must_use]
    pub fn seed_ladder(&self) -> TierLadder {
        TierLadder::resolve(self.tiers.iter().cloned())
    }

    /// Check values
    ///
    /// # Errors
    /// Zero limits, or seed rows that break the ladder invariants.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_reason_length == 0 {
            return Err(SettingsError::Invalid(
                "min_reason_length must be at least 1".to_string(),
            ));
        }
        if self.max_history_limit == 0 || self.max_page_size == 0 {
            return Err(SettingsError::Invalid(
                "max_history_limit and max_page_size must be at least 1".to_string(),
            ));
        }

        let mut seen = [false; tier_model::AgentTier::COUNT];
        for row in &self.tiers {
            let idx = row.tier.index();
            if seen[idx] {
                return Err(SettingsError::Invalid(format!(
                    "tier {} is configured more than once",
                    row.tier
                )));
            }
            seen[idx] = true;
        }

        self.seed_ladder()
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_reason_length: 10,
            apply_tier_split_on_change: true,
            conflict_retries: 1,
            max_history_limit: 100,
            max_page_size: 100,
            ladder_cache_ttl_secs: 30,
            tiers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tier_model::AgentTier;

    #[test]
    fn empty_toml_is_defaults() {
        let settings = EngineSettings::from_toml_str("").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.min_reason_length, 10);
        assert!(settings.apply_tier_split_on_change);
    }

    #[test]
    fn seed_rows_parse() {
        let settings = EngineSettings::from_toml_str(
            r#"
            conflict_retries = 2

            [[tiers]]
            tier = "sales_leader"
            display_name = "Sales Leader"
            description = "Producer"
            commission_split = 72
            leadership_bonus_rate = 0
            requirements = { monthly_sales = 6, team_members = 0 }
            "#,
        )
        .unwrap();

        assert_eq!(settings.conflict_retries, 2);
        let ladder = settings.seed_ladder();
        assert_eq!(ladder.config(AgentTier::SalesLeader).commission_split, 72);
        assert!(!ladder.is_stored(AgentTier::Advisor));
    }

    #[test]
    fn non_monotonic_seed_is_rejected() {
        let err = EngineSettings::from_toml_str(
            r#"
            [[tiers]]
            tier = "supreme_leader"
            display_name = "Supreme Leader"
            description = "Top"
            commission_split = 50
            leadership_bonus_rate = 10
            requirements = { monthly_sales = 40, team_members = 25 }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn zero_reason_length_is_rejected() {
        let err = EngineSettings::from_toml_str("min_reason_length = 0").unwrap_err();
        assert!(err.to_string().contains("min_reason_length"));
    }

    #[test]
    fn unknown_tier_name_fails_to_parse() {
        let err = EngineSettings::from_toml_str(
            r#"
            [[tiers]]
            tier = "broker"
            display_name = "Broker"
            description = ""
            commission_split = 50
            leadership_bonus_rate = 0
            requirements = { monthly_sales = 0, team_members = 0 }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
