//! Global tier configuration editor
//!
//! Applies a partial edit to one tier's row and appends a
//! [`TierConfigHistory`] entry in the same commit. Edits that would break the
//! ladder invariants are rejected, not warned about.

use crate::error::TierError;
use crate::ladder::TierLadder;
use crate::settings::EngineSettings;
use crate::store::{ConfigCommit, TierStore, TierTableSnapshot};
use crate::validation::{check_patch, check_reason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tier_model::{
    ActorId, AgentTier, ConfigChangeType, ConfigField, FieldChange, HistoryId,
    TierConfigHistory, TierConfigPatch, TierConfiguration, ValidatedPatch,
};

/// Admin edit of one tier's configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfigUpdate {
    /// Tier to edit
    pub tier: AgentTier,
    /// Fields to change
    pub patch: TierConfigPatch,
    /// Justification recorded in the audit trail
    pub change_reason: String,
}

impl TierConfigUpdate {
    /// Create update
    #[must_use]
    pub fn new(tier: AgentTier, patch: TierConfigPatch, change_reason: impl Into<String>) -> Self {
        Self {
            tier,
            patch,
            change_reason: change_reason.into(),
        }
    }
}

/// Result of an accepted configuration edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigChangeOutcome {
    /// Row after the edit
    pub config: TierConfiguration,
    /// Audit row written
    pub history: TierConfigHistory,
}

/// Build the commit for a configuration edit without touching any store
///
/// # Errors
/// `Validation` when the edit changes nothing on an existing row or breaks
/// the ladder invariants.
pub fn plan_config_change(
    snapshot: &TierTableSnapshot,
    tier: AgentTier,
    patch: &ValidatedPatch,
    change_reason: String,
    actor: &ActorId,
    now: DateTime<Utc>,
) -> Result<ConfigCommit, TierError> {
    let stored = snapshot.rows.iter().find(|row| row.tier == tier).cloned();
    let change_type = if stored.is_some() {
        ConfigChangeType::Update
    } else {
        ConfigChangeType::Create
    };
    let before = stored.unwrap_or_else(|| TierConfiguration::default_for(tier));

    let mut after = before.clone();
    let touched = after.apply(patch);

    let changes: Vec<FieldChange> = match change_type {
        ConfigChangeType::Update => {
            if touched.is_empty() {
                return Err(TierError::validation(
                    "patch",
                    format!("no changes to {tier} configuration"),
                ));
            }
            touched
                .into_iter()
                .map(|field| FieldChange {
                    field,
                    previous: Some(before.field_value(field)),
                    new: after.field_value(field),
                })
                .collect()
        }
        ConfigChangeType::Create => ConfigField::ALL
            .into_iter()
            .map(|field| FieldChange {
                field,
                previous: None,
                new: after.field_value(field),
            })
            .collect(),
    };

    TierLadder::resolve(snapshot.rows.iter().cloned())
        .with_row(after.clone())
        .validate()?;

    Ok(ConfigCommit {
        expected_revision: snapshot.revision,
        row: after,
        history: TierConfigHistory {
            id: HistoryId::new(),
            tier,
            change_type,
            changes,
            change_reason,
            changed_by: actor.clone(),
            timestamp: now,
        },
    })
}

/// Validate, plan and commit one configuration edit
///
/// Range checks run before the store is read.
///
/// # Errors
/// `Validation` for a short reason, out-of-range percentages, a no-op
/// update or an invariant violation; `ConcurrencyConflict` if the table
/// changed underneath.
pub async fn execute_config_change<S>(
    store: &S,
    settings: &EngineSettings,
    actor: &ActorId,
    update: &TierConfigUpdate,
) -> Result<ConfigChangeOutcome, TierError>
where
    S: TierStore + ?Sized,
{
    let patch = check_patch(&update.patch)?;
    let reason = check_reason(
        "change_reason",
        &update.change_reason,
        settings.min_reason_length,
    )?;

    let snapshot = store.tier_table().await?;
    let commit = plan_config_change(&snapshot, update.tier, &patch, reason, actor, Utc::now())?;
    let history = commit.history.clone();

    let config = store.commit_config_change(commit).await?;

    tracing::info!(
        tier = %config.tier,
        change_type = ?history.change_type,
        fields = history.changes.len(),
        changed_by = %actor,
        "tier configuration committed"
    );

    Ok(ConfigChangeOutcome { config, history })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tier_model::default_table;

    fn full_snapshot() -> TierTableSnapshot {
        TierTableSnapshot {
            revision: 3,
            rows: default_table(),
        }
    }

    fn plan(snapshot: &TierTableSnapshot, tier: AgentTier, patch: ValidatedPatch) -> Result<ConfigCommit, TierError> {
        plan_config_change(
            snapshot,
            tier,
            &patch,
            "annual commission review".to_string(),
            &ActorId::new("admin-1"),
            Utc::now(),
        )
    }

    #[test]
    fn update_records_only_changed_fields() {
        let patch = ValidatedPatch {
            commission_split: Some(76),
            description: Some(TierConfiguration::default_for(AgentTier::TeamLeader).description),
            ..ValidatedPatch::default()
        };
        let commit = plan(&full_snapshot(), AgentTier::TeamLeader, patch).unwrap();

        assert_eq!(commit.expected_revision, 3);
        assert_eq!(commit.history.change_type, ConfigChangeType::Update);
        assert_eq!(commit.history.changes.len(), 1);
        let change = &commit.history.changes[0];
        assert_eq!(change.field, ConfigField::CommissionSplit);
        assert_eq!(change.previous, Some(serde_json::json!(75)));
        assert_eq!(change.new, serde_json::json!(76));
    }

    #[test]
    fn missing_row_is_created_from_defaults() {
        let snapshot = TierTableSnapshot {
            revision: 0,
            rows: Vec::new(),
        };
        let patch = ValidatedPatch {
            leadership_bonus_rate: Some(6),
            ..ValidatedPatch::default()
        };
        let commit = plan(&snapshot, AgentTier::TeamLeader, patch).unwrap();

        assert_eq!(commit.history.change_type, ConfigChangeType::Create);
        assert_eq!(commit.history.changes.len(), ConfigField::ALL.len());
        assert!(commit.history.changes.iter().all(|c| c.previous.is_none()));
        assert_eq!(commit.row.leadership_bonus_rate, 6);
    }

    #[test]
    fn noop_update_is_rejected() {
        let err = plan(&full_snapshot(), AgentTier::Advisor, ValidatedPatch::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn split_above_higher_tier_is_rejected() {
        let patch = ValidatedPatch {
            commission_split: Some(90),
            ..ValidatedPatch::default()
        };
        let err = plan(&full_snapshot(), AgentTier::TeamLeader, patch).unwrap_err();
        match err {
            TierError::Validation(v) => assert_eq!(v.field, "commission_split"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
