//! Promotion/demotion transition
//!
//! The single state-changing operation on an agent's tier. A change is
//! planned purely from the agent row read at revision `r`, then committed
//! conditionally on `r`. If another admin committed in between, the store
//! rejects the commit and nothing is written, so two history rows can never
//! claim the same stale previous tier. When the change resets the agent's
//! split, the commit is also conditional on the configuration table revision
//! the split was read at.
//!
//! Transitions are not restricted to adjacent tiers: this is a manual
//! override, not an automatic progression.

use crate::error::{NotFoundError, TierError};
use crate::ladder::TierLadder;
use crate::settings::EngineSettings;
use crate::store::{TierChangeCommit, TierStore, TierTableSnapshot};
use crate::validation::check_reason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tier_model::{
    ActorId, Agent, AgentId, AgentTier, HistoryId, PerformanceMetrics, TierChangeHistory,
    TierDirection,
};

/// Admin request to move an agent to a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierChangeRequest {
    /// Agent to change
    pub agent_id: AgentId,
    /// Target tier
    pub new_tier: AgentTier,
    /// Justification recorded in the audit trail
    pub reason: String,
    /// Metrics to snapshot into the audit trail
    #[serde(default)]
    pub performance_metrics: Option<PerformanceMetrics>,
}

impl TierChangeRequest {
    /// Create request
    #[must_use]
    pub fn new(agent_id: AgentId, new_tier: AgentTier, reason: impl Into<String>) -> Self {
        Self {
            agent_id,
            new_tier,
            reason: reason.into(),
            performance_metrics: None,
        }
    }

    /// With a metrics snapshot
    #[must_use]
    pub fn with_metrics(mut self, metrics: PerformanceMetrics) -> Self {
        self.performance_metrics = Some(metrics);
        self
    }
}

/// Result of an accepted tier change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierChangeOutcome {
    /// Agent after the change
    pub agent: Agent,
    /// Audit row written
    pub history: TierChangeHistory,
    /// Derived direction, for notifications
    pub direction: TierDirection,
}

impl TierChangeOutcome {
    /// Moved up
    #[inline]
    #[must_use]
    pub fn is_promotion(&self) -> bool {
        self.direction.is_promotion()
    }

    /// Moved down
    #[inline]
    #[must_use]
    pub fn is_demotion(&self) -> bool {
        self.direction.is_demotion()
    }
}

/// Build the commit for a tier change without touching any store
///
/// `table` is the configuration snapshot the new split is read from.
/// `reason` must already be validated.
///
/// # Errors
/// `Validation` when the agent already holds `new_tier`.
pub fn plan_tier_change(
    agent: &Agent,
    table: &TierTableSnapshot,
    request: &TierChangeRequest,
    reason: String,
    actor: &ActorId,
    settings: &EngineSettings,
    now: DateTime<Utc>,
) -> Result<(TierChangeCommit, TierDirection), TierError> {
    let previous_tier = agent.agent_tier;
    let direction = TierDirection::classify(previous_tier, request.new_tier).ok_or_else(|| {
        TierError::validation(
            "new_tier",
            format!("agent {} is already {}", agent.id, request.new_tier),
        )
    })?;

    let commission_split = settings.apply_tier_split_on_change.then(|| {
        TierLadder::resolve(table.rows.iter().cloned())
            .config(request.new_tier)
            .commission_split
    });

    let history = TierChangeHistory {
        id: HistoryId::new(),
        agent_id: agent.id,
        previous_tier,
        new_tier: request.new_tier,
        reason,
        effective_date: now,
        promoted_by: actor.clone(),
        performance_metrics: request.performance_metrics.map(PerformanceMetrics::clamped),
    };

    Ok((
        TierChangeCommit {
            agent_id: agent.id,
            expected_revision: agent.revision,
            new_tier: request.new_tier,
            commission_split,
            expected_table_revision: commission_split.map(|_| table.revision),
            history,
        },
        direction,
    ))
}

/// Read, plan and commit one tier change
///
/// Authorization is the caller's concern and must be checked first.
///
/// # Errors
/// `Validation` for a short reason or a same-tier change, `NotFound` for an
/// unknown agent, `ConcurrencyConflict` if the agent or the split it would
/// receive changed underneath.
pub async fn execute_tier_change<S>(
    store: &S,
    settings: &EngineSettings,
    actor: &ActorId,
    request: &TierChangeRequest,
) -> Result<TierChangeOutcome, TierError>
where
    S: TierStore + ?Sized,
{
    let reason = check_reason("reason", &request.reason, settings.min_reason_length)?;

    let agent = store
        .agent(request.agent_id)
        .await?
        .ok_or(NotFoundError::Agent(request.agent_id))?;
    let table = store.tier_table().await?;

    let (commit, direction) =
        plan_tier_change(&agent, &table, request, reason, actor, settings, Utc::now())?;
    let history = commit.history.clone();

    let agent = store.commit_tier_change(commit).await?;

    tracing::info!(
        agent_id = %agent.id,
        previous_tier = ?history.previous_tier,
        new_tier = %history.new_tier,
        direction = ?direction,
        promoted_by = %actor,
        "tier change committed"
    );

    Ok(TierChangeOutcome {
        agent,
        history,
        direction,
    })
}
