//! Tier service facade
//!
//! [`TierService`] is the boundary the surrounding platform calls. It checks
//! authorization before touching the store, retries concurrency conflicts a
//! bounded number of times, and serves the resolved ladder from a cache that
//! is invalidated after every configuration commit.
//!
//! A configuration commit bumps the ladder generation before invalidating.
//! A reader that loaded the table under an older generation drops what it
//! cached, so a ladder read before a commit never outlives it.

use crate::commission::{split_commission, CommissionBreakdown};
use crate::config_editor::{execute_config_change, ConfigChangeOutcome, TierConfigUpdate};
use crate::error::{NotFoundError, TierError};
use crate::ladder::TierLadder;
use crate::progress::{calculate_progress, TierProgress};
use crate::settings::EngineSettings;
use crate::store::TierStore;
use crate::transition::{execute_tier_change, TierChangeOutcome, TierChangeRequest};
use crate::validation::check_percent;
use moka::future::Cache;
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tier_model::{
    Agent, AgentId, AgentTierSummary, Caller, PerformanceMetrics, TierChangeHistory,
    TierConfigHistory, TierConfiguration,
};

/// Async tier operations over a [`TierStore`]
pub struct TierService<S> {
    store: Arc<S>,
    settings: EngineSettings,
    ladder_cache: Cache<(), Arc<TierLadder>>,
    ladder_generation: AtomicU64,
}

impl<S> std::fmt::Debug for TierService<S>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TierService")
            .field("store", &self.store)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<S: TierStore> TierService<S> {
    /// Create service
    pub fn new(store: Arc<S>, settings: EngineSettings) -> Self {
        let ladder_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(settings.ladder_cache_ttl())
            .build();
        Self {
            store,
            settings,
            ladder_cache,
            ladder_generation: AtomicU64::new(0),
        }
    }

    /// Backing store
    #[inline]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Active settings
    #[inline]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Resolved ladder, served from cache
    ///
    /// # Errors
    /// Store failures.
    pub async fn ladder(&self) -> Result<Arc<TierLadder>, TierError> {
        if let Some(ladder) = self.ladder_cache.get(&()).await {
            return Ok(ladder);
        }
        let generation = self.ladder_generation.load(Ordering::Acquire);
        let snapshot = self.store.tier_table().await?;
        let ladder = Arc::new(TierLadder::resolve(snapshot.rows));

        self.ladder_cache.insert((), Arc::clone(&ladder)).await;
        if self.ladder_generation.load(Ordering::Acquire) != generation {
            // A configuration commit raced this read.
            self.ladder_cache.invalidate_all();
        }
        tracing::debug!(revision = snapshot.revision, "tier ladder loaded from store");
        Ok(ladder)
    }

    /// One configuration per tier, in ladder order
    ///
    /// # Errors
    /// Store failures.
    pub async fn get_tier_configurations(&self) -> Result<Vec<TierConfiguration>, TierError> {
        Ok(self.ladder().await?.to_vec())
    }

    /// Configuration audit rows, newest first
    ///
    /// `limit` is capped at `max_history_limit`.
    ///
    /// # Errors
    /// Store failures.
    pub async fn get_tier_config_history(
        &self,
        limit: usize,
    ) -> Result<Vec<TierConfigHistory>, TierError> {
        let limit = limit.min(self.settings.max_history_limit);
        tracing::debug!(limit, "reading tier configuration history");
        Ok(self.store.config_history(limit).await?)
    }

    /// Edit one tier's configuration (admin only)
    ///
    /// # Errors
    /// `Unauthorized`, `Validation`, or `ConcurrencyConflict` once retries
    /// are exhausted.
    pub async fn update_tier_configuration(
        &self,
        caller: &Caller,
        update: TierConfigUpdate,
    ) -> Result<ConfigChangeOutcome, TierError> {
        self.require_admin(caller, "update tier configuration")?;

        let store = self.store.as_ref();
        let settings = &self.settings;
        let actor = &caller.actor;
        let update = &update;
        let outcome = self
            .retry_on_conflict("update_tier_configuration", move || {
                execute_config_change(store, settings, actor, update)
            })
            .await?;

        self.ladder_generation.fetch_add(1, Ordering::AcqRel);
        self.ladder_cache.invalidate_all();
        Ok(outcome)
    }

    /// Move an agent to a tier (admin only)
    ///
    /// # Errors
    /// `Unauthorized`, `Validation`, `NotFound`, or `ConcurrencyConflict`
    /// once retries are exhausted.
    pub async fn promote_agent(
        &self,
        caller: &Caller,
        request: TierChangeRequest,
    ) -> Result<TierChangeOutcome, TierError> {
        self.require_admin(caller, "change agent tiers")?;

        let store = self.store.as_ref();
        let settings = &self.settings;
        let actor = &caller.actor;
        let request = &request;
        self.retry_on_conflict("promote_agent", move || {
            execute_tier_change(store, settings, actor, request)
        })
        .await
    }

    /// Tier history of one agent, newest first
    ///
    /// # Errors
    /// `NotFound` for an unknown agent.
    pub async fn get_agent_tier_history(
        &self,
        agent_id: AgentId,
    ) -> Result<Vec<TierChangeHistory>, TierError> {
        self.agent(agent_id).await?;
        Ok(self.store.agent_tier_history(agent_id).await?)
    }

    /// Page of agents with effective tier and split
    ///
    /// `limit` is capped at `max_page_size`.
    ///
    /// # Errors
    /// Store failures.
    pub async fn get_all_agents_with_tiers(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AgentTierSummary>, TierError> {
        let limit = limit.min(self.settings.max_page_size);
        let ladder = self.ladder().await?;
        let agents = self.store.agents(limit, offset).await?;
        tracing::debug!(limit, offset, returned = agents.len(), "listing agents");

        Ok(agents
            .into_iter()
            .map(|agent| AgentTierSummary {
                tier: agent.effective_tier(),
                commission_split: ladder.effective_commission_split(&agent),
                agent,
            })
            .collect())
    }

    /// Advisory progress of an agent toward the next tier
    ///
    /// # Errors
    /// `NotFound` for an unknown agent.
    pub async fn get_agent_progress(
        &self,
        agent_id: AgentId,
        metrics: PerformanceMetrics,
    ) -> Result<TierProgress, TierError> {
        let agent = self.agent(agent_id).await?;
        let ladder = self.ladder().await?;
        Ok(calculate_progress(&ladder, agent.effective_tier(), metrics))
    }

    /// Split a gross commission with the agent's effective split
    ///
    /// # Errors
    /// `NotFound` for an unknown agent, `Validation` for a negative amount.
    pub async fn preview_commission(
        &self,
        agent_id: AgentId,
        gross: Decimal,
    ) -> Result<CommissionBreakdown, TierError> {
        let agent = self.agent(agent_id).await?;
        let ladder = self.ladder().await?;
        Ok(split_commission(
            gross,
            ladder.effective_commission_split(&agent),
        )?)
    }

    /// Add an agent to the store
    ///
    /// # Errors
    /// `Validation` for a split override above 100%, `Store` for a
    /// duplicate ID.
    pub async fn register_agent(&self, agent: Agent) -> Result<Agent, TierError> {
        if let Some(split) = agent.company_commission_split {
            check_percent("company_commission_split", i64::from(split))?;
        }
        self.store.insert_agent(agent.clone()).await?;
        tracing::info!(agent_id = %agent.id, tier = ?agent.agent_tier, "agent registered");
        Ok(agent)
    }

    async fn agent(&self, agent_id: AgentId) -> Result<Agent, TierError> {
        self.store
            .agent(agent_id)
            .await?
            .ok_or_else(|| NotFoundError::Agent(agent_id).into())
    }

    fn require_admin(&self, caller: &Caller, operation: &'static str) -> Result<(), TierError> {
        if caller.is_admin() {
            return Ok(());
        }
        tracing::warn!(
            actor = %caller.actor,
            role = ?caller.role,
            operation,
            "rejected non-admin caller"
        );
        Err(TierError::Unauthorized {
            actor: caller.actor.clone(),
            operation,
        })
    }

    async fn retry_on_conflict<T, F, Fut>(
        &self,
        operation: &'static str,
        mut attempt: F,
    ) -> Result<T, TierError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TierError>>,
    {
        let mut retries = 0;
        loop {
            match attempt().await {
                Err(err) if err.is_retryable() && retries < self.settings.conflict_retries => {
                    retries += 1;
                    tracing::warn!(operation, retry = retries, error = %err, "retrying after concurrency conflict");
                }
                result => return result,
            }
        }
    }
}
