//! Testing utilities for the tier workspace
//!
//! Shared fixtures: callers, seeded services, a store wrapper that injects
//! revision conflicts, and one that pauses a configuration read.

#![allow(missing_docs)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tier_engine::store::{ConfigCommit, TierChangeCommit, TierTableSnapshot};
use tier_engine::{EngineSettings, MemoryTierStore, StoreError, TierService, TierStore};
use tier_model::{
    Agent, AgentId, AgentTier, Caller, PerformanceMetrics, Role, TierChangeHistory,
    TierConfigHistory, TierConfiguration,
};
use tokio::sync::Notify;

pub const REASON: &str = "quarterly performance review";

pub fn admin_caller() -> Caller {
    Caller::admin("admin-1")
}

pub fn staff_caller() -> Caller {
    Caller::new("staff-1", Role::Staff)
}

pub fn agent_caller() -> Caller {
    Caller::new("agent-1", Role::Agent)
}

pub fn metrics(monthly_sales: i64, team_members: i64) -> PerformanceMetrics {
    PerformanceMetrics::new(monthly_sales, team_members)
}

pub fn agent_at(name: &str, tier: AgentTier) -> Agent {
    Agent::new(name).with_tier(tier)
}

/// Service over a store pre-loaded with the built-in ladder
pub fn seeded_service() -> TierService<MemoryTierStore> {
    seeded_service_with(EngineSettings::default())
}

pub fn seeded_service_with(settings: EngineSettings) -> TierService<MemoryTierStore> {
    TierService::new(Arc::new(MemoryTierStore::with_default_table()), settings)
}

/// Service over a store with no configuration rows at all
pub fn empty_service() -> TierService<MemoryTierStore> {
    TierService::new(Arc::new(MemoryTierStore::new()), EngineSettings::default())
}

/// Register an agent and return its ID
pub async fn register<S: TierStore>(service: &TierService<S>, agent: Agent) -> AgentId {
    let id = agent.id;
    service
        .register_agent(agent)
        .await
        .expect("register test agent");
    id
}

/// Store wrapper whose next `n` commits fail with a revision conflict
#[derive(Debug, Default)]
pub struct ConflictingStore {
    inner: MemoryTierStore,
    remaining: AtomicU32,
}

impl ConflictingStore {
    pub fn new(inner: MemoryTierStore, conflicts: u32) -> Self {
        Self {
            inner,
            remaining: AtomicU32::new(conflicts),
        }
    }

    pub fn inner(&self) -> &MemoryTierStore {
        &self.inner
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::SeqCst)
    }

    fn take_conflict(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl TierStore for ConflictingStore {
    async fn tier_table(&self) -> Result<TierTableSnapshot, StoreError> {
        self.inner.tier_table().await
    }

    async fn commit_config_change(
        &self,
        commit: ConfigCommit,
    ) -> Result<TierConfiguration, StoreError> {
        if self.take_conflict() {
            return Err(StoreError::config_conflict(
                commit.expected_revision,
                commit.expected_revision + 1,
            ));
        }
        self.inner.commit_config_change(commit).await
    }

    async fn config_history(&self, limit: usize) -> Result<Vec<TierConfigHistory>, StoreError> {
        self.inner.config_history(limit).await
    }

    async fn agent(&self, id: AgentId) -> Result<Option<Agent>, StoreError> {
        self.inner.agent(id).await
    }

    async fn agents(&self, limit: usize, offset: usize) -> Result<Vec<Agent>, StoreError> {
        self.inner.agents(limit, offset).await
    }

    async fn insert_agent(&self, agent: Agent) -> Result<(), StoreError> {
        self.inner.insert_agent(agent).await
    }

    async fn commit_tier_change(&self, commit: TierChangeCommit) -> Result<Agent, StoreError> {
        if self.take_conflict() {
            return Err(StoreError::agent_conflict(
                commit.agent_id,
                commit.expected_revision,
                commit.expected_revision + 1,
            ));
        }
        self.inner.commit_tier_change(commit).await
    }

    async fn agent_tier_history(
        &self,
        id: AgentId,
    ) -> Result<Vec<TierChangeHistory>, StoreError> {
        self.inner.agent_tier_history(id).await
    }
}

/// Store wrapper that can hold one `tier_table` call after its snapshot is
/// taken, until released
#[derive(Debug, Default)]
pub struct GatedStore {
    inner: MemoryTierStore,
    armed: AtomicBool,
    reached: Notify,
    released: Notify,
}

impl GatedStore {
    pub fn new(inner: MemoryTierStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn inner(&self) -> &MemoryTierStore {
        &self.inner
    }

    /// Hold the next `tier_table` call
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Wait until the held call has taken its snapshot
    pub async fn wait_held(&self) {
        self.reached.notified().await;
    }

    /// Let the held call return its snapshot
    pub fn release(&self) {
        self.released.notify_one();
    }
}

#[async_trait]
impl TierStore for GatedStore {
    async fn tier_table(&self) -> Result<TierTableSnapshot, StoreError> {
        let snapshot = self.inner.tier_table().await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.reached.notify_one();
            self.released.notified().await;
        }
        Ok(snapshot)
    }

    async fn commit_config_change(
        &self,
        commit: ConfigCommit,
    ) -> Result<TierConfiguration, StoreError> {
        self.inner.commit_config_change(commit).await
    }

    async fn config_history(&self, limit: usize) -> Result<Vec<TierConfigHistory>, StoreError> {
        self.inner.config_history(limit).await
    }

    async fn agent(&self, id: AgentId) -> Result<Option<Agent>, StoreError> {
        self.inner.agent(id).await
    }

    async fn agents(&self, limit: usize, offset: usize) -> Result<Vec<Agent>, StoreError> {
        self.inner.agents(limit, offset).await
    }

    async fn insert_agent(&self, agent: Agent) -> Result<(), StoreError> {
        self.inner.insert_agent(agent).await
    }

    async fn commit_tier_change(&self, commit: TierChangeCommit) -> Result<Agent, StoreError> {
        self.inner.commit_tier_change(commit).await
    }

    async fn agent_tier_history(
        &self,
        id: AgentId,
    ) -> Result<Vec<TierChangeHistory>, StoreError> {
        self.inner.agent_tier_history(id).await
    }
}
