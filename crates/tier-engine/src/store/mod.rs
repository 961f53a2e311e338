//! Persistence seam for the tier engine
//!
//! [`TierStore`] is the only way the engine touches persisted state. Each
//! commit method is a single atomic unit: the conditional revision check, the
//! state update and the history append either all happen or none do.
//!
//! History is append-only: the trait has no method that updates
//! or deletes a history row.

mod memory;

pub use memory::MemoryTierStore;

use crate::error::StoreError;
use async_trait::async_trait;
use tier_model::{
    Agent, AgentId, AgentTier, TierChangeHistory, TierConfigHistory, TierConfiguration,
};

/// Stored configuration rows plus the table revision they were read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTableSnapshot {
    /// Table revision, bumped by every configuration commit
    pub revision: u64,
    /// Stored rows (tiers without a row are absent)
    pub rows: Vec<TierConfiguration>,
}

/// Configuration upsert with its audit row
#[derive(Debug, Clone)]
pub struct ConfigCommit {
    /// Table revision the edit was planned against
    pub expected_revision: u64,
    /// Row to store
    pub row: TierConfiguration,
    /// Audit row describing the edit
    pub history: TierConfigHistory,
}

/// Agent tier change with its audit row
#[derive(Debug, Clone)]
pub struct TierChangeCommit {
    /// Agent to update
    pub agent_id: AgentId,
    /// Agent revision the change was planned against
    pub expected_revision: u64,
    /// Tier to assign
    pub new_tier: AgentTier,
    /// New split override, if the policy resets it
    pub commission_split: Option<u8>,
    /// Table revision the split was read at; checked when a split is set
    pub expected_table_revision: Option<u64>,
    /// Audit row describing the change
    pub history: TierChangeHistory,
}

/// Persistence backend
#[async_trait]
pub trait TierStore: Send + Sync + std::fmt::Debug {
    /// Stored configuration rows
    async fn tier_table(&self) -> Result<TierTableSnapshot, StoreError>;

    /// Upsert a configuration row and append its audit row
    ///
    /// # Errors
    /// `RevisionConflict` if the table moved since `expected_revision`.
    async fn commit_config_change(&self, commit: ConfigCommit)
        -> Result<TierConfiguration, StoreError>;

    /// Configuration audit rows, newest first
    async fn config_history(&self, limit: usize) -> Result<Vec<TierConfigHistory>, StoreError>;

    /// Agent by ID
    async fn agent(&self, id: AgentId) -> Result<Option<Agent>, StoreError>;

    /// Agents in registration order
    async fn agents(&self, limit: usize, offset: usize) -> Result<Vec<Agent>, StoreError>;

    /// Register an agent
    ///
    /// # Errors
    /// `DuplicateAgent` if the ID is taken.
    async fn insert_agent(&self, agent: Agent) -> Result<(), StoreError>;

    /// Change an agent's tier and append its audit row
    ///
    /// # Errors
    /// `AgentNotFound`, or `RevisionConflict` if the agent moved since
    /// `expected_revision` or the table moved since `expected_table_revision`.
    async fn commit_tier_change(&self, commit: TierChangeCommit) -> Result<Agent, StoreError>;

    /// Tier history of one agent, newest first
    async fn agent_tier_history(&self, id: AgentId)
        -> Result<Vec<TierChangeHistory>, StoreError>;
}
