//! In-process [`TierStore`]
//!
//! All state sits behind one `RwLock`. A commit holds the write lock across
//! its revision check, history append and row update, which gives the same
//! all-or-nothing behaviour as a database transaction with a conditional
//! update.

use super::{ConfigCommit, TierChangeCommit, TierStore, TierTableSnapshot};
use crate::audit::AuditLog;
use crate::error::StoreError;
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tier_model::{
    default_table, Agent, AgentId, AgentTier, TierChangeHistory, TierConfigHistory,
    TierConfiguration,
};

#[derive(Debug, Default)]
struct StoreState {
    table: BTreeMap<AgentTier, TierConfiguration>,
    table_revision: u64,
    agents: IndexMap<AgentId, Agent>,
    tier_history: AuditLog<TierChangeHistory>,
    config_history: AuditLog<TierConfigHistory>,
}

/// Tier store kept in memory
#[derive(Debug, Default)]
pub struct MemoryTierStore {
    state: RwLock<StoreState>,
}

impl MemoryTierStore {
    /// Empty store: no configuration rows, no agents
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with configuration rows
    ///
    /// Seeding is not an audited edit and does not bump the table revision.
    #[must_use]
    pub fn with_table(rows: impl IntoIterator<Item = TierConfiguration>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.write();
            for row in rows {
                state.table.insert(row.tier, row);
            }
        }
        store
    }

    /// Store pre-loaded with the built-in ladder
    #[must_use]
    pub fn with_default_table() -> Self {
        Self::with_table(default_table())
    }

    /// Verify both audit chains
    ///
    /// # Errors
    /// Returns the first integrity violation found.
    pub fn verify_integrity(&self) -> Result<(), StoreError> {
        let state = self.state.read();
        state.tier_history.verify_integrity()?;
        state.config_history.verify_integrity()?;
        Ok(())
    }

    /// Total tier history rows across all agents
    #[must_use]
    pub fn tier_history_len(&self) -> usize {
        self.state.read().tier_history.len()
    }
}

#[async_trait]
impl TierStore for MemoryTierStore {
    async fn tier_table(&self) -> Result<TierTableSnapshot, StoreError> {
        let state = self.state.read();
        Ok(TierTableSnapshot {
            revision: state.table_revision,
            rows: state.table.values().cloned().collect(),
        })
    }

    async fn commit_config_change(
        &self,
        commit: ConfigCommit,
    ) -> Result<TierConfiguration, StoreError> {
        let mut state = self.state.write();
        if state.table_revision != commit.expected_revision {
            return Err(StoreError::config_conflict(
                commit.expected_revision,
                state.table_revision,
            ));
        }

        state.config_history.append(commit.history)?;
        state.table.insert(commit.row.tier, commit.row.clone());
        state.table_revision += 1;
        Ok(commit.row)
    }

    async fn config_history(&self, limit: usize) -> Result<Vec<TierConfigHistory>, StoreError> {
        let state = self.state.read();
        Ok(state
            .config_history
            .records()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn agent(&self, id: AgentId) -> Result<Option<Agent>, StoreError> {
        Ok(self.state.read().agents.get(&id).cloned())
    }

    async fn agents(&self, limit: usize, offset: usize) -> Result<Vec<Agent>, StoreError> {
        let state = self.state.read();
        Ok(state
            .agents
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_agent(&self, agent: Agent) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if state.agents.contains_key(&agent.id) {
            return Err(StoreError::DuplicateAgent(agent.id));
        }
        state.agents.insert(agent.id, agent);
        Ok(())
    }

    async fn commit_tier_change(&self, commit: TierChangeCommit) -> Result<Agent, StoreError> {
        let mut state = self.state.write();
        let current_revision = state
            .agents
            .get(&commit.agent_id)
            .map(|a| a.revision)
            .ok_or(StoreError::AgentNotFound(commit.agent_id))?;
        if current_revision != commit.expected_revision {
            return Err(StoreError::agent_conflict(
                commit.agent_id,
                commit.expected_revision,
                current_revision,
            ));
        }
        if let Some(expected) = commit.expected_table_revision {
            if state.table_revision != expected {
                return Err(StoreError::config_conflict(expected, state.table_revision));
            }
        }

        // History first: it is the only fallible step, so a failure leaves the
        // agent row untouched.
        state.tier_history.append(commit.history)?;

        let agent = state
            .agents
            .get_mut(&commit.agent_id)
            .ok_or(StoreError::AgentNotFound(commit.agent_id))?;
        agent.agent_tier = Some(commit.new_tier);
        if let Some(split) = commit.commission_split {
            agent.company_commission_split = Some(split);
        }
        agent.revision += 1;
        Ok(agent.clone())
    }

    async fn agent_tier_history(
        &self,
        id: AgentId,
    ) -> Result<Vec<TierChangeHistory>, StoreError> {
        let state = self.state.read();
        Ok(state
            .tier_history
            .records()
            .rev()
            .filter(|h| h.agent_id == id)
            .cloned()
            .collect())
    }
}
