//! Error types for the tier engine
//!
//! Every error here is terminal for the request that raised it: nothing is
//! partially applied and no audit row is written on any failure path.

use tier_model::{ActorId, AgentId};

/// Main tier engine error type
#[derive(Debug, thiserror::Error)]
pub enum TierError {
    /// Input rejected before any write
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Caller lacks the admin role
    #[error("{actor} is not authorized to {operation}")]
    Unauthorized {
        /// Who tried
        actor: ActorId,
        /// What they tried
        operation: &'static str,
    },

    /// Referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Another writer committed first; the caller may retry
    #[error("concurrent modification of {entity}, please retry")]
    ConcurrencyConflict {
        /// Entity whose revision moved
        entity: String,
    },

    /// Persistence backend failure
    #[error("store error: {0}")]
    Store(StoreError),
}

impl TierError {
    /// Create a field-level validation error
    #[inline]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(field, message))
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }

    /// Check if error is a validation rejection
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<StoreError> for TierError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AgentNotFound(id) => Self::NotFound(NotFoundError::Agent(id)),
            StoreError::RevisionConflict { entity, .. } => Self::ConcurrencyConflict { entity },
            other => Self::Store(other),
        }
    }
}

/// Field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Offending input field
    pub field: &'static str,
    /// Human-readable reason
    pub message: String,
}

impl ValidationError {
    /// Create validation error
    #[inline]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Unknown entity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    /// Unknown agent
    #[error("agent {0}")]
    Agent(AgentId),
}

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Agent row missing
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Agent already registered
    #[error("agent already exists: {0}")]
    DuplicateAgent(AgentId),

    /// Optimistic revision check failed
    #[error("revision conflict on {entity}: expected {expected}, found {actual}")]
    RevisionConflict {
        /// Entity whose revision moved
        entity: String,
        /// Revision the writer read
        expected: u64,
        /// Revision currently stored
        actual: u64,
    },

    /// Audit chain could not be extended or failed verification
    #[error("audit log error: {0}")]
    Audit(#[from] AuditError),

    /// Backend-specific failure
    #[error("backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Revision conflict on an agent row
    #[must_use]
    pub fn agent_conflict(id: AgentId, expected: u64, actual: u64) -> Self {
        Self::RevisionConflict {
            entity: format!("agent {id}"),
            expected,
            actual,
        }
    }

    /// Revision conflict on the configuration table
    #[must_use]
    pub fn config_conflict(expected: u64, actual: u64) -> Self {
        Self::RevisionConflict {
            entity: "tier configuration table".to_string(),
            expected,
            actual,
        }
    }
}

/// Audit chain errors
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Record could not be serialized for hashing
    #[error("failed to encode audit record: {0}")]
    Encode(#[from] serde_json::Error),

    /// Chain hashes do not line up
    #[error("integrity violation at entry {sequence}")]
    IntegrityViolation {
        /// Position of the first bad entry
        sequence: u64,
    },
}
