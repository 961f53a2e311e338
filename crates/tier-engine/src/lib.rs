//! Tier Engine - commission tier ladder and audited tier transitions
//!
//! Provides:
//! - The resolved [`TierLadder`] with monotonicity validation
//! - Advisory progress toward the next tier
//! - Commission split arithmetic
//! - Admin-only tier transitions and configuration edits, each committed
//!   atomically with a hash-chained audit row
//! - The [`TierStore`] persistence seam and an in-memory implementation
//!
//! # Example
//!
//! ```rust
//! use tier_engine::{calculate_progress, TierLadder};
//! use tier_model::{AgentTier, PerformanceMetrics};
//!
//! let ladder = TierLadder::defaults();
//! let progress = calculate_progress(&ladder, AgentTier::Advisor, PerformanceMetrics::new(5, 0));
//! let next = progress.as_next().unwrap();
//! assert_eq!(next.next, AgentTier::SalesLeader);
//! assert!(next.eligible);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod audit;
pub mod commission;
pub mod config_editor;
pub mod error;
pub mod ladder;
pub mod progress;
pub mod service;
pub mod settings;
pub mod store;
pub mod transition;
pub mod validation;

pub use audit::{AuditEntry, AuditLog};
pub use commission::{leadership_override, split_commission, CommissionBreakdown};
pub use config_editor::{ConfigChangeOutcome, TierConfigUpdate};
pub use error::{AuditError, NotFoundError, StoreError, TierError, ValidationError};
pub use ladder::TierLadder;
pub use progress::{calculate_progress, DimensionProgress, NextTierProgress, TierProgress};
pub use service::TierService;
pub use settings::{EngineSettings, SettingsError};
pub use store::{MemoryTierStore, TierStore};
pub use transition::{TierChangeOutcome, TierChangeRequest};

/// Result type for tier operations
pub type Result<T> = std::result::Result<T, TierError>;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        EngineSettings, MemoryTierStore, TierChangeRequest, TierConfigUpdate, TierError,
        TierLadder, TierProgress, TierService, TierStore,
    };
    pub use tier_model::{
        Agent, AgentId, AgentTier, Caller, PerformanceMetrics, Role, TierConfigPatch,
    };
}
