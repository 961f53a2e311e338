//! Tier Model - domain types for brokerage agent tiers
//!
//! Defines:
//! - The ordered [`AgentTier`] ladder
//! - Per-tier commission configuration and partial edits
//! - Agent records and performance metrics
//! - Append-only audit records for tier and configuration changes
//!
//! # Example
//!
//! ```rust
//! use tier_model::{AgentTier, TierDirection};
//!
//! assert_eq!(AgentTier::Advisor.next(), Some(AgentTier::SalesLeader));
//! assert_eq!(AgentTier::SupremeLeader.next(), None);
//!
//! let direction = TierDirection::classify(Some(AgentTier::Advisor), AgentTier::TeamLeader);
//! assert_eq!(direction, Some(TierDirection::Promotion));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod agent;
pub mod caller;
pub mod config;
pub mod history;
pub mod metrics;
pub mod tier;

pub use agent::{effective_tier, Agent, AgentId, AgentTierSummary};
pub use caller::{ActorId, Caller, Role};
pub use config::{
    default_table, ConfigField, TierConfigPatch, TierConfiguration, TierRequirements,
    ValidatedPatch,
};
pub use history::{
    ConfigChangeType, FieldChange, HistoryId, TierChangeHistory, TierConfigHistory,
};
pub use metrics::PerformanceMetrics;
pub use tier::{AgentTier, ParseTierError, TierDirection, DEFAULT_TIER};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
