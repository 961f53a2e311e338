//! Caller identity handed down by the external authorization layer

use serde::{Deserialize, Serialize};

/// Identity of whoever performed an action (admin user ID, service name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    /// Create actor ID
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role resolved by the authorization layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Back-office administrator
    Admin,
    /// Office staff without configuration rights
    Staff,
    /// Sales agent
    Agent,
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Who is calling
    pub actor: ActorId,
    /// What they are allowed to do
    pub role: Role,
}

impl Caller {
    /// Create caller
    #[must_use]
    pub fn new(actor: impl Into<String>, role: Role) -> Self {
        Self {
            actor: ActorId::new(actor),
            role,
        }
    }

    /// Admin caller
    #[must_use]
    pub fn admin(actor: impl Into<String>) -> Self {
        Self::new(actor, Role::Admin)
    }

    /// Whether the caller may change tiers and configuration
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
