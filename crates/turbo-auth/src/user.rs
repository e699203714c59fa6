//! Roles and the acting user.

use crate::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use turbo_commerce::ids::UserId;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Buyer and seller.
    #[default]
    User,
    /// Marketplace administrator.
    Admin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(AuthError::UnknownRole(s.to_string())),
        }
    }
}

/// The logged-in user on whose behalf an operation runs.
///
/// Only used for client-side authorization checks. The backend derives the
/// real identity from the bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User ID.
    pub user_id: UserId,
    /// Role.
    #[serde(default)]
    pub role: Role,
}

impl Actor {
    /// Create an actor.
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// A regular user.
    pub fn user(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::User)
    }

    /// An administrator.
    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    /// Check if this actor is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check if this actor may change the status of an order sold by `seller`.
    pub fn can_manage_order(&self, seller: &UserId) -> bool {
        self.is_admin() || &self.user_id == seller
    }

    /// Like [`Actor::can_manage_order`], as a `Result`.
    pub fn authorize_order(&self, seller: &UserId) -> Result<(), AuthError> {
        if self.can_manage_order(seller) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}
