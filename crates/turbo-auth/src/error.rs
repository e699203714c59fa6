//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credentials are held; the user has to log in.
    #[error("not logged in")]
    NotLoggedIn,

    /// The session can no longer be renewed.
    #[error("session expired")]
    SessionExpired,

    /// Renewal was attempted and failed.
    #[error("token renewal failed: {0}")]
    RenewalFailed(String),

    /// Insufficient permissions.
    #[error("insufficient permissions")]
    InsufficientPermissions,

    /// Unrecognised role name.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::NotLoggedIn | AuthError::SessionExpired | AuthError::RenewalFailed(_)
        )
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AuthError::InsufficientPermissions)
    }
}
