//! Bearer credentials and the provider that hands them out.

use crate::AuthError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// A bearer access token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl From<&str> for AccessToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccessToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Access token plus the refresh token used to renew it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_token: AccessToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Credentials without a refresh token. They cannot be renewed.
    pub fn access_only(access_token: impl Into<AccessToken>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Credentials with a refresh token.
    pub fn new(access_token: impl Into<AccessToken>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: Some(refresh_token.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Source of the bearer credential attached to every backend request.
///
/// Implementations must be safe to call concurrently. Serializing renewals
/// is the caller's job.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// The current access token.
    async fn access_token(&self) -> Result<AccessToken, AuthError>;

    /// Obtain a fresh access token, replacing the current one.
    async fn renew(&self) -> Result<AccessToken, AuthError>;

    /// Forget every credential. Later calls fail with [`AuthError::NotLoggedIn`].
    async fn purge(&self);
}

type RenewFn = Box<dyn Fn(&Credentials) -> Result<AccessToken, AuthError> + Send + Sync>;

/// In-memory credential store.
///
/// Without a renewal function every `renew` fails with
/// [`AuthError::SessionExpired`], which suits static tokens.
#[derive(Default)]
pub struct MemoryCredentials {
    current: RwLock<Option<Credentials>>,
    renew_with: Option<RenewFn>,
}

impl MemoryCredentials {
    /// Create a store holding `credentials`.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            current: RwLock::new(Some(credentials)),
            renew_with: None,
        }
    }

    /// Create an empty store.
    pub fn logged_out() -> Self {
        Self::default()
    }

    /// Set the renewal function.
    pub fn with_renewal<F>(mut self, renew: F) -> Self
    where
        F: Fn(&Credentials) -> Result<AccessToken, AuthError> + Send + Sync + 'static,
    {
        self.renew_with = Some(Box::new(renew));
        self
    }

    /// Snapshot of the held credentials.
    pub fn credentials(&self) -> Option<Credentials> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the held credentials.
    pub fn set(&self, credentials: Credentials) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(credentials);
    }

    /// Replace only the access token, keeping the refresh token.
    pub fn set_access_token(&self, token: AccessToken) -> Result<(), AuthError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        match current.as_mut() {
            Some(credentials) => {
                credentials.access_token = token;
                Ok(())
            }
            None => Err(AuthError::NotLoggedIn),
        }
    }

    /// Remove the held credentials.
    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Check if any credentials are held.
    pub fn is_logged_in(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for MemoryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCredentials")
            .field("current", &self.credentials())
            .field("renewable", &self.renew_with.is_some())
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for MemoryCredentials {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        self.credentials()
            .map(|c| c.access_token)
            .ok_or(AuthError::NotLoggedIn)
    }

    async fn renew(&self) -> Result<AccessToken, AuthError> {
        let credentials = self.credentials().ok_or(AuthError::NotLoggedIn)?;
        let renew = self.renew_with.as_ref().ok_or(AuthError::SessionExpired)?;
        let token = renew(&credentials)?;
        self.set_access_token(token.clone())?;
        tracing::debug!("access token renewed");
        Ok(token)
    }

    async fn purge(&self) {
        self.clear();
        tracing::warn!("session credentials purged");
    }
}
