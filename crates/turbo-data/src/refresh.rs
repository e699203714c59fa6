//! Credential provider that renews through the backend's refresh endpoint.

use crate::{HttpTransport, RequestBuilder};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use turbo_auth::{AccessToken, AuthError, CredentialProvider, MemoryCredentials};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: AccessToken,
}

/// Renews by posting `{ refreshToken }` to the refresh path and storing the
/// returned `{ accessToken }`.
///
/// The transport must not itself authenticate, or a rejected refresh would
/// recurse into another renewal.
pub struct RefreshTokenProvider<T> {
    transport: T,
    store: Arc<MemoryCredentials>,
    refresh_path: String,
}

impl<T: HttpTransport> RefreshTokenProvider<T> {
    pub fn new(transport: T, store: Arc<MemoryCredentials>, refresh_path: impl Into<String>) -> Self {
        Self {
            transport,
            store,
            refresh_path: refresh_path.into(),
        }
    }

    /// The underlying credential store.
    pub fn store(&self) -> &Arc<MemoryCredentials> {
        &self.store
    }
}

#[async_trait]
impl<T: HttpTransport> CredentialProvider for RefreshTokenProvider<T> {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        self.store.access_token().await
    }

    async fn renew(&self) -> Result<AccessToken, AuthError> {
        let credentials = self.store.credentials().ok_or(AuthError::NotLoggedIn)?;
        let refresh_token = credentials
            .refresh_token
            .as_deref()
            .ok_or(AuthError::SessionExpired)?;

        let request = RequestBuilder::post(self.refresh_path.as_str())
            .json(&RefreshRequest { refresh_token })
            .map_err(|e| AuthError::RenewalFailed(e.to_string()))?;

        let response = self
            .transport
            .send(request)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::RenewalFailed(e.to_string()))?;
        let RefreshResponse { access_token } = response
            .json()
            .map_err(|e| AuthError::RenewalFailed(e.to_string()))?;

        self.store.set_access_token(access_token.clone())?;
        tracing::info!("access token refreshed");
        Ok(access_token)
    }

    async fn purge(&self) {
        self.store.purge().await;
    }
}
