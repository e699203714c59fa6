//! Bearer authentication with a single retry after renewal.
//!
//! Every request carries the provider's current access token. A 401 response
//! renews the token and replays the request once. Concurrent 401s share one
//! renewal: whoever takes the gate first renews, the rest find a token newer
//! than the one that was rejected and reuse it.

use crate::{FetchError, HttpTransport, RequestBuilder, Response};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use turbo_auth::{AccessToken, CredentialProvider};

/// An [`HttpTransport`] that authenticates requests through a
/// [`CredentialProvider`].
pub struct AuthenticatedClient<T, P: ?Sized> {
    transport: T,
    credentials: Arc<P>,
    renewal: Mutex<()>,
}

impl<T, P> AuthenticatedClient<T, P>
where
    T: HttpTransport,
    P: CredentialProvider + ?Sized,
{
    pub fn new(transport: T, credentials: Arc<P>) -> Self {
        Self {
            transport,
            credentials,
            renewal: Mutex::new(()),
        }
    }

    /// The credential provider.
    pub fn credentials(&self) -> &Arc<P> {
        &self.credentials
    }

    async fn renew_after(&self, rejected: &AccessToken) -> Result<AccessToken, FetchError> {
        let _gate = self.renewal.lock().await;

        if let Ok(current) = self.credentials.access_token().await {
            if &current != rejected {
                tracing::debug!("reusing token renewed by a concurrent request");
                return Ok(current);
            }
        }

        match self.credentials.renew().await {
            Ok(token) => Ok(token),
            Err(e) => {
                tracing::warn!(error = %e, "token renewal failed, ending session");
                self.credentials.purge().await;
                Err(FetchError::SessionExpired(e))
            }
        }
    }
}

#[async_trait]
impl<T, P> HttpTransport for AuthenticatedClient<T, P>
where
    T: HttpTransport,
    P: CredentialProvider + ?Sized,
{
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let token = self
            .credentials
            .access_token()
            .await
            .map_err(FetchError::Auth)?;

        let response = self
            .transport
            .send(request.clone().bearer_auth(token.secret()))
            .await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        tracing::debug!(
            method = request.method().as_str(),
            url = request.url(),
            "access token rejected, renewing"
        );
        let renewed = self.renew_after(&token).await?;

        let retried = self
            .transport
            .send(request.clone().bearer_auth(renewed.secret()))
            .await?;
        if retried.is_unauthorized() {
            tracing::warn!(
                method = request.method().as_str(),
                url = request.url(),
                "request still unauthorized after renewal"
            );
            return Err(FetchError::Unauthorized);
        }
        Ok(retried)
    }
}
