//! The seam between backend calls and the wire.

use crate::{FetchError, RequestBuilder, Response};
use async_trait::async_trait;
use std::sync::Arc;

/// Sends a request and returns the response, whatever its status.
///
/// Non-2xx statuses are not errors at this level; callers decide with
/// [`Response::error_for_status`]. Transport failures (timeouts, refused
/// connections) are.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        (**self).send(request).await
    }
}
