//! reqwest-backed HTTP client.

use crate::config::{ClientConfig, TimeoutConfig};
use crate::{FetchError, HttpTransport, Method, RequestBuilder, Response};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;

/// HTTP client for making outbound requests.
///
/// A thin wrapper around [`reqwest::Client`] that resolves paths against a
/// base URL and adds default headers to every request.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client without timeouts.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Create a client with bounded timeouts.
    pub fn with_timeouts(timeout: TimeoutConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout.connect())
            .timeout(timeout.total())
            .build()?;
        Ok(Self {
            http,
            base_url: None,
            default_headers: HashMap::new(),
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        config.validate().map_err(FetchError::InvalidUrl)?;
        Ok(Self::with_timeouts(config.timeout)?
            .with_base_url(config.base_url.clone())
            .with_default_header("Accept", "application/json"))
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Resolve a path against the base URL.
    pub fn url_for(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url.to_string(),
        }
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Put, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Delete, url)
    }
}

#[async_trait]
impl HttpTransport for FetchClient {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let url = self.url_for(&request.url);
        let mut headers = self.default_headers.clone();
        headers.extend(request.headers);

        let mut builder = self.http.request(request.method.to_reqwest(), &url);
        for (key, value) in &headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let started = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = FetchError::from(e);
                tracing::warn!(
                    method = request.method.as_str(),
                    url = %url,
                    error = %err,
                    "request failed"
                );
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        let response_headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(
            method = request.method.as_str(),
            url = %url,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );

        Ok(Response::new(status, response_headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_base_and_path() {
        let client = FetchClient::new().with_base_url("https://market.test/api/");
        assert_eq!(client.url_for("/cart"), "https://market.test/api/cart");
        assert_eq!(client.url_for("orders/7"), "https://market.test/api/orders/7");
    }

    #[test]
    fn test_url_for_keeps_absolute_urls() {
        let client = FetchClient::new().with_base_url("https://market.test/api");
        assert_eq!(
            client.url_for("https://other.test/x"),
            "https://other.test/x"
        );
    }

    #[test]
    fn test_url_for_without_base() {
        assert_eq!(FetchClient::new().url_for("/cart"), "/cart");
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let config = ClientConfig::new("not-a-url");
        assert!(matches!(
            FetchClient::from_config(&config),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
