//! HTTP client utilities for TurboCommerce.
//!
//! Provides the network boundary of the storefront: a reqwest-backed client
//! with bounded timeouts, a transport trait the engines are written against,
//! and bearer authentication that renews once on a 401.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_auth::{Credentials, MemoryCredentials};
//! use turbo_data::{AuthenticatedClient, ClientConfig, FetchClient, HttpTransport, RefreshTokenProvider};
//!
//! let config = ClientConfig::new("https://market.example.com/api");
//! let raw = FetchClient::from_config(&config)?;
//! let store = Arc::new(MemoryCredentials::new(Credentials::new(access, refresh)));
//! let provider = Arc::new(RefreshTokenProvider::new(raw.clone(), store, &config.refresh_path));
//! let client = AuthenticatedClient::new(raw, provider);
//!
//! let cart: serde_json::Value = client
//!     .send(RequestBuilder::get("/cart"))
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod auth;
mod client;
mod config;
mod error;
mod refresh;
mod request;
mod response;
mod transport;

pub use auth::AuthenticatedClient;
pub use client::FetchClient;
pub use config::{ClientConfig, TimeoutConfig, DEFAULT_REFRESH_PATH};
pub use error::FetchError;
pub use refresh::RefreshTokenProvider;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use transport::HttpTransport;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpTransport, Method, RequestBuilder, Response};
}
