//! Authentication module for TurboCommerce.
//!
//! Provides the bearer credential boundary and the actor model used for
//! authorization checks.

mod credentials;
mod error;
mod user;

pub use credentials::{AccessToken, CredentialProvider, Credentials, MemoryCredentials};
pub use error::AuthError;
pub use user::{Actor, Role};
