//! Access layer for the remote configuration service
//!
//! - [`credentials`]: ordered pool of API keys with destructive rotation
//! - [`transport`]: the wire boundary (`Transport` trait, `reqwest` implementation)
//! - [`client`]: authenticated calls with rate-limit failover and response classification
//! - [`endpoints`]: the typed operations the deployment needs

pub mod client;
pub mod credentials;
pub mod endpoints;
pub mod transport;

pub use client::{ApiClient, ApiResponse, RATE_LIMIT_MARKER};
pub use credentials::{Credential, CredentialPool};
pub use endpoints::ServiceApi;
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};
