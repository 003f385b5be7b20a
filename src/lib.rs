//! # sophos-central
//!
//! A small blocking client for the Sophos Central API.
//!
//! The crate handles the parts every caller would otherwise repeat:
//!
//! - **Authentication**: OAuth2 client-credentials exchange at the identity provider
//! - **Tenant discovery**: the whoami lookup that yields the tenant id and data-region host
//! - **Token refresh**: expired tokens are renewed transparently before a request
//! - **Retries**: transient network errors and 429/5xx responses are retried with exponential backoff
//! - **Uniform results**: every request returns an [`ApiResponse`] instead of an error
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sophos_central::{ApiResponse, RequestOptions, TenantSession};
//!
//! fn main() -> sophos_central::Result<()> {
//!     let mut session = TenantSession::connect("client-id", "client-secret")?;
//!     println!("Tenant {} at {}", session.tenant_id(), session.api_host());
//!
//!     match session.get("/endpoint/v1/endpoints", RequestOptions::new()) {
//!         ApiResponse::Success { data } => println!("{data}"),
//!         ApiResponse::Error { error, details } => eprintln!("{error}: {details}"),
//!     }
//!
//!     // Dropping the session also closes it.
//!     session.close();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{Credentials, Identity};
pub use client::{Partner, RetryConfig, SessionConfig, TenantSession};
pub use error::{Error, Result};
pub use models::{ApiResponse, HttpMethod, IdType, RequestOptions, TenantId};

/// Prelude module for convenient imports.
///
/// ```rust
/// use sophos_central::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{Partner, RetryConfig, SessionConfig, TenantSession};
    pub use crate::error::{Error, Result};
    pub use crate::models::{ApiResponse, HttpMethod, IdType, RequestOptions, TenantId};
}
