//! Session and HTTP layer for the Sophos Central API.
//!
//! This module provides the main entry point [`TenantSession`].
//!
//! # Example
//!
//! ```no_run
//! use sophos_central::{RequestOptions, TenantSession};
//!
//! # fn example() -> sophos_central::Result<()> {
//! let mut session = TenantSession::connect("client-id", "client-secret")?;
//!
//! let endpoints = session.get("/endpoint/v1/endpoints", RequestOptions::new());
//! # Ok(())
//! # }
//! ```

mod config;
mod retry;
mod session;

pub use config::{RetryConfig, SessionConfig, DEFAULT_TOKEN_URL, DEFAULT_WHOAMI_URL};
pub(crate) use retry::RetryingClient;
pub use session::{Partner, TenantSession};
