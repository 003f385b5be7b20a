//! Data models for the Sophos Central client.
//!
//! - [`primitives`] - Identifiers and enumerations (`TenantId`, `IdType`, `HttpMethod`)
//! - [`response`] - Request options and the tagged [`ApiResponse`] result

pub mod primitives;
pub mod response;

pub use primitives::*;
pub use response::*;
