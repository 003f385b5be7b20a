//! Authentication for the Sophos Central API.
//!
//! Authenticating is a two-step handshake:
//!
//! 1. The client credentials are exchanged for a bearer token at the
//!    identity provider's OAuth2 endpoint (`grant_type=client_credentials`).
//! 2. The token is presented to the whoami endpoint, which reports the
//!    tenant id and the regional API host that all later calls go to.
//!
//! Both steps must succeed; the resulting token and [`Identity`] are
//! only ever replaced together.

mod credentials;
mod identity;
mod token;

pub use credentials::Credentials;
pub use identity::Identity;
pub(crate) use token::Token;

use tracing::{info, warn};

use crate::client::{RetryingClient, SessionConfig};
use crate::Result;

/// A token together with the identity it resolved to.
pub(crate) struct AuthState {
    pub(crate) token: Token,
    pub(crate) identity: Identity,
}

/// Run the full handshake: token exchange, then identity lookup.
pub(crate) fn authenticate(
    http: &RetryingClient,
    config: &SessionConfig,
    credentials: &Credentials,
) -> Result<AuthState> {
    let token = token::exchange(http, config, credentials).inspect_err(|err| {
        warn!(client_id = %credentials.client_id(), error = %err, "token exchange failed");
    })?;

    let identity = identity::whoami(http, config, &token).inspect_err(|err| {
        warn!(client_id = %credentials.client_id(), error = %err, "identity lookup failed");
    })?;

    info!(
        tenant_id = %identity.tenant_id(),
        id_type = %identity.id_type(),
        api_host = %identity.api_host(),
        expires_at = %token.expires_at(),
        "authenticated"
    );

    Ok(AuthState { token, identity })
}
