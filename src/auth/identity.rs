//! Identity lookup via the whoami endpoint.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::Deserialize;

use crate::client::{RetryingClient, SessionConfig};
use crate::models::{IdType, TenantId};
use crate::{Error, Result};

use super::Token;

/// Who the credentials belong to and where their API lives.
#[derive(Debug, Clone)]
pub struct Identity {
    tenant_id: TenantId,
    id_type: IdType,
    api_host: String,
    global_host: Option<String>,
}

impl Identity {
    /// The tenant identifier sent as `X-Tenant-ID`.
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// The kind of identity reported by whoami.
    pub fn id_type(&self) -> &IdType {
        &self.id_type
    }

    /// Base URL of the tenant's data region.
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Base URL for partner and organization level APIs, when reported.
    pub fn global_host(&self) -> Option<&str> {
        self.global_host.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiHosts {
    #[serde(default)]
    global: Option<String>,
    #[serde(default)]
    data_region: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WhoamiResponse {
    id: String,
    #[serde(default = "unknown_id_type")]
    id_type: IdType,
    api_hosts: ApiHosts,
}

fn unknown_id_type() -> IdType {
    IdType::Unknown
}

impl TryFrom<WhoamiResponse> for Identity {
    type Error = Error;

    fn try_from(response: WhoamiResponse) -> Result<Self> {
        let api_host = response.api_hosts.data_region.ok_or_else(|| {
            Error::Authentication(format!(
                "Identity lookup returned no apiHosts.dataRegion for {} {}",
                response.id_type, response.id
            ))
        })?;

        Ok(Self {
            tenant_id: TenantId::new(response.id),
            id_type: response.id_type,
            api_host,
            global_host: response.api_hosts.global,
        })
    }
}

/// GET the whoami endpoint with a fresh token.
pub(crate) fn whoami(
    http: &RetryingClient,
    config: &SessionConfig,
    token: &Token,
) -> Result<Identity> {
    let builder = http
        .request(Method::GET, &config.whoami_url)
        .header(AUTHORIZATION, token.bearer())
        .header(ACCEPT, "application/json");

    let response = http
        .send(builder)
        .map_err(|err| Error::Authentication(format!("Identity lookup request failed: {err}")))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|err| Error::Authentication(format!("Identity lookup body unreadable: {err}")))?;

    if !status.is_success() {
        return Err(Error::auth_status("Identity lookup", status.as_u16(), &body));
    }

    let whoami: WhoamiResponse = serde_json::from_str(&body).map_err(|err| {
        Error::Authentication(format!("Identity lookup returned an unexpected body: {err}"))
    })?;

    Identity::try_from(whoami)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_identity() {
        let response: WhoamiResponse = serde_json::from_str(
            r#"{
                "id": "57ca9a6b-885f-4e36-95ec-290548c26059",
                "idType": "tenant",
                "apiHosts": {
                    "global": "https://api.central.sophos.com",
                    "dataRegion": "https://api-eu02.central.sophos.com"
                }
            }"#,
        )
        .unwrap();

        let identity = Identity::try_from(response).unwrap();
        assert_eq!(identity.tenant_id().as_str(), "57ca9a6b-885f-4e36-95ec-290548c26059");
        assert_eq!(identity.id_type(), &IdType::Tenant);
        assert_eq!(identity.api_host(), "https://api-eu02.central.sophos.com");
        assert_eq!(identity.global_host(), Some("https://api.central.sophos.com"));
    }

    #[test]
    fn test_missing_data_region_is_auth_error() {
        let response: WhoamiResponse = serde_json::from_str(
            r#"{
                "id": "p-1",
                "idType": "partner",
                "apiHosts": {"global": "https://api.central.sophos.com"}
            }"#,
        )
        .unwrap();

        let err = Identity::try_from(response).unwrap_err();
        assert!(err.is_auth_error());
        assert!(err.to_string().contains("partner p-1"));
    }

    #[test]
    fn test_missing_id_type_defaults_to_unknown() {
        let response: WhoamiResponse = serde_json::from_str(
            r#"{"id": "t-1", "apiHosts": {"dataRegion": "https://example.test"}}"#,
        )
        .unwrap();
        assert_eq!(response.id_type, IdType::Unknown);

        let identity = Identity::try_from(response).unwrap();
        assert_eq!(identity.global_host(), None);
    }
}
