//! Client credentials.

use secrecy::{ExposeSecret, SecretString};

/// OAuth2 client credentials issued by Sophos Central.
///
/// The secret never appears in `Debug` output.
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
}

impl Credentials {
    /// Create credentials, rejecting empty values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) if either
    /// value is empty.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> crate::Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.is_empty() {
            return Err(crate::Error::InvalidInput(
                "client_id must not be empty".to_string(),
            ));
        }
        if client_secret.is_empty() {
            return Err(crate::Error::InvalidInput(
                "client_secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client_id,
            client_secret: SecretString::from(client_secret),
        })
    }

    /// Get the client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = Credentials::new("my-client", "super-secret").unwrap();
        let debug_str = format!("{:?}", credentials);

        assert!(debug_str.contains("my-client"));
        assert!(!debug_str.contains("super-secret"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(crate::Error::InvalidInput(_))
        ));
        assert!(matches!(
            Credentials::new("id", ""),
            Err(crate::Error::InvalidInput(_))
        ));
    }
}
