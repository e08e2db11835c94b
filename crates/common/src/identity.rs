//! Client-credentials token acquisition against the Microsoft identity
//! platform v2.0 token endpoint.
//!
//! Tokens are never cached: every caller that needs one asks for a fresh
//! token, so there is no expiry or invalidation bookkeeping here.

use std::fmt;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Tenant and application credentials used for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// An opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct TokenProvider {
    client: Client,
    authority: Url,
    scope: String,
}

impl TokenProvider {
    pub fn new(client: Client, authority: Url) -> Self {
        Self {
            client,
            authority,
            scope: GRAPH_SCOPE.to_string(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn token_url(&self, tenant_id: &str) -> Result<Url, IdentityError> {
        let base = self.authority.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{}/{}/oauth2/v2.0/token",
            base, tenant_id
        ))?)
    }

    /// Exchange the credentials for a bearer token.
    ///
    /// A non-success status from the endpoint is logged together with the
    /// response body and returned unchanged as [`IdentityError::HttpStatus`].
    pub async fn fetch_token(&self, credentials: &Credentials) -> Result<AccessToken, IdentityError> {
        let url = self.token_url(&credentials.tenant_id)?;
        tracing::debug!(%url, client_id = %credentials.client_id, "requesting access token");

        let form = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", self.scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self.client.post(url).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("token request failed: {} - {}", status.as_u16(), body);
            return Err(IdentityError::HttpStatus(status, body));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(
            token_type = ?token.token_type,
            expires_in = ?token.expires_in,
            "access token acquired"
        );
        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken)
            .ok_or(IdentityError::MissingAccessToken)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("token endpoint returned {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("token response missing access_token")]
    MissingAccessToken,
    #[error("invalid token endpoint url: {0}")]
    Url(#[from] url::ParseError),
}
