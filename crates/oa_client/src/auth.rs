use chrono::{Duration, Utc};
use oa_core::{Credential, Error, Result, ServiceConfig};
use reqwest::{header, Client};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: String,
    expires_in: i64,
}

/// Obtains and refreshes bearer credentials from the token endpoint.
///
/// The caller owns the resulting `Credential`; this client is stateless
/// between calls.
pub struct AuthClient {
    http: Client,
    config: ServiceConfig,
    secret: String,
}

impl AuthClient {
    pub fn new(http: Client, config: ServiceConfig, secret: impl Into<String>) -> Self {
        Self {
            http,
            config,
            secret: secret.into(),
        }
    }

    /// Requests a fresh credential with the client-credentials grant.
    pub async fn acquire(&self) -> Result<Credential> {
        self.request_token(&[("grant_type", "client_credentials")])
            .await
    }

    /// Trades the current credential for a replacement.
    ///
    /// The endpoint expects the current access token in the refresh_token
    /// slot; sending anything else is rejected.
    pub async fn refresh(&self, current: &Credential) -> Result<Credential> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", &current.access_token),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<Credential> {
        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.secret))
            .header(header::USER_AGENT, &self.config.user_agent)
            .form(form)
            .send()
            .await?;

        let requested_at = Utc::now();
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Auth(format!("malformed token response: {e}")))?;
        Ok(Credential {
            token_type: token.token_type,
            access_token: token.access_token,
            expires_at: requested_at + Duration::seconds(token.expires_in),
        })
    }
}
