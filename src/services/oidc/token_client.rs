use std::time::Duration;

use serde::Deserialize;

use crate::services::oidc::ProviderConfig;
use crate::services::oidc::error::LoginError;

/// Tokens returned by the provider for an authorization code.
///
/// Transient: lives only for the duration of the callback request. The
/// provider returns all six fields on success; anything less is a schema
/// violation.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
    /// Signed identity token, verified separately.
    pub id_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub token_type: String,
}

/// Standard OAuth error body returned by the token endpoint.
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    error_description: Option<String>,
}

/// Client for the provider's token endpoint.
///
/// One blocking exchange per callback, bounded by the configured timeout.
/// No retry: the authorization code is single-use, so a transient failure
/// surfaces directly to the caller.
pub struct TokenExchangeClient {
    http: reqwest::Client,
}

impl TokenExchangeClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// The `redirect_uri` sent here must match the one used in the
    /// authorization request byte for byte; both come from
    /// [`ProviderConfig::redirect_uri`].
    pub async fn exchange(
        &self,
        provider: &ProviderConfig,
        code: &str,
    ) -> Result<TokenResponse, LoginError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", provider.redirect_uri.as_str()),
            ("client_id", provider.client_id.as_str()),
            ("client_secret", provider.client_secret.as_str()),
        ];

        tracing::debug!(endpoint = %provider.token_endpoint, "exchanging authorization code");

        let response = self
            .http
            .post(provider.token_endpoint.as_str())
            .form(&params)
            .send()
            .await
            .map_err(|e| LoginError::TokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if let Ok(oauth_error) = serde_json::from_str::<OAuthErrorBody>(&body) {
                return Err(LoginError::TokenExchange(format!(
                    "{}: {}",
                    oauth_error.error,
                    oauth_error.error_description.unwrap_or_default()
                )));
            }

            return Err(LoginError::TokenExchange(format!("HTTP {status} - {body}")));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| LoginError::TokenExchange(format!("malformed token response: {e}")))
    }
}
