pub mod authorize;
pub mod callback;
pub mod error;
pub mod token_client;
pub mod verifier;

use std::time::Duration;

use url::Url;

use crate::services::oidc::token_client::TokenExchangeClient;
use crate::services::oidc::verifier::IdTokenVerifier;

/// Static description of the identity provider and of our registration with
/// it. Built once at startup from configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub authorize_endpoint: Url,
    pub token_endpoint: Url,
    /// Expected `iss` claim of identity tokens.
    pub issuer: String,
    pub client_id: String,
    /// Shared secret; authenticates the token exchange and keys the MAC over
    /// identity tokens.
    pub client_secret: String,
    /// Must be byte-identical between the authorization request and the
    /// token exchange.
    pub redirect_uri: Url,
    pub scopes: String,
}

/// Service that drives a full login transaction against the provider.
///
/// - `authorize_url` starts a flow (no network I/O, mutates the session).
/// - `handle_callback` finishes it: state check, token exchange, identity
///   token verification, claim extraction.
pub struct LoginService {
    provider: ProviderConfig,
    token_client: TokenExchangeClient,
    verifier: IdTokenVerifier,
}

impl LoginService {
    pub fn new(
        provider: ProviderConfig,
        token_timeout: Duration,
        id_token_leeway_seconds: u64,
    ) -> Result<Self, reqwest::Error> {
        let token_client = TokenExchangeClient::new(token_timeout)?;
        let verifier = IdTokenVerifier::new(
            &provider.client_secret,
            &provider.client_id,
            &provider.issuer,
            id_token_leeway_seconds,
        );

        Ok(Self {
            provider,
            token_client,
            verifier,
        })
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::time::Duration;

    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use url::Url;

    use super::verifier::IdTokenClaims;
    use super::{LoginService, ProviderConfig};

    pub const CLIENT_ID: &str = "test-client";
    pub const CLIENT_SECRET: &str = "test-client-secret";
    pub const ISSUER: &str = "https://provider.test";

    pub fn provider(token_endpoint: &str) -> ProviderConfig {
        ProviderConfig {
            authorize_endpoint: Url::parse("https://provider.test/oauth2/authorize").unwrap(),
            token_endpoint: Url::parse(token_endpoint).unwrap(),
            issuer: ISSUER.to_string(),
            client_id: CLIENT_ID.to_string(),
            client_secret: CLIENT_SECRET.to_string(),
            redirect_uri: Url::parse("http://localhost:3000/callback").unwrap(),
            scopes: "openid profile".to_string(),
        }
    }

    pub fn service(token_endpoint: &str) -> LoginService {
        LoginService::new(provider(token_endpoint), Duration::from_secs(5), 60).unwrap()
    }

    pub fn claims(nonce: &str) -> IdTokenClaims {
        let now = jsonwebtoken::get_current_timestamp() as i64;
        IdTokenClaims {
            iss: ISSUER.to_string(),
            sub: "U1234567890".to_string(),
            aud: CLIENT_ID.to_string(),
            exp: now + 3600,
            iat: now,
            nonce: Some(nonce.to_string()),
            name: Some("Alice Example".to_string()),
            picture: Some("https://profile.test/alice.png".to_string()),
            amr: None,
        }
    }

    pub fn sign(claims: &IdTokenClaims, secret: &str) -> String {
        let key = EncodingKey::from_secret(secret.as_bytes());
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &key).unwrap()
    }
}
