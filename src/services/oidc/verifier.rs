use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::services::oidc::error::LoginError;
use crate::session::{SessionContext, SessionValue};

/// Claims carried by the provider's identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    /// Provider-scoped subject identifier of the authenticated user.
    pub sub: String,
    pub aud: String,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Replay nonce; must match a pending nonce issued by this session.
    #[serde(default)]
    pub nonce: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    /// Authentication methods reference, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amr: Option<Vec<String>>,
}

/// Verifies identity tokens signed with a symmetric MAC keyed by the client
/// secret (HS256, as negotiated with the provider).
///
/// Claims only leave this type after both the cryptographic check and the
/// session nonce check pass.
pub struct IdTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdTokenVerifier {
    pub fn new(
        client_secret: &str,
        client_id: &str,
        issuer: &str,
        leeway_seconds: u64,
    ) -> Self {
        let decoding_key = DecodingKey::from_secret(client_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[client_id]);
        validation.set_issuer(&[issuer]);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verifies signature, issuer, audience and expiry, then checks the nonce
    /// claim against the session's pending set.
    pub fn verify(
        &self,
        id_token: &str,
        session: &dyn SessionContext,
    ) -> Result<IdTokenClaims, LoginError> {
        let token =
            jsonwebtoken::decode::<IdTokenClaims>(id_token, &self.decoding_key, &self.validation)
                .map_err(LoginError::Signature)?;
        let claims = token.claims;

        let nonce = claims.nonce.as_deref().ok_or(LoginError::Nonce)?;
        match session.get(nonce) {
            Some(SessionValue::Flag(true)) => {}
            _ => return Err(LoginError::Nonce),
        }
        // The pending entry stays in the session after the check; the session
        // lifetime bounds it.

        tracing::debug!(sub = %claims.sub, "id token verified");

        Ok(claims)
    }
}
