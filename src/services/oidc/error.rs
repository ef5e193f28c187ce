use thiserror::Error;

/// Failures of a login transaction, one variant per protocol stage.
///
/// Every variant is fatal for the attempt; the flow has no partial success
/// and never retries on its own (the authorization code is single-use).
#[derive(Debug, Error)]
pub enum LoginError {
    /// The provider reported an error at the callback. Carried verbatim so
    /// the caller can surface it unchanged.
    #[error("provider returned an error: {error}")]
    Provider {
        error: String,
        description: Option<String>,
    },

    /// The returned `state` does not match the one stored in the session.
    /// Raised before any network call is made.
    #[error("state mismatch: callback does not belong to this session")]
    StateMismatch,

    /// The code-for-tokens exchange failed: non-success HTTP status, network
    /// error or timeout, or a response body that does not match the token
    /// schema.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// Identity token verification failed (signature, issuer, audience or
    /// expiry). No claims are exposed.
    #[error("id token verification failed: {0}")]
    Signature(#[source] jsonwebtoken::errors::Error),

    /// The nonce claim in the identity token was never issued in this
    /// session. Indicates replay or a forged token.
    #[error("unknown nonce: id token does not match a pending login")]
    Nonce,
}
