use url::Url;
use uuid::Uuid;

use crate::services::oidc::LoginService;
use crate::session::{SessionContext, SessionValue};

/// Session key holding the CSRF state token.
pub(crate) const STATE_KEY: &str = "state";

/// Everything the web layer needs to start a login: the URL to redirect the
/// browser to, plus the values baked into it.
#[derive(Debug, Clone)]
pub struct AuthorizeRequest {
    pub url: Url,
    pub state: String,
    pub nonce: String,
}

impl LoginService {
    /// Builds the provider authorization URL for this session.
    ///
    /// Pure construction, no network I/O. Side effect: stores the session
    /// `state` on first use and records the fresh nonce as pending.
    pub fn authorize_url(&self, session: &mut dyn SessionContext) -> AuthorizeRequest {
        let state = session_state(session);
        let nonce = issue_nonce(session);

        let mut url = self.provider.authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.provider.client_id)
            .append_pair("redirect_uri", self.provider.redirect_uri.as_str())
            .append_pair("state", &state)
            .append_pair("scope", &self.provider.scopes)
            .append_pair("nonce", &nonce);

        tracing::debug!(%state, "built authorization redirect");

        AuthorizeRequest { url, state, nonce }
    }
}

/// Returns the session's login state, generating and storing one if absent.
///
/// The state stays stable for the lifetime of the session, so a duplicate
/// login initiation (second tab, double click) does not invalidate an
/// in-flight flow.
fn session_state(session: &mut dyn SessionContext) -> String {
    if let Some(SessionValue::Text(existing)) = session.get(STATE_KEY) {
        return existing;
    }

    let state = Uuid::new_v4().to_string();
    session.set(STATE_KEY, SessionValue::Text(state.clone()));
    state
}

/// Issues a fresh nonce and records it in the session's pending set.
///
/// Never reused: every authorization request gets its own nonce.
fn issue_nonce(session: &mut dyn SessionContext) -> String {
    let nonce = Uuid::new_v4().to_string();
    session.set(&nonce, SessionValue::Flag(true));
    nonce
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::services::oidc::testutil;
    use crate::session::MemorySession;

    fn query_pairs(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn state_is_stable_and_nonce_is_fresh_per_request() {
        let service = testutil::service("https://provider.test/oauth2/token");
        let mut session = MemorySession::default();

        let first = service.authorize_url(&mut session);
        let second = service.authorize_url(&mut session);

        assert_eq!(first.state, second.state);
        assert_ne!(first.nonce, second.nonce);

        // Both nonces stay pending so either tab can still finish its flow.
        assert_eq!(session.get(&first.nonce), Some(SessionValue::Flag(true)));
        assert_eq!(session.get(&second.nonce), Some(SessionValue::Flag(true)));
    }

    #[test]
    fn authorize_url_carries_required_parameters() {
        let service = testutil::service("https://provider.test/oauth2/token");
        let mut session = MemorySession::default();

        let request = service.authorize_url(&mut session);
        let params = query_pairs(&request.url);

        assert_eq!(request.url.host_str(), Some("provider.test"));
        assert_eq!(request.url.path(), "/oauth2/authorize");
        assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
        assert_eq!(
            params.get("client_id").map(String::as_str),
            Some(testutil::CLIENT_ID)
        );
        assert_eq!(
            params.get("redirect_uri").map(String::as_str),
            Some("http://localhost:3000/callback")
        );
        assert_eq!(
            params.get("scope").map(String::as_str),
            Some("openid profile")
        );
        assert_eq!(params.get("state"), Some(&request.state));
        assert_eq!(params.get("nonce"), Some(&request.nonce));
    }

    #[test]
    fn existing_state_is_reused_from_the_session() {
        let service = testutil::service("https://provider.test/oauth2/token");
        let mut session = MemorySession::default();
        session.set(STATE_KEY, SessionValue::Text("s-existing".to_string()));

        let request = service.authorize_url(&mut session);

        assert_eq!(request.state, "s-existing");
    }
}
