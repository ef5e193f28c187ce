use axum::extract::State;
use axum::response::Html;
use axum_extra::extract::CookieJar;

use crate::api::handlers::ensure_session;
use crate::state::AppState;

/// Login page: starts a flow for this browser session and renders the
/// authorization link.
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Html<String>) {
    let (jar, session_id) = ensure_session(jar);

    let session = state.sessions.session(session_id);
    let mut session = session.lock().await;
    let request = state.login.authorize_url(&mut *session);

    (jar, Html(format!("<a href=\"{}\">Login</a>", request.url)))
}
