pub mod callback;
pub mod login;

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use uuid::Uuid;

/// Cookie binding a browser to its server-side session.
pub const SESSION_COOKIE: &str = "session";

pub(crate) fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Returns the browser's session id, setting a fresh cookie if it has none.
///
/// SameSite=Lax so the cookie still rides along on the provider's top-level
/// redirect back to `/callback`.
pub(crate) fn ensure_session(jar: CookieJar) -> (CookieJar, Uuid) {
    if let Some(id) = session_id(&jar) {
        return (jar, id);
    }

    let id = Uuid::new_v4();
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    (jar.add(cookie), id)
}
