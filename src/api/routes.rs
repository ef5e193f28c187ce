use axum::{Router, routing::get};

use crate::api::handlers::{callback::callback, login::login_page};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page))
        .route("/callback", get(callback))
}
