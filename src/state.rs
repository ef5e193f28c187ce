use std::sync::Arc;

use crate::services::oidc::LoginService;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub login: Arc<LoginService>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(login: Arc<LoginService>, sessions: Arc<SessionStore>) -> Self {
        Self { login, sessions }
    }
}
