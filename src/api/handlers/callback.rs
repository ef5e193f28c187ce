use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use crate::api::dto::callback::{CallbackQuery, LoginResultResponse, ProviderErrorResponse};
use crate::api::handlers::session_id;
use crate::error::AppError;
use crate::services::oidc::error::LoginError;
use crate::session::MemorySession;
use crate::state::AppState;

/// Callback endpoint: finishes the flow and returns the verified identity.
///
/// A provider-reported error is surfaced verbatim as
/// `{error, errorDescription}`; every other failure goes through `AppError`.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    // No cookie: run against an empty session. The state check fails unless
    // the provider reported an error, which is handled before it.
    let session = match session_id(&jar) {
        Some(id) => state.sessions.session(id),
        None => Arc::new(tokio::sync::Mutex::new(MemorySession::default())),
    };
    let mut session = session.lock().await;

    let params = query.into_params();
    match state.login.handle_callback(&mut *session, &params).await {
        Ok(identity) => Ok(Json(LoginResultResponse::from(identity)).into_response()),
        Err(LoginError::Provider { error, description }) => {
            tracing::warn!(%error, "provider reported an error at the callback");
            Ok(Json(ProviderErrorResponse {
                error,
                error_description: description,
            })
            .into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "callback rejected");
            Err(e.into())
        }
    }
}
