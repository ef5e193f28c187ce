use std::sync::Arc;
use std::time::Duration;
use std::{panic, process};

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::services::oidc::{LoginService, ProviderConfig};
use crate::session::SessionStore;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,oidc_login=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        // In production, prefer the default behavior (stderr) and let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting login service in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|_| AppError::Internal)?;
    axum::serve(listener, app)
        .await
        .map_err(|_| AppError::Internal)?;

    Ok(())
}

fn build_state(config: &Config) -> Result<AppState, AppError> {
    // The same value goes into the authorization request and the token
    // exchange; the provider requires them to be byte-identical.
    let redirect_uri = config
        .public_base_url
        .join("/callback")
        .map_err(|_| AppError::Internal)?;

    let provider = ProviderConfig {
        authorize_endpoint: config.authorize_url.clone(),
        token_endpoint: config.token_url.clone(),
        issuer: config.issuer.clone(),
        client_id: config.client_id.clone(),
        client_secret: config.client_secret.clone(),
        redirect_uri,
        scopes: config.scopes.clone(),
    };

    let login = LoginService::new(
        provider,
        Duration::from_secs(config.token_timeout_seconds),
        config.id_token_leeway_seconds,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "failed to build the token exchange client");
        AppError::Internal
    })?;

    Ok(AppState::new(Arc::new(login), Arc::new(SessionStore::new())))
}

fn build_router(state: AppState) -> Router {
    async fn health() -> &'static str {
        "ok"
    }

    Router::new()
        .route("/health", get(health))
        .merge(api::routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
