use std::net::SocketAddr;
use std::str::FromStr;
use std::{env, fmt};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    /// Externally visible base URL of this service; the callback redirect URI
    /// is derived from it once at startup.
    pub public_base_url: Url,
    pub client_id: String,
    /// Also keys the MAC over identity tokens.
    pub client_secret: String,
    pub authorize_url: Url,
    pub token_url: Url,
    pub issuer: String,
    pub scopes: String,
    pub id_token_leeway_seconds: u64,
    pub token_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let public_base_url = required_url("PUBLIC_BASE_URL")?;

        let client_id =
            env::var("LOGIN_CLIENT_ID").map_err(|_| ConfigError::Missing("LOGIN_CLIENT_ID"))?;
        let client_secret = env::var("LOGIN_CLIENT_SECRET")
            .map_err(|_| ConfigError::Missing("LOGIN_CLIENT_SECRET"))?;

        let authorize_url = required_url("PROVIDER_AUTHORIZE_URL")?;
        let token_url = required_url("PROVIDER_TOKEN_URL")?;
        let issuer =
            env::var("PROVIDER_ISSUER").map_err(|_| ConfigError::Missing("PROVIDER_ISSUER"))?;

        let scopes =
            env::var("LOGIN_SCOPES").unwrap_or_else(|_| "openid profile".to_string());

        let id_token_leeway_seconds = env::var("ID_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        let token_timeout_seconds = env::var("TOKEN_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Ok(Config {
            addr,
            app_env,
            public_base_url,
            client_id,
            client_secret,
            authorize_url,
            token_url,
            issuer,
            scopes,
            id_token_leeway_seconds,
            token_timeout_seconds,
        })
    }
}

fn required_url(key: &'static str) -> Result<Url, ConfigError> {
    let raw = env::var(key).map_err(|_| ConfigError::Missing(key))?;
    Url::parse(&raw).map_err(|_| ConfigError::Invalid(key))
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        tracing::error!(error = %e, "configuration error");
        AppError::Internal
    }
}
