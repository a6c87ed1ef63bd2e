//! Configuration module for the volunteer backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;

/// Default MongoDB host used when only credentials are configured.
pub const DEFAULT_DB_HOST: &str = "cluster0.w3tuc.mongodb.net";

/// Deployment environment, drives cookie flags and CORS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value.unwrap_or_default().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Which document store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, PartialEq, Eq)]
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

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// Database holding the `posts` and `volunteer_requests` collections
    pub db_name: String,
    pub store_backend: StoreBackend,
    /// HMAC secret used to sign session tokens
    pub token_secret: String,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 5000,
        };
        let bind_addr = SocketAddr::from(([0, 0, 0, 0], port));

        let store_backend = match lookup("STORE").as_deref() {
            Some("memory") => StoreBackend::Memory,
            Some("mongo") | None => StoreBackend::Mongo,
            Some(_) => return Err(ConfigError::Invalid("STORE")),
        };

        let mongodb_uri = match lookup("MONGODB_URI") {
            Some(uri) => uri,
            None if store_backend == StoreBackend::Memory => String::new(),
            None => {
                let user = lookup("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
                let password = lookup("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?;
                let host = lookup("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string());
                format!(
                    "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=Cluster0",
                    user, password, host
                )
            }
        };

        let db_name = lookup("DB_NAME").unwrap_or_else(|| "volunteer".to_string());

        let token_secret = lookup("ACCESS_TOKEN_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            bind_addr,
            mongodb_uri,
            db_name,
            store_backend,
            token_secret,
            app_env,
            cors_allowed_origins,
            log_level,
        })
    }
}

#[cfg(test)]
impl Config {
    /// Development configuration backed by the in-memory store.
    pub fn for_tests() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            mongodb_uri: String::new(),
            db_name: "volunteer_test".to_string(),
            store_backend: StoreBackend::Memory,
            token_secret: "test-secret".to_string(),
            app_env: AppEnv::Development,
            cors_allowed_origins: Vec::new(),
            log_level: "warn".to_string(),
        }
    }
}
