//! Application configuration.
//!
//! All settings load from environment variables with sane defaults so the
//! server starts in development without any setup. The JWT signing secret
//! lives here and is handed to the token service at construction; nothing
//! else in the codebase ever reads it.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Database configuration
    pub database: DatabaseSettings,

    /// Server configuration
    pub server: ServerSettings,

    /// Authentication configuration
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    /// SQLite database URL, e.g. `sqlite://eventos.db`
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    /// Symmetric secret for token signing
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
}

/// Fallback secret for local development only.
const DEV_JWT_SECRET: &str = "change-me-in-production";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                url: "sqlite://eventos.db".to_string(),
                max_connections: 5,
            },
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            auth: AuthSettings {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                token_ttl_secs: 3600,
            },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(size) = std::env::var("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections =
                size.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "DATABASE_MAX_CONNECTIONS".into(),
                    message: format!("not a number: {}", size),
                })?;
        }

        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".into(),
                message: format!("not a port number: {}", port),
            })?;
        }

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.auth.jwt_secret = secret;
        } else {
            tracing::warn!("JWT_SECRET not set, using development fallback");
        }
        if let Ok(ttl) = std::env::var("TOKEN_TTL_SECS") {
            config.auth.token_ttl_secs =
                ttl.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "TOKEN_TTL_SECS".into(),
                    message: format!("not a number: {}", ttl),
                })?;
        }

        Ok(config)
    }

    /// Get the server address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::SocketAddr;
        let ip: std::net::IpAddr = self.server.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(ip, self.server.port)
    }
}
