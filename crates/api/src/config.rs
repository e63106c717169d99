//! Runtime configuration.
//!
//! Layered from built-in defaults and `STOWAGE_*` environment variables
//! (e.g. `STOWAGE_BIND_ADDR`, `STOWAGE_DATABASE_URL`).

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use tracing::warn;

pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// Postgres connection string. In-memory storage when absent.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Redis URL for notification fan-out (needs the `redis` feature).
    #[serde(default)]
    pub redis_url: Option<String>,
    pub default_reserve_hours: i64,
    /// Per-subscriber backlog of the realtime stream before it starts lagging.
    pub realtime_buffer: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            database_url: None,
            redis_url: None,
            default_reserve_hours: 24,
            realtime_buffer: 256,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Config::builder()
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("default_reserve_hours", defaults.default_reserve_hours)?
            .set_default("realtime_buffer", defaults.realtime_buffer as i64)?
            .add_source(Environment::with_prefix("STOWAGE").try_parsing(true))
            .build()?;

        let loaded: AppConfig = config.try_deserialize()?;
        loaded.validate()?;
        if loaded.jwt_secret == DEV_JWT_SECRET {
            warn!("STOWAGE_JWT_SECRET not set; using insecure dev default");
        }
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_reserve_hours <= 0 {
            return Err(ConfigError::Message("default_reserve_hours must be positive".to_string()));
        }
        if self.realtime_buffer == 0 {
            return Err(ConfigError::Message("realtime_buffer must be positive".to_string()));
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt_secret cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_reservation_window() {
        let config = AppConfig {
            default_reserve_hours: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
