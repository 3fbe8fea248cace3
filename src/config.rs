//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::auth::KeyEnvironment;
use serde::Deserialize;
use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Docker
            port: 3000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Credential issuing and enforcement
#[derive(Debug, Clone)]
pub struct KeysConfig {
    /// Environment tag baked into newly generated keys
    pub environment: KeyEnvironment,
    /// Require an active bearer key on every /api/v1 route
    pub require_api_key: bool,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            environment: KeyEnvironment::Live,
            require_api_key: false,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub keys: KeysConfig,
    /// Load the demo databases, keys and users at startup
    pub seed_data: bool,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: std::env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let keys = KeysConfig {
            environment: match std::env::var("API_KEY_ENV") {
                Ok(value) => value
                    .parse()
                    .map_err(ConfigError::InvalidValue)?,
                Err(_) => KeysConfig::default().environment,
            },
            require_api_key: parse_flag("REQUIRE_API_KEY", false)?,
        };

        Ok(Self {
            server,
            cors,
            keys,
            seed_data: parse_flag("SEED_DATA", true)?,
        })
    }
}

/// Read a boolean environment flag, falling back to `default` when unset
fn parse_flag(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(value) => parse_bool(&value).ok_or_else(|| {
            ConfigError::InvalidValue(format!("{} must be true or false, got '{}'", name, value))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_default_keys_config() {
        let config = KeysConfig::default();
        assert_eq!(config.environment, KeyEnvironment::Live);
        assert!(!config.require_api_key);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
