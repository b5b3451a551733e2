//! Configuration management for the getVolunteer backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with GV_ prefix
//! 4. The conventional APP_ENV, DATABASE_URL, SECRET_KEY and GOOGLE_API_KEY variables

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, test, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Secrets configuration
    #[serde(default)]
    pub security: SecurityConfig,

    /// Volunteer matching integration
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a free connection
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SecurityConfig {
    /// Application secret (SECRET_KEY)
    pub secret_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MatchingConfig {
    /// Google Generative AI key (GOOGLE_API_KEY)
    pub google_api_key: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV")
            .or_else(|_| std::env::var("GV_ENVIRONMENT"))
            .unwrap_or_else(|_| "development".into());

        let config: Config = Self::defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GV_ prefix)
            .add_source(
                Environment::with_prefix("GV")
                    .separator("__")
                    .try_parsing(true),
            )
            // Conventional unprefixed variables win over everything else
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("security.secret_key", std::env::var("SECRET_KEY").ok())?
            .set_override_option(
                "matching.google_api_key",
                std::env::var("GOOGLE_API_KEY").ok(),
            )?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Builder pre-populated with the in-code defaults
    pub fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 30)
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "DATABASE_URL (or database.url) must be set".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Message(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        if self.is_production() && self.secret_key().is_none() {
            return Err(ConfigError::Message(
                "SECRET_KEY must be set in production".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Non-empty secret key, if configured
    pub fn secret_key(&self) -> Option<&str> {
        self.security
            .secret_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Whether the matching integration has credentials
    pub fn matching_enabled(&self) -> bool {
        self.matching
            .google_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}
