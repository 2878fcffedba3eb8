// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed ServerConfig at startup

//! Environment-based configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Environment type for logging and security defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database connection URL
    pub database_url: String,
    /// JWT signing secret
    pub jwt_secret: Vec<u8>,
    /// Session token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Upload size ceiling in bytes, enforced by the HTTP layer
    pub max_upload_bytes: usize,
    /// Deployment environment
    pub environment: Environment,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a present variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().context("PORT must be a port number")?,
            Err(_) => 5000,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:chart2fit.db".to_owned());

        let jwt_secret = env::var("JWT_SECRET").map_or_else(
            |_| {
                warn!("JWT_SECRET not set; using an insecure development secret");
                b"chart2fit-development-secret".to_vec()
            },
            String::into_bytes,
        );

        let jwt_expiry_hours = match env::var("JWT_EXPIRY_HOURS") {
            Ok(value) => value
                .parse::<i64>()
                .context("JWT_EXPIRY_HOURS must be an integer")?,
            // Session tokens last a week, matching the web frontend's
            // remember-me behavior.
            Err(_) => 168,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(value) => value
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be an integer")?,
            Err(_) => 5 * 1024 * 1024,
        };

        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_default(),
        );

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            jwt_expiry_hours,
            max_upload_bytes,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("production"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("TEST"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("anything-else"),
            Environment::Development
        );
    }
}
