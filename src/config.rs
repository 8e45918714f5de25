//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Longest accepted access token lifetime (one year)
const MAX_TOKEN_LIFETIME_MINUTES: i64 = 365 * 24 * 60;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// HS256 signing secret for access tokens
    pub jwt_secret: String,

    /// Access token lifetime in minutes
    pub access_token_expire_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ if environment == "production" => return Err(ConfigError::MissingEnv("JWT_SECRET")),
            _ => {
                tracing::warn!("JWT_SECRET not set, using a random per-process secret");
                random_secret()
            }
        };

        let access_token_expire_minutes: i64 = lookup("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|| "20".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("ACCESS_TOKEN_EXPIRE_MINUTES"))?;

        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&access_token_expire_minutes) {
            return Err(ConfigError::InvalidValue("ACCESS_TOKEN_EXPIRE_MINUTES"));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            jwt_secret,
            access_token_expire_minutes,
        })
    }
}

/// 32 random bytes, hex encoded
fn random_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/ledger",
        )]))
        .unwrap();

        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.access_token_expire_minutes, 20);
        assert_eq!(config.environment, "development");
        assert_eq!(config.jwt_secret.len(), 64);
    }

    #[test]
    fn test_missing_database_url() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingEnv("DATABASE_URL"))));
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/ledger"),
            ("PORT", "not-a-port"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidValue("PORT"))));
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/ledger"),
            ("ENVIRONMENT", "production"),
        ]));
        assert!(matches!(result, Err(ConfigError::MissingEnv("JWT_SECRET"))));

        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/ledger"),
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.environment, "production");
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn test_out_of_range_token_lifetime_rejected() {
        let too_long = (MAX_TOKEN_LIFETIME_MINUTES + 1).to_string();
        let max = i64::MAX.to_string();

        for minutes in ["0", "-5", too_long.as_str(), max.as_str()] {
            let result = Config::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/ledger"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", minutes),
            ]));
            assert!(
                matches!(
                    result,
                    Err(ConfigError::InvalidValue("ACCESS_TOKEN_EXPIRE_MINUTES"))
                ),
                "{minutes} minutes should be rejected"
            );
        }

        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/ledger"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "525600"),
        ]))
        .unwrap();
        assert_eq!(config.access_token_expire_minutes, MAX_TOKEN_LIFETIME_MINUTES);
    }
}
