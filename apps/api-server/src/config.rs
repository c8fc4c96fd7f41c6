//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use scribe_infra::{DatabaseConfig, JwtConfig};

const DEFAULT_POSTGRES_PORT: u16 = 5433;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let database = Self::database_url(&var).map(|url| DatabaseConfig {
            url,
            max_connections: parsed(&var, "DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parsed(&var, "DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parsed(&var, "JWT_EXPIRATION_HOURS").unwrap_or(defaults.expiration_hours),
            issuer: var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&var, "PORT").unwrap_or(8080),
            database,
            jwt,
        }
    }

    /// `DATABASE_URL` wins; otherwise the discrete `DB_HOST`/`POSTGRES_*`
    /// settings are used when `DB_HOST` is present.
    fn database_url(var: &impl Fn(&str) -> Option<String>) -> Option<String> {
        if let Some(url) = var("DATABASE_URL") {
            return Some(url);
        }

        let host = var("DB_HOST")?;
        let port = parsed(var, "POSTGRES_PORT").unwrap_or(DEFAULT_POSTGRES_PORT);
        let user = var("POSTGRES_USER").unwrap_or_else(|| "postgres".to_string());
        let password = var("POSTGRES_PASSWORD").unwrap_or_default();
        let database = var("POSTGRES_DB").unwrap_or_else(|| "scribe".to_string());

        Some(DatabaseConfig::url_from_parts(
            &host, port, &user, &password, &database,
        ))
    }
}

fn parsed<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    var(key).and_then(|v| v.parse().ok())
}
