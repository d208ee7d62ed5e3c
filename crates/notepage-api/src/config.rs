//! Server configuration read from the environment.

use std::time::Duration;

use axum::http::HeaderValue;
use notepage_core::defaults::{REQUEST_TIMEOUT_SECS, SERVER_HOST, SERVER_PORT};
use notepage_core::{Error, Result};
use notepage_db::pool::DEFAULT_MAX_CONNECTIONS;
use notepage_db::PoolConfig;

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL URL. Not required in in-memory mode.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Upper bound on a single request, after which it is answered with 408.
    pub request_timeout: Duration,
    pub run_migrations: bool,
    /// Serve seeded demo notes from memory instead of PostgreSQL.
    pub in_memory: bool,
    pub allowed_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: SERVER_HOST.to_string(),
            port: SERVER_PORT,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            run_migrations: true,
            in_memory: false,
            allowed_origins: parse_allowed_origins(DEFAULT_ALLOWED_ORIGINS),
        }
    }
}

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

impl ServerConfig {
    /// Read configuration from process environment variables.
    ///
    /// Environment variables:
    ///   DATABASE_URL         - PostgreSQL URL (required unless in-memory)
    ///   HOST                 - bind address (default: "0.0.0.0")
    ///   PORT                 - bind port (default: 3000)
    ///   DB_MAX_CONNECTIONS   - pool size (default: 10)
    ///   REQUEST_TIMEOUT_SECS - per-request timeout (default: 30)
    ///   RUN_MIGRATIONS       - apply migrations at startup (default: true)
    ///   NOTEPAGE_IN_MEMORY   - serve demo data from memory (default: false)
    ///   ALLOWED_ORIGINS      - comma-separated CORS origins
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(v) => v
                .parse()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got '{}'", v)))?,
            None => defaults.port,
        };
        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().map_err(|_| {
                Error::Config(format!("DB_MAX_CONNECTIONS must be an integer, got '{}'", v))
            })?,
            None => defaults.db_max_connections,
        };
        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.parse().map_err(|_| {
                Error::Config(format!("REQUEST_TIMEOUT_SECS must be an integer, got '{}'", v))
            })?),
            None => defaults.request_timeout,
        };

        let config = Self {
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            db_max_connections,
            request_timeout,
            run_migrations: lookup("RUN_MIGRATIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.run_migrations),
            in_memory: lookup("NOTEPAGE_IN_MEMORY")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.in_memory),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|v| parse_allowed_origins(&v))
                .unwrap_or(defaults.allowed_origins),
        };

        if !config.in_memory && config.database_url.is_none() {
            return Err(Error::Config(
                "DATABASE_URL is required unless NOTEPAGE_IN_MEMORY=true".into(),
            ));
        }
        Ok(config)
    }

    /// Pool sized by `DB_MAX_CONNECTIONS`; waiting for a connection is bounded
    /// by the request timeout.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.db_max_connections, self.request_timeout)
    }

    /// `host:port` suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

fn parse_allowed_origins(origins_str: &str) -> Vec<HeaderValue> {
    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_database_url() {
        let config = ServerConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/notepage",
        )]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.run_migrations);
        assert!(!config.in_memory);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_database_url_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_in_memory_needs_no_database_url() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("NOTEPAGE_IN_MEMORY", "1")])).unwrap();
        assert!(config.in_memory);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("NOTEPAGE_IN_MEMORY", "true"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DB_MAX_CONNECTIONS", "3"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.db_max_connections, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_pool_config_follows_server_settings() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/notepage"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("REQUEST_TIMEOUT_SECS", "12"),
        ]))
        .unwrap();

        let pool = config.pool_config();
        assert_eq!(pool.max_connections, 4);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(12));
        assert!(pool.pool_options().is_ok());
    }

    #[test]
    fn test_zero_pool_size_surfaces_as_config_error() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("NOTEPAGE_IN_MEMORY", "true"),
            ("DB_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap();
        assert!(matches!(
            config.pool_config().pool_options(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_bad_port_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[
            ("NOTEPAGE_IN_MEMORY", "true"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_allowed_origins_skip_blanks() {
        let origins = parse_allowed_origins("http://a.test, ,http://b.test,");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "http://b.test");
    }
}
