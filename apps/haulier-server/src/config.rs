//! Server configuration.

use std::env;
use std::time::Duration;

use geocoding::DEFAULT_GOOGLE_BASE_URL;

/// Which store backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via `DATABASE_URL` or the `DATABASE_*` parts.
    Postgres,
    /// Process-local maps; data is lost on restart.
    Memory,
}

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Store backend.
    pub store_backend: StoreBackend,
    /// Database URL (required for the postgres backend).
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub database_max_connections: u32,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// JWT expiration in hours.
    pub jwt_expiration_hours: u64,
    /// Google Places API key.
    pub google_api_key: Option<String>,
    /// Places API host.
    pub geocoding_base_url: String,
    /// Timeout for a single geocoding call.
    pub geocoding_timeout: Duration,
    /// Timeout for handling one inbound request.
    pub request_timeout: Duration,
    /// Log level.
    pub log_level: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("store_backend", &self.store_backend)
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("google_api_key_configured", &self.google_api_key.is_some())
            .field("geocoding_base_url", &self.geocoding_base_url)
            .field("geocoding_timeout", &self.geocoding_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = var("HAULIER_JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("HAULIER_JWT_SECRET is required"))?;

        let store_backend = match var("HAULIER_STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("HAULIER_STORE must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = var("DATABASE_URL").or_else(|| database_url_from_parts(&var));
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!(
                "DATABASE_URL or DATABASE_HOST/DATABASE_USERNAME/DATABASE_PASSWORD/DATABASE_NAME is required"
            );
        }

        let jwt_expiration_hours = parse_or(
            var("HAULIER_JWT_EXPIRATION_HOURS"),
            "HAULIER_JWT_EXPIRATION_HOURS",
            auth::DEFAULT_JWT_EXPIRATION_HOURS,
        )?;
        if !(1..=auth::MAX_JWT_EXPIRATION_HOURS).contains(&jwt_expiration_hours) {
            anyhow::bail!(
                "HAULIER_JWT_EXPIRATION_HOURS must be between 1 and {}, got {jwt_expiration_hours}",
                auth::MAX_JWT_EXPIRATION_HOURS
            );
        }

        Ok(Self {
            host: var("HAULIER_SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(var("PORT"), "PORT", 3000)?,
            store_backend,
            database_url,
            database_max_connections: parse_or(
                var("HAULIER_DATABASE_MAX_CONNECTIONS"),
                "HAULIER_DATABASE_MAX_CONNECTIONS",
                5,
            )?,
            jwt_secret,
            jwt_expiration_hours,
            google_api_key: var("GOOGLE_API_KEY"),
            geocoding_base_url: var("HAULIER_GEOCODING_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GOOGLE_BASE_URL.to_string()),
            geocoding_timeout: Duration::from_secs(parse_or(
                var("HAULIER_GEOCODING_TIMEOUT_SECS"),
                "HAULIER_GEOCODING_TIMEOUT_SECS",
                10,
            )?),
            request_timeout: Duration::from_secs(parse_or(
                var("HAULIER_REQUEST_TIMEOUT_SECS"),
                "HAULIER_REQUEST_TIMEOUT_SECS",
                30,
            )?),
            log_level: var("HAULIER_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

fn database_url_from_parts(var: &impl Fn(&str) -> Option<String>) -> Option<String> {
    let host = var("DATABASE_HOST")?;
    let username = var("DATABASE_USERNAME")?;
    let password = var("DATABASE_PASSWORD")?;
    let name = var("DATABASE_NAME")?;

    Some(format!(
        "postgres://{}:{}@{}/{}",
        urlencoding::encode(&username),
        urlencoding::encode(&password),
        host,
        name
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        let err = load(&[("HAULIER_STORE", "memory")]).unwrap_err();
        assert!(err.to_string().contains("HAULIER_JWT_SECRET"));
    }

    #[test]
    fn test_blank_jwt_secret_fails() {
        assert!(load(&[("HAULIER_STORE", "memory"), ("HAULIER_JWT_SECRET", "  ")]).is_err());
    }

    #[test]
    fn test_memory_defaults() {
        let config = load(&[("HAULIER_STORE", "memory"), ("HAULIER_JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.port, 3000);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.jwt_expiration_hours, 24);
        assert!(config.google_api_key.is_none());
        assert_eq!(config.geocoding_base_url, DEFAULT_GOOGLE_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_postgres_requires_database() {
        let err = load(&[("HAULIER_JWT_SECRET", "s3cret")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_database_url_from_parts() {
        let config = load(&[
            ("HAULIER_JWT_SECRET", "s3cret"),
            ("DATABASE_HOST", "db:5432"),
            ("DATABASE_USERNAME", "haul"),
            ("DATABASE_PASSWORD", "p@ss/word"),
            ("DATABASE_NAME", "haulier"),
        ])
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://haul:p%40ss%2Fword@db:5432/haulier")
        );
    }

    #[test]
    fn test_database_url_wins_over_parts() {
        let config = load(&[
            ("HAULIER_JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://direct/db"),
            ("DATABASE_HOST", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://direct/db"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = load(&[
            ("HAULIER_STORE", "memory"),
            ("HAULIER_JWT_SECRET", "s3cret"),
            ("PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_jwt_expiration_out_of_range_rejected() {
        for hours in ["0", "8761", "18446744073709551615"] {
            let err = load(&[
                ("HAULIER_STORE", "memory"),
                ("HAULIER_JWT_SECRET", "s3cret"),
                ("HAULIER_JWT_EXPIRATION_HOURS", hours),
            ])
            .unwrap_err();
            assert!(err.to_string().contains("HAULIER_JWT_EXPIRATION_HOURS"), "{hours}");
        }

        let config = load(&[
            ("HAULIER_STORE", "memory"),
            ("HAULIER_JWT_SECRET", "s3cret"),
            ("HAULIER_JWT_EXPIRATION_HOURS", "8760"),
        ])
        .unwrap();
        assert_eq!(config.jwt_expiration_hours, 8760);
    }

    #[test]
    fn test_unknown_store_backend_rejected() {
        assert!(load(&[("HAULIER_STORE", "mongo"), ("HAULIER_JWT_SECRET", "s3cret")]).is_err());
    }
}
