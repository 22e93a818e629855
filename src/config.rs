use std::net::SocketAddr;

use anyhow::{Context, Result};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_JWT_EXPIRY_DAYS: i64 = 90;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_address: SocketAddr,
    pub max_connections: u32,
    pub jwt_expiry_days: i64,
}

impl Config {
    /// Reads the configuration from the process environment.
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned())
            .parse()
            .context("BIND_ADDRESS must be a socket address such as 127.0.0.1:3001")?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be greater than zero");
        }

        let jwt_expiry_days = match lookup("JWT_EXPIRY_DAYS") {
            Some(value) => value
                .parse()
                .context("JWT_EXPIRY_DAYS must be an integer")?,
            None => DEFAULT_JWT_EXPIRY_DAYS,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            bind_address,
            max_connections,
            jwt_expiry_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://chirp.db"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:3001".parse().unwrap());
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.jwt_expiry_days, 90);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[("JWT_SECRET", "secret")]));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://chirp.db"),
            ("JWT_SECRET", "secret"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]));
        assert!(result.is_err());

        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://chirp.db"),
            ("JWT_SECRET", "secret"),
            ("BIND_ADDRESS", "not-an-address"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://chirp.db"),
            ("JWT_SECRET", "secret"),
            ("BIND_ADDRESS", "0.0.0.0:8080"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("JWT_EXPIRY_DAYS", "7"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.jwt_expiry_days, 7);
    }
}
