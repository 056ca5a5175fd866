use lazy_static::lazy_static;
use regex::Regex;
use std::{env, fmt, str::FromStr, time::Duration};
use thiserror::Error;

lazy_static! {
    // scheme://user:password@ -> captures everything before the password.
    static ref DSN_PASSWORD: Regex =
        Regex::new(r"^(?P<prefix>[A-Za-z][A-Za-z0-9+.-]*://[^:/@]*):[^@]*@").unwrap();
}

/// Deployment flavour; selects the log format and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Prod,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "prod" => Ok(Environment::Prod),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// `host:port` to listen on.
    pub address: String,
    /// Read and write timeout for a single request.
    pub timeout: Duration,
    /// Keep-alive for idle connections.
    pub idle_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub env: Environment,
    pub database_url: String,
    pub max_connections: u32,
    pub http: HttpConfig,
    /// Upper bound for the `/healthz` store probe.
    pub health_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment, after loading a
    /// `.env` file if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env = match get("APP_ENV") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "APP_ENV",
                value: raw,
            })?,
            None => Environment::Local,
        };

        let database_url = get("DATABASE_URL")
            .or_else(|| get("POSTGRES_URL"))
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let address = match (get("HTTP_ADDRESS"), get("PORT")) {
            (Some(address), _) => address,
            (None, Some(port)) => format!("0.0.0.0:{}", parse_var::<u16>("PORT", port)?),
            (None, None) => {
                let host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
                let port = parse_or("SERVER_PORT", get("SERVER_PORT"), 8080u16)?;
                format!("{}:{}", host, port)
            }
        };

        Ok(Self {
            env,
            database_url,
            max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                10,
            )?,
            http: HttpConfig {
                address,
                timeout: secs_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), 4)?,
                idle_timeout: secs_or("HTTP_IDLE_TIMEOUT_SECS", get("HTTP_IDLE_TIMEOUT_SECS"), 60)?,
            },
            health_timeout: secs_or("HEALTH_TIMEOUT_SECS", get("HEALTH_TIMEOUT_SECS"), 10)?,
        })
    }

    /// The database URL with any password replaced, safe to log.
    pub fn masked_database_url(&self) -> String {
        mask_dsn(&self.database_url)
    }
}

pub fn mask_dsn(dsn: &str) -> String {
    DSN_PASSWORD.replace(dsn, "$prefix:****@").into_owned()
}

fn parse_var<T: FromStr>(var: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value: raw })
}

fn parse_or<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    raw.map_or(Ok(default), |raw| parse_var(var, raw))
}

fn secs_or(var: &'static str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    parse_or(var, raw, default).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://test")]).unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.env, Environment::Local);
        assert_eq!(config.http.address, "127.0.0.1:8080");
        assert_eq!(config.http.timeout, Duration::from_secs(4));
        assert_eq!(config.http.idle_timeout, Duration::from_secs(60));
        assert_eq!(config.health_timeout, Duration::from_secs(10));
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_address_precedence() {
        let config = load(&[
            ("DATABASE_URL", "postgres://test"),
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.http.address, "0.0.0.0:3000");

        let config = load(&[("DATABASE_URL", "postgres://test"), ("PORT", "9000")]).unwrap();
        assert_eq!(config.http.address, "0.0.0.0:9000");

        let config = load(&[
            ("DATABASE_URL", "postgres://test"),
            ("PORT", "9000"),
            ("HTTP_ADDRESS", "localhost:8082"),
        ])
        .unwrap();
        assert_eq!(config.http.address, "localhost:8082");
    }

    #[test]
    fn test_postgres_url_alias_and_prod() {
        let config = load(&[("POSTGRES_URL", "postgres://alias"), ("APP_ENV", "PROD")]).unwrap();
        assert_eq!(config.database_url, "postgres://alias");
        assert_eq!(config.env, Environment::Prod);
    }

    #[test]
    fn test_errors() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        assert_eq!(
            load(&[("DATABASE_URL", "postgres://test"), ("APP_ENV", "staging")]),
            Err(ConfigError::Invalid {
                var: "APP_ENV",
                value: "staging".to_string()
            })
        );
        assert!(matches!(
            load(&[("DATABASE_URL", "postgres://test"), ("HTTP_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::Invalid {
                var: "HTTP_TIMEOUT_SECS",
                ..
            })
        ));
    }

    #[test]
    fn test_mask_dsn() {
        assert_eq!(
            mask_dsn("postgres://app:s3cr3t@db:5432/tasks?sslmode=disable"),
            "postgres://app:****@db:5432/tasks?sslmode=disable"
        );
        assert_eq!(mask_dsn("postgres://app@db/tasks"), "postgres://app@db/tasks");
        assert_eq!(mask_dsn("postgres://db/tasks"), "postgres://db/tasks");
    }
}
