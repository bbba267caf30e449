//! Typed configuration from environment variables or a TOML file.
//!
//! Loads once at startup, fails fast on malformed values.
//! The Redis URL may embed a password, so it is wrapped in
//! secrecy::SecretString to prevent log leaks.

use crate::error::{Error, Result};
use crate::keys::KeyPolicy;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default Redis port.
pub const DEFAULT_PORT: u16 = 6379;
/// Default Redis host used when only a port is configured.
pub const DEFAULT_HOST: &str = "127.0.0.1";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix applied to every list and item key.
    pub keyspace: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Filesystem path of a Redis unix socket.
    pub unix_path: Option<PathBuf>,
    pub url: Option<SecretString>,
    pub key_policy: KeyPolicy,
    /// Consumer sleep between polls of an empty queue.
    pub poll_interval_ms: u64,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyspace: String::new(),
            host: None,
            port: None,
            unix_path: None,
            url: None,
            key_policy: KeyPolicy::default(),
            poll_interval_ms: 1000,
            otel_endpoint: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if present) and then read the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset ones fall back to [`Config::default`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            keyspace: std::env::var("LATER_KEYSPACE").unwrap_or(defaults.keyspace),
            host: optional_var("REDIS_HOST"),
            port: parsed_var("REDIS_PORT")?,
            unix_path: optional_var("REDIS_SOCKET").map(PathBuf::from),
            url: optional_var("REDIS_URL").map(SecretString::from),
            key_policy: parsed_var("LATER_KEY_POLICY")?.unwrap_or(defaults.key_policy),
            poll_interval_ms: parsed_var("LATER_POLL_INTERVAL_MS")?
                .unwrap_or(defaults.poll_interval_ms),
            otel_endpoint: optional_var("OTEL_ENDPOINT"),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Load configuration from a TOML file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Resolve the store endpoint.
    ///
    /// Precedence: host/port, then unix socket, then URL, then the local default.
    pub fn endpoint(&self) -> Endpoint {
        if self.host.is_some() || self.port.is_some() {
            Endpoint::Tcp {
                host: self
                    .host
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: self.port.unwrap_or(DEFAULT_PORT),
            }
        } else if let Some(ref path) = self.unix_path {
            Endpoint::Unix(path.clone())
        } else if let Some(ref url) = self.url {
            Endpoint::Url(url.clone())
        } else {
            Endpoint::Default
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Where the Redis store lives.
#[derive(Debug, Clone)]
pub enum Endpoint {
    Tcp { host: String, port: u16 },
    Unix(PathBuf),
    Url(SecretString),
    Default,
}

impl Endpoint {
    /// Connection URL understood by `redis::Client::open`.
    ///
    /// The result may contain credentials; don't log it.
    pub fn connection_url(&self) -> String {
        match self {
            Endpoint::Tcp { host, port } => format!("redis://{host}:{port}/"),
            Endpoint::Unix(path) => format!("redis+unix://{}", path.display()),
            Endpoint::Url(url) => url.expose_secret().to_string(),
            Endpoint::Default => format!("redis://{DEFAULT_HOST}:{DEFAULT_PORT}/"),
        }
    }

    /// Log-safe description of the endpoint.
    pub fn describe(&self) -> String {
        match self {
            Endpoint::Tcp { host, port } => format!("tcp {host}:{port}"),
            Endpoint::Unix(path) => format!("unix {}", path.display()),
            Endpoint::Url(_) => "url (redacted)".to_string(),
            Endpoint::Default => format!("tcp {DEFAULT_HOST}:{DEFAULT_PORT} (default)"),
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parsed_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_var(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| Error::Config(format!("invalid value for {name}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_port_win_over_everything() {
        let config = Config {
            port: Some(6380),
            unix_path: Some(PathBuf::from("/tmp/redis.sock")),
            url: Some(SecretString::from("redis://elsewhere:1/")),
            ..Config::default()
        };
        assert_eq!(config.endpoint().connection_url(), "redis://127.0.0.1:6380/");
    }

    #[test]
    fn unix_path_wins_over_url() {
        let config = Config {
            unix_path: Some(PathBuf::from("/tmp/redis.sock")),
            url: Some(SecretString::from("redis://elsewhere:1/")),
            ..Config::default()
        };
        assert_eq!(
            config.endpoint().connection_url(),
            "redis+unix:///tmp/redis.sock"
        );
    }

    #[test]
    fn url_is_redacted_in_description() {
        let config = Config {
            url: Some(SecretString::from("redis://:hunter2@cache:6379/1")),
            ..Config::default()
        };
        let endpoint = config.endpoint();
        assert_eq!(endpoint.connection_url(), "redis://:hunter2@cache:6379/1");
        assert!(!endpoint.describe().contains("hunter2"));
    }

    #[test]
    fn falls_back_to_local_default() {
        let endpoint = Config::default().endpoint();
        assert!(matches!(endpoint, Endpoint::Default));
        assert_eq!(endpoint.connection_url(), "redis://127.0.0.1:6379/");
    }
}
