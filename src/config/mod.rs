use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

pub const USERNAME_VAR: &str = "QUIRE_USERNAME";
pub const PASSWORD_VAR: &str = "QUIRE_PASSWORD";
pub const PAGES_DIR_VAR: &str = "QUIRE_PAGES_DIR";
pub const META_FILE_VAR: &str = "QUIRE_META_FILE";
pub const STATIC_DIR_VAR: &str = "QUIRE_STATIC_DIR";
pub const HOST_VAR: &str = "QUIRE_HOST";
pub const PORT_VAR: &str = "QUIRE_PORT";

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set to a non-empty value")]
    Missing(&'static str),

    #[error("QUIRE_PORT is not a valid port: {0:?}")]
    InvalidPort(String),

    #[error("QUIRE_HOST is not a valid IP address: {0:?}")]
    InvalidHost(String),
}

/// Application configuration and constants
#[derive(Debug, Clone)]
pub struct Config {
    pub pages_dir: PathBuf,
    pub meta_file: PathBuf,
    pub static_dir: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Both credentials are required. An unset username or password would
    /// otherwise compare equal to an empty Basic-auth header.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let username = required(USERNAME_VAR)?;
        let password = required(PASSWORD_VAR)?;

        let port = match lookup(PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let host = match lookup(HOST_VAR) {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|_| ConfigError::InvalidHost(raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        Ok(Self {
            pages_dir: PathBuf::from(lookup(PAGES_DIR_VAR).unwrap_or_else(|| "pages".to_string())),
            meta_file: PathBuf::from(
                lookup(META_FILE_VAR).unwrap_or_else(|| "meta/meta.csv".to_string()),
            ),
            static_dir: PathBuf::from(lookup(STATIC_DIR_VAR).unwrap_or_else(|| "static".to_string())),
            host,
            port,
            username,
            password,
        })
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
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
    fn defaults_apply_when_only_credentials_are_set() {
        let config =
            Config::from_lookup(lookup_from(&[(USERNAME_VAR, "alice"), (PASSWORD_VAR, "pw")]))
                .unwrap();
        assert_eq!(config.pages_dir, PathBuf::from("pages"));
        assert_eq!(config.meta_file, PathBuf::from("meta/meta.csv"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.socket_addr(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn missing_or_empty_credentials_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[(PASSWORD_VAR, "pw")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(USERNAME_VAR)));

        let err = Config::from_lookup(lookup_from(&[(USERNAME_VAR, "alice"), (PASSWORD_VAR, "")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(PASSWORD_VAR)));
    }

    #[test]
    fn overrides_and_bad_port() {
        let config = Config::from_lookup(lookup_from(&[
            (USERNAME_VAR, "alice"),
            (PASSWORD_VAR, "pw"),
            (PAGES_DIR_VAR, "/srv/wiki/pages"),
            (HOST_VAR, "127.0.0.1"),
            (PORT_VAR, "9000"),
        ]))
        .unwrap();
        assert_eq!(config.pages_dir, PathBuf::from("/srv/wiki/pages"));
        assert_eq!(config.socket_addr(), "127.0.0.1:9000".parse().unwrap());

        let err = Config::from_lookup(lookup_from(&[
            (USERNAME_VAR, "alice"),
            (PASSWORD_VAR, "pw"),
            (PORT_VAR, "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }
}
