//! Service configuration read from the environment

use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Limits for open editing sessions
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub max_capacity: u64,
    /// Maximum lifetime of a session
    pub time_to_live: Duration,
    /// Sessions untouched this long are dropped
    pub time_to_idle: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            time_to_live: Duration::from_secs(8 * 60 * 60),
            time_to_idle: Duration::from_secs(30 * 60),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub sessions: SessionSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            sessions: SessionSettings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let host = lookup("QUOTE_ENGINE_HOST").unwrap_or(defaults.host);
        let port = parse(&lookup, "QUOTE_ENGINE_PORT")?.unwrap_or(defaults.port);
        let max_capacity =
            parse(&lookup, "QUOTE_SESSION_MAX")?.unwrap_or(defaults.sessions.max_capacity);
        let time_to_live = parse(&lookup, "QUOTE_SESSION_TTL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.sessions.time_to_live);
        let time_to_idle = parse(&lookup, "QUOTE_SESSION_IDLE_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.sessions.time_to_idle);

        Ok(Self {
            host,
            port,
            sessions: SessionSettings {
                max_capacity,
                time_to_live,
                time_to_idle,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "QUOTE_ENGINE_HOST",
                value: self.host.clone(),
            })
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8090");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("QUOTE_ENGINE_HOST", "127.0.0.1"),
            ("QUOTE_ENGINE_PORT", "9000"),
            ("QUOTE_SESSION_MAX", "50"),
            ("QUOTE_SESSION_TTL_SECS", "3600"),
            ("QUOTE_SESSION_IDLE_SECS", " 600 "),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().port(), 9000);
        assert_eq!(config.sessions.max_capacity, 50);
        assert_eq!(config.sessions.time_to_live, Duration::from_secs(3600));
        assert_eq!(config.sessions.time_to_idle, Duration::from_secs(600));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = Config::from_lookup(lookup(&[("QUOTE_ENGINE_PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "QUOTE_ENGINE_PORT",
                value: "eighty".to_string()
            }
        );
    }
}
