//! Application configuration loaded from environment variables.

use domain::ProviderId;
use locker::LockerConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parses `text` or `json`; anything else is text.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `DATABASE_URL`: PostgreSQL store; in-memory store when unset
/// - `LOCKER`: lock backend name (default: `"memory"`)
/// - `LOCKER_URL`: lock backend URL (default: `DATABASE_URL`)
/// - `PAYMENT_PROVIDER`: provider id (default: `"sandbox"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub locker: LockerConfig,
    pub payment_provider: ProviderId,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let database_url = get("DATABASE_URL").filter(|url| !url.is_empty());

        let payment_provider = match get("PAYMENT_PROVIDER") {
            Some(name) => name.parse::<ProviderId>().unwrap_or_else(|err: String| {
                tracing::warn!(error = %err, "using default payment provider");
                defaults.payment_provider
            }),
            None => defaults.payment_provider,
        };

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: get("LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or_default(),
            locker: LockerConfig {
                backend: get("LOCKER").unwrap_or(defaults.locker.backend),
                url: get("LOCKER_URL").or_else(|| database_url.clone()),
                ..defaults.locker
            },
            database_url,
            payment_provider,
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            database_url: None,
            locker: LockerConfig::default(),
            payment_provider: ProviderId::Sandbox,
        }
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.locker.backend, "memory");
        assert_eq!(config.payment_provider, ProviderId::Sandbox);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert!(config.database_url.is_none());
        assert!(config.locker.url.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("LOG_FORMAT", "JSON"),
            ("DATABASE_URL", "postgres://db/orders"),
            ("LOCKER", "postgres"),
            ("PAYMENT_PROVIDER", "stripe"),
        ]));
        assert_eq!(config.port, 8081);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.locker.backend, "postgres");
        assert_eq!(config.locker.url.as_deref(), Some("postgres://db/orders"));
        assert_eq!(config.payment_provider, ProviderId::Stripe);
    }

    #[test]
    fn test_locker_url_overrides_database_url() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/orders"),
            ("LOCKER_URL", "postgres://locks/orders"),
        ]));
        assert_eq!(config.locker.url.as_deref(), Some("postgres://locks/orders"));
    }

    #[test]
    fn test_bad_port_and_provider_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "not-a-port"),
            ("PAYMENT_PROVIDER", "barter"),
        ]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.payment_provider, ProviderId::Sandbox);
    }
}
