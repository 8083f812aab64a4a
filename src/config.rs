// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names and defaults. Blank values count as unset.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `NOTIFI_ENV` | `Production`, `Staging`, `Development` or `Local` | `Production` |
//! | `NOTIFI_GQL_URL` | Overrides the environment's GraphQL endpoint | Derived from `NOTIFI_ENV` |
//! | `NOTIFI_DAPP_ADDRESS` | Dapp address issued by Notifi | Required |
//! | `NOTIFI_HTTP_TIMEOUT_SECS` | HTTP request timeout | `15` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::time::Duration;

use url::Url;

use crate::error::{NotifiError, NotifiResult};

pub const NOTIFI_ENV: &str = "NOTIFI_ENV";
pub const NOTIFI_GQL_URL: &str = "NOTIFI_GQL_URL";
pub const NOTIFI_DAPP_ADDRESS: &str = "NOTIFI_DAPP_ADDRESS";
pub const NOTIFI_HTTP_TIMEOUT_SECS: &str = "NOTIFI_HTTP_TIMEOUT_SECS";
pub const LOG_FORMAT: &str = "LOG_FORMAT";
pub const RUST_LOG: &str = "RUST_LOG";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOG_FILTER: &str = "info";

/// Deployment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifiEnvironment {
    #[default]
    Production,
    Staging,
    Development,
    Local,
}

impl NotifiEnvironment {
    /// Parse an environment name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" => Some(NotifiEnvironment::Production),
            "staging" => Some(NotifiEnvironment::Staging),
            "development" => Some(NotifiEnvironment::Development),
            "local" => Some(NotifiEnvironment::Local),
            _ => None,
        }
    }

    pub fn gql_url(&self) -> &'static str {
        match self {
            NotifiEnvironment::Production => "https://api.notifi.network/gql",
            NotifiEnvironment::Staging => "https://api.stg.notifi.network/gql",
            NotifiEnvironment::Development => "https://api.dev.notifi.network/gql",
            NotifiEnvironment::Local => "https://localhost:5001/gql",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Everything needed to reach the service on behalf of one dapp.
#[derive(Debug, Clone)]
pub struct NotifiConfig {
    pub environment: NotifiEnvironment,
    pub gql_url: Url,
    pub dapp_address: String,
    pub http_timeout: Duration,
    pub log: LogConfig,
}

impl NotifiConfig {
    pub fn from_env() -> NotifiResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `lookup` returns the raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> NotifiResult<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let environment = match var(NOTIFI_ENV) {
            Some(raw) => NotifiEnvironment::parse(&raw)
                .ok_or_else(|| NotifiError::Config(format!("unknown {NOTIFI_ENV}: {raw}")))?,
            None => NotifiEnvironment::default(),
        };

        let raw_url = var(NOTIFI_GQL_URL).unwrap_or_else(|| environment.gql_url().to_string());
        let gql_url = Url::parse(&raw_url)
            .map_err(|e| NotifiError::Config(format!("invalid {NOTIFI_GQL_URL} {raw_url}: {e}")))?;

        let dapp_address = var(NOTIFI_DAPP_ADDRESS)
            .ok_or_else(|| NotifiError::Config(format!("{NOTIFI_DAPP_ADDRESS} is required")))?;

        let http_timeout = match var(NOTIFI_HTTP_TIMEOUT_SECS) {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                NotifiError::Config(format!("invalid {NOTIFI_HTTP_TIMEOUT_SECS} {raw}: {e}"))
            })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let format = match var(LOG_FORMAT).map(|raw| raw.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let filter = var(RUST_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            environment,
            gql_url,
            dapp_address,
            http_timeout,
            log: LogConfig { format, filter },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_production() {
        let config = NotifiConfig::from_lookup(lookup(&[(NOTIFI_DAPP_ADDRESS, "dapp")])).unwrap();
        assert_eq!(config.environment, NotifiEnvironment::Production);
        assert_eq!(config.gql_url.as_str(), "https://api.notifi.network/gql");
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn environment_selects_endpoint() {
        let config = NotifiConfig::from_lookup(lookup(&[
            (NOTIFI_DAPP_ADDRESS, "dapp"),
            (NOTIFI_ENV, "development"),
        ]))
        .unwrap();
        assert_eq!(config.gql_url.as_str(), "https://api.dev.notifi.network/gql");
    }

    #[test]
    fn url_override_wins() {
        let config = NotifiConfig::from_lookup(lookup(&[
            (NOTIFI_DAPP_ADDRESS, "dapp"),
            (NOTIFI_ENV, "Staging"),
            (NOTIFI_GQL_URL, "http://127.0.0.1:8080/gql"),
        ]))
        .unwrap();
        assert_eq!(config.environment, NotifiEnvironment::Staging);
        assert_eq!(config.gql_url.as_str(), "http://127.0.0.1:8080/gql");
    }

    #[test]
    fn blank_dapp_address_is_missing() {
        let err = NotifiConfig::from_lookup(lookup(&[(NOTIFI_DAPP_ADDRESS, "  ")])).unwrap_err();
        assert!(matches!(err, NotifiError::Config(_)));
    }

    #[test]
    fn rejects_unknown_environment_and_bad_timeout() {
        let err = NotifiConfig::from_lookup(lookup(&[
            (NOTIFI_DAPP_ADDRESS, "dapp"),
            (NOTIFI_ENV, "moon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, NotifiError::Config(_)));

        let err = NotifiConfig::from_lookup(lookup(&[
            (NOTIFI_DAPP_ADDRESS, "dapp"),
            (NOTIFI_HTTP_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, NotifiError::Config(_)));
    }

    #[test]
    fn logging_settings_are_read() {
        let config = NotifiConfig::from_lookup(lookup(&[
            (NOTIFI_DAPP_ADDRESS, "dapp"),
            (LOG_FORMAT, "JSON"),
            (RUST_LOG, "notifi_alerts=debug"),
        ]))
        .unwrap();
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.filter, "notifi_alerts=debug");
    }
}
