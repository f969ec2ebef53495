// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SWEEP_INTERVAL_SECS` | Seconds between completed-update sweeps | `30` |
//! | `TLS_CERT_PATH` | PEM certificate chain; enables HTTPS with `TLS_KEY_PATH` | unset |
//! | `TLS_KEY_PATH` | PEM private key | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SWEEP_INTERVAL_ENV: &str = "SWEEP_INTERVAL_SECS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{present} is set but {missing} is not; TLS needs both")]
    IncompleteTls {
        present: &'static str,
        missing: &'static str,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Certificate and key for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub sweep_interval: Duration,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            tls: None,
            log_format: LogFormat::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup(HOST_ENV).unwrap_or(defaults.host);

        let port = match lookup(PORT_ENV) {
            Some(value) => value.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                value: value.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let sweep_interval = match lookup(SWEEP_INTERVAL_ENV) {
            Some(value) => {
                let secs = value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: SWEEP_INTERVAL_ENV,
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: SWEEP_INTERVAL_ENV,
                        value,
                        reason: "must be at least 1 second".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.sweep_interval,
        };

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            (Some(_), None) => {
                return Err(ConfigError::IncompleteTls {
                    present: TLS_CERT_PATH_ENV,
                    missing: TLS_KEY_PATH_ENV,
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteTls {
                    present: TLS_KEY_PATH_ENV,
                    missing: TLS_CERT_PATH_ENV,
                })
            }
            (None, None) => None,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                    reason: "expected `json` or `pretty`".to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            sweep_interval,
            tls,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: HOST_ENV,
                value: self.host.clone(),
                reason: e.to_string(),
            })
    }
}
