//! Process configuration from the environment.
//!
//! `LEDGER` and `TABLE` must be present at process start; startup fails
//! immediately if either is missing.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

pub const ENV_LEDGER: &str = "LEDGER";
pub const ENV_TABLE: &str = "TABLE";
pub const ENV_LEDGER_ENDPOINT: &str = "LEDGER_ENDPOINT";
pub const ENV_LISTEN_ADDR: &str = "LISTEN_ADDR";

const DEFAULT_LEDGER_ENDPOINT: &str = "http://localhost:8081";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be defined")]
    MissingVar { name: &'static str },

    #[error("{name} is not a valid listen address: {source}")]
    InvalidListenAddr {
        name: &'static str,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Environment-derived configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the ledger this process serves.
    pub ledger: String,
    /// Target table for submitted documents.
    pub table: String,
    /// Base URL of the ledger service.
    pub ledger_endpoint: String,
    /// Address the submission surface binds to.
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Read configuration from the environment, failing fast on anything
    /// missing or unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            ledger: required(ENV_LEDGER)?,
            table: required(ENV_TABLE)?,
            ledger_endpoint: std::env::var(ENV_LEDGER_ENDPOINT)
                .unwrap_or_else(|_| DEFAULT_LEDGER_ENDPOINT.to_owned()),
            listen_addr: std::env::var(ENV_LISTEN_ADDR)
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_owned())
                .parse()
                .map_err(|source| ConfigError::InvalidListenAddr {
                    name: ENV_LISTEN_ADDR,
                    source,
                })?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar { name }),
    }
}
