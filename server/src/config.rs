//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use thiserror::Error;

pub const ADDR_VAR: &str = "KAFKA_LOG_ADDR";
pub const MAX_POLL_RECORDS_VAR: &str = "KAFKA_LOG_MAX_POLL_RECORDS";

pub const DEFAULT_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 50051));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address {value:?}: {source}")]
    Addr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("invalid KAFKA_LOG_MAX_POLL_RECORDS {0:?}: expected a positive integer")]
    MaxPollRecords(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the gRPC server listens on.
    pub addr: SocketAddr,

    /// Upper bound on records returned per key by one poll. When `None`
    /// (the default) a poll returns everything from the requested offset on.
    pub max_poll_records: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR,
            max_poll_records: None,
        }
    }
}

impl Config {
    /// Reads `KAFKA_LOG_ADDR` and `KAFKA_LOG_MAX_POLL_RECORDS`, falling back to
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = match lookup(ADDR_VAR) {
            Some(value) => parse_addr(&value)?,
            None => DEFAULT_ADDR,
        };

        let max_poll_records = match lookup(MAX_POLL_RECORDS_VAR) {
            None => None,
            Some(value) => match value.parse::<usize>() {
                Ok(max) if max > 0 => Some(max),
                _ => return Err(ConfigError::MaxPollRecords(value)),
            },
        };

        Ok(Self {
            addr,
            max_poll_records,
        })
    }

    pub fn with_addr(mut self, addr: &str) -> Result<Self, ConfigError> {
        self.addr = parse_addr(addr)?;
        Ok(self)
    }
}

fn parse_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|source| ConfigError::Addr {
        value: value.to_string(),
        source,
    })
}
