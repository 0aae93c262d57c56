use crate::ports::{parse_port_str, parse_positive_integer};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::path::Path;
use thiserror::Error;

/// Config file errors, split so callers can tell a missing key from a
/// malformed one.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("open config file failed: {0}")]
    Open(#[source] std::io::Error),

    #[error("config not found: {0}")]
    NotFound(&'static str),

    #[error("config invalid: {0}")]
    Invalid(&'static str),
}

/// Scan parameters read from a `key = value` config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ip: Ipv4Addr,
    pub port_start: u16,
    pub port_end: u16,
    pub timeout_millisec: u64,
}

/// Parse `key = value` lines into a map.
///
/// Keys and values are whitespace-trimmed; lines without a `=` or with an
/// empty key or value are skipped. The first occurrence of a key wins.
pub fn parse_config_str(s: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in s.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        map.entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
    map
}

impl Config {
    /// Read and extract a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Open)?;
        Self::from_map(&parse_config_str(&content))
    }

    /// Extract the required keys from a parsed map.
    ///
    /// All keys are checked for presence before any value is parsed, and
    /// `port_start`/`port_end` are normalized so that start <= end.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let ip_raw = map.get("ip").ok_or(ConfigError::NotFound("ip"))?;
        let start_raw = map
            .get("port_start")
            .ok_or(ConfigError::NotFound("port_start"))?;
        let end_raw = map
            .get("port_end")
            .ok_or(ConfigError::NotFound("port_end"))?;
        let timeout_raw = map
            .get("timeout_millisec")
            .ok_or(ConfigError::NotFound("timeout_millisec"))?;

        let ip = ip_raw
            .parse::<Ipv4Addr>()
            .map_err(|_| ConfigError::Invalid("ip"))?;
        let port_start = parse_port_str(start_raw).map_err(|_| ConfigError::Invalid("port_start"))?;
        let port_end = parse_port_str(end_raw).map_err(|_| ConfigError::Invalid("port_end"))?;
        let timeout_millisec =
            parse_positive_integer(timeout_raw).map_err(|_| ConfigError::Invalid("timeout_millisec"))?;

        Ok(Self {
            ip,
            port_start: port_start.min(port_end),
            port_end: port_start.max(port_end),
            timeout_millisec,
        })
    }
}
