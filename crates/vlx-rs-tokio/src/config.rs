//! Client configuration, deserialized from JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Keep-alive settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Seconds between two keep-alive pulses.
    pub interval_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl HeartbeatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Settings of the gateway connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Seconds an API call may wait for the gateway to complete the exchange.
    pub api_timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { api_timeout_secs: 10 }
    }
}

impl ConnectionConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub heartbeat: HeartbeatConfig,
    pub connection: ConnectionConfig,
}

impl GatewayConfig {
    /// Parses and validates a JSON configuration. Missing fields take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat.interval_secs == 0 {
            return Err(ConfigError::InvalidValue("heartbeat.interval_secs must be greater than 0"));
        }
        if self.connection.api_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "connection.api_timeout_secs must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Errors raised while loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The input is not valid JSON or does not match the schema.
    Parse(serde_json::Error),
    /// A field holds a value outside its allowed range.
    InvalidValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Failed to parse configuration: {}", e),
            Self::InvalidValue(s) => write!(f, "Invalid configuration: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::InvalidValue(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
