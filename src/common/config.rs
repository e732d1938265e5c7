// src/common/config.rs

use super::timing::{EXCHANGE_TIMEOUT_MAX, EXCHANGE_TIMEOUT_MIN};
use super::variant::Variant;
use alloc::string::String;
use core::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Timeout override outside the 1.0 to 5.0 second window (or not finite).
    #[error("Timeout of {0} s is outside the allowed window of 1 to 5 s")]
    InvalidTimeout(f64),

    #[cfg(feature = "std")]
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "std")]
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything needed to set up one instrument connection.
///
/// ```toml
/// port_name = "K6487_1"
/// io_port = "serial1"
/// variant = "6487"
/// timeout_secs = 2.5
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(serde::Deserialize))]
#[cfg_attr(feature = "std", serde(deny_unknown_fields))]
pub struct ConnectionSettings {
    /// Name under which the connection is registered with the host.
    pub port_name: String,
    /// Transport port the instrument hangs off.
    pub io_port: String,
    /// Device address on the transport port.
    #[cfg_attr(feature = "std", serde(default))]
    pub io_address: i32,
    pub variant: Variant,
    /// Overrides the variant's default exchange timeout.
    #[cfg_attr(feature = "std", serde(default))]
    pub timeout_secs: Option<f64>,
    /// Send an empty line before clearing status; recovers some instruments
    /// after a cold boot.
    #[cfg_attr(feature = "std", serde(default))]
    pub flush_on_connect: bool,
}

impl ConnectionSettings {
    pub fn new(port_name: impl Into<String>, io_port: impl Into<String>, variant: Variant) -> Self {
        ConnectionSettings {
            port_name: port_name.into(),
            io_port: io_port.into(),
            io_address: 0,
            variant,
            timeout_secs: None,
            flush_on_connect: false,
        }
    }

    pub fn with_address(mut self, io_address: i32) -> Self {
        self.io_address = io_address;
        self
    }

    pub fn with_timeout_secs(mut self, secs: f64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_flush_on_connect(mut self, flush: bool) -> Self {
        self.flush_on_connect = flush;
        self
    }

    /// Exchange timeout in effect for this connection.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        let Some(secs) = self.timeout_secs else {
            return Ok(self.variant.default_timeout());
        };
        let min = EXCHANGE_TIMEOUT_MIN.as_secs_f64();
        let max = EXCHANGE_TIMEOUT_MAX.as_secs_f64();
        if !secs.is_finite() || secs < min || secs > max {
            return Err(ConfigError::InvalidTimeout(secs));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}

#[cfg(feature = "std")]
impl ConnectionSettings {
    /// Parses settings from TOML text and validates the timeout.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: ConnectionSettings = toml::from_str(content)?;
        settings.timeout()?;
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
