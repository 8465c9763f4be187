//! Link configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via CODRONE_CONFIG)
//! 3. Environment variables

use codrone_protocol::{DeviceType, MAX_PAYLOAD_SIZE, START_BYTES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Link configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Receiver framing configuration.
    pub receiver: ReceiverConfig,
    /// Addressing and acknowledgment configuration.
    pub link: LinkConfig,
}

impl Config {
    /// Loads configuration from file, then applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("CODRONE_CONFIG") {
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    /// Loads configuration from environment variables only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.receiver.apply_env_overrides();
        self.link.apply_env_overrides();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.receiver.validate()?;
        self.link.validate()
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Ok(())
    }
}

/// Receiver framing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Two-byte sentinel preceding every frame.
    pub start_bytes: [u8; 2],
    /// Largest accepted payload length.
    pub max_payload_size: usize,
    /// A frame in progress longer than this is dropped on the next byte.
    pub frame_timeout_ms: u64,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            start_bytes: START_BYTES,
            max_payload_size: MAX_PAYLOAD_SIZE,
            frame_timeout_ms: 600,
        }
    }
}

impl ReceiverConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("CODRONE_START_BYTES") {
            if let Some(bytes) = parse_start_bytes(&value) {
                self.start_bytes = bytes;
            }
        }

        if let Ok(value) = std::env::var("CODRONE_MAX_PAYLOAD") {
            if let Ok(size) = value.parse() {
                self.max_payload_size = size;
            }
        }

        if let Ok(value) = std::env::var("CODRONE_FRAME_TIMEOUT_MS") {
            if let Ok(ms) = value.parse() {
                self.frame_timeout_ms = ms;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // The header length field is a single byte.
        if self.max_payload_size > u8::MAX as usize {
            return Err(ConfigError::ValidationError(format!(
                "max_payload_size {} exceeds 255",
                self.max_payload_size
            )));
        }
        if self.frame_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "frame_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns frame timeout as Duration.
    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }
}

/// Addressing and acknowledgment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Address written into the `from` field of outbound frames.
    #[serde(with = "device_serde")]
    pub local_device: DeviceType,
    /// Address written into the `to` field of outbound frames.
    #[serde(with = "device_serde")]
    pub remote_device: DeviceType,
    /// How long `send_with_ack` waits before giving up.
    pub ack_timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            local_device: DeviceType::Base,
            remote_device: DeviceType::Drone,
            ack_timeout_ms: 1000,
        }
    }
}

impl LinkConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("CODRONE_LOCAL_DEVICE") {
            if let Some(device) = parse_device(&value) {
                self.local_device = device;
            }
        }

        if let Ok(value) = std::env::var("CODRONE_REMOTE_DEVICE") {
            if let Some(device) = parse_device(&value) {
                self.remote_device = device;
            }
        }

        if let Ok(value) = std::env::var("CODRONE_ACK_TIMEOUT_MS") {
            if let Ok(ms) = value.parse() {
                self.ack_timeout_ms = ms;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ack_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "ack_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns ack timeout as Duration.
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }
}

/// Parses a byte written as hex (`0x10`, `10h` is not accepted) or decimal.
fn parse_byte(s: &str) -> Option<u8> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

/// Parses `"0x0A,0x55"`, `"0x0A 0x55"` or `"10 85"`.
pub fn parse_start_bytes(s: &str) -> Option<[u8; 2]> {
    let mut parts = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());
    let first = parse_byte(parts.next()?)?;
    let second = parse_byte(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some([first, second])
}

/// Parses a device by name (case-insensitive) or by wire value.
pub fn parse_device(s: &str) -> Option<DeviceType> {
    let s = s.trim();
    DeviceType::ALL
        .iter()
        .copied()
        .find(|device| format!("{:?}", device).eq_ignore_ascii_case(s))
        .or_else(|| parse_byte(s).and_then(|b| DeviceType::try_from(b).ok()))
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Custom serde module for DeviceType (by name in YAML).
mod device_serde {
    use super::parse_device;
    use codrone_protocol::DeviceType;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(device: &DeviceType, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:?}", device))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DeviceType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_device(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown device: {}", s)))
    }
}
