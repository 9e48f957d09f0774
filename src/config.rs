//! Client configuration
//!
//! Loaded from TOML or assembled with [`ClientConfigBuilder`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ProtocolError, ProtocolResult};
use crate::executor::RespConnection;
use crate::resp::codec::DEFAULT_MAX_FRAME_SIZE;

/// Connection settings for a [`RespConnection`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `host:port` of the server
    pub address: String,

    /// Deadline for establishing the TCP connection
    pub connect_timeout_ms: u64,

    /// Deadline for one command round trip
    pub request_timeout_ms: u64,

    /// Largest bulk string accepted from the server
    pub max_frame_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:6379".to_string(),
            connect_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl ClientConfig {
    /// Get a builder for configuring a new client
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Load configuration from TOML file
    pub async fn load_from_file(path: &Path) -> ProtocolResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML document
    pub fn from_toml_str(content: &str) -> ProtocolResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> ProtocolResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.address.trim().is_empty() {
            return Err(ProtocolError::ConfigError(
                "address must not be empty".to_string(),
            ));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ProtocolError::ConfigError(
                "connect_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ProtocolError::ConfigError(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_frame_size == 0 {
            return Err(ProtocolError::ConfigError(
                "max_frame_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for configuring and connecting a client
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address<S: Into<String>>(mut self, address: S) -> Self {
        self.config.address = address.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_ms = duration_to_millis(timeout);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout_ms = duration_to_millis(timeout);
        self
    }

    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.config.max_frame_size = max_frame_size;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> ProtocolResult<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Validate and open a connection
    pub async fn connect(self) -> ProtocolResult<RespConnection> {
        RespConnection::connect(self.build()?).await
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ClientConfig::from_toml_str("address = \"10.0.0.7:6380\"\n").unwrap();
        assert_eq!(config.address, "10.0.0.7:6380");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_config_serialization() {
        let config = ClientConfig::builder()
            .with_address("cache:6379")
            .with_request_timeout(Duration::from_millis(250))
            .build()
            .unwrap();
        let toml_str = config.to_toml().unwrap();
        assert_eq!(ClientConfig::from_toml_str(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_validation_failures() {
        let empty = ClientConfig::builder().with_address(" ").build();
        assert!(matches!(empty, Err(ProtocolError::ConfigError(_))));

        let zero = ClientConfig::builder()
            .with_connect_timeout(Duration::ZERO)
            .build();
        assert!(matches!(zero, Err(ProtocolError::ConfigError(_))));

        assert!(matches!(
            ClientConfig::from_toml_str("max_frame_size = 0"),
            Err(ProtocolError::ConfigError(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("address = 5"),
            Err(ProtocolError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        tokio::fs::write(&path, "address = \"localhost:7000\"\nconnect_timeout_ms = 100\n")
            .await
            .unwrap();

        let config = ClientConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.address, "localhost:7000");
        assert_eq!(config.connect_timeout(), Duration::from_millis(100));
    }
}
