//! Bot configuration, loaded from a JSON file at startup.

use std::path::Path;

use gcwarden_protocol::AppId;
use gcwarden_registry::RegistryConfig;
use serde::{Deserialize, Serialize};

use crate::WardenError;

/// Logon credentials for the remote service.
///
/// The core never touches these; they are handed to whichever
/// [`CoordinatorLink`](gcwarden_link::CoordinatorLink) implementation
/// performs the actual logon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub account_name: String,
    pub password: String,
}

/// Full bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Port the HTTP control API listens on.
    pub port: u16,

    /// Shared secret every control request must present as `?key=`.
    pub key: String,

    /// The application whose coordinator is targeted.
    pub app: AppId,

    /// Target registry bounds (capacity, maximum TTL).
    pub registry: RegistryConfig,

    /// Remote-service logon credentials, consumed by the link
    /// implementation at startup.
    pub login: Option<Credentials>,

    /// Whether to emit logs at all. `false` silences everything below
    /// error level.
    pub logging: bool,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            key: String::new(),
            app: AppId::DEFAULT,
            registry: RegistryConfig::default(),
            login: None,
            logging: true,
        }
    }
}

impl WardenConfig {
    /// Loads the configuration from a JSON file.
    ///
    /// # Errors
    /// Returns [`WardenError::Io`] if the file can't be read and
    /// [`WardenError::Config`] if it doesn't parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WardenError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WardenConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.app, AppId::DEFAULT);
        assert!(config.logging);
        assert!(config.login.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: WardenConfig =
            serde_json::from_str(r#"{"key": "hunter2", "port": 9000}"#)
                .unwrap();
        assert_eq!(config.key, "hunter2");
        assert_eq!(config.port, 9000);
        assert_eq!(config.registry.max_targets, 10);
    }

    #[test]
    fn test_full_json_round_trips() {
        let config = WardenConfig {
            key: "secret".into(),
            login: Some(Credentials {
                account_name: "bot".into(),
                password: "pw".into(),
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: WardenConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key, "secret");
        assert_eq!(back.login.unwrap().account_name, "bot");
    }
}
