//! Widget and service configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{prelude::*, reconcile::ReconciliationInput};

/// Address the service binds to when nothing else is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Result pane settings of a widget.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Height of the result pane, `0` for auto.
    pub result_height: u32,
    /// Output the program is expected to produce.
    pub expected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: String::from(DEFAULT_BIND),
        }
    }
}

/// Configuration loaded from a TOML file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpConfig {
    pub widget: WidgetConfig,
    pub server: ServerConfig,
}

impl GpConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }
    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }
}

impl WidgetConfig {
    pub fn input(&self, loading: bool) -> ReconciliationInput {
        ReconciliationInput {
            expected: self.expected.clone(),
            loading,
            result_height: self.result_height,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    pub fn deserialize() -> Result<()> {
        let content = r#"
            # Result pane of the hello world widget
            [widget]
            result_height = 80
            expected = "Hello, playground\n"

            [server]
            bind = "0.0.0.0:8080"
        "#;
        let config = GpConfig::from_toml(content)?;

        assert_eq!(config.widget.result_height, 80);
        assert_eq!(
            config.widget.expected.as_deref(),
            Some("Hello, playground\n")
        );
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        Ok(())
    }

    #[test]
    pub fn empty_file_uses_defaults() -> Result<()> {
        let config = GpConfig::from_toml("")?;

        assert_eq!(config, GpConfig::default());
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.widget.input(true).result_height, 0);
        Ok(())
    }

    #[test]
    pub fn rejects_wrong_types() {
        let err = GpConfig::from_toml("[widget]\nresult_height = \"tall\"").unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }
}
