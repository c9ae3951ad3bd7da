//! Viewer Configuration

use chart_render::ChartConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Runtime configuration for the viewer service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Bind address for the HTTP listener
    pub bind_addr: String,

    /// Upload size cap in bytes
    pub max_upload_bytes: usize,

    /// Chart dimensions
    pub chart: ChartConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_upload_bytes: 32 * 1024 * 1024,
            chart: ChartConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from an optional `viewer.toml` layered with
    /// `VIEWER_*` environment variables; anything absent falls back to
    /// the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("viewer").required(false))
            .add_source(Environment::with_prefix("VIEWER").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.max_upload_bytes, 32 * 1024 * 1024);
        assert_eq!(config.chart.width, 1280);
    }
}
