use retrace_core::RetraceConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `explicit` when given, otherwise fall back to the default locations.
    pub async fn load(explicit: Option<&Path>) -> Result<RetraceConfig, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path).await,
            None => Self::load_default().await,
        }
    }

    /// Config files looked up when none is given, in priority order:
    /// 1. ./retrace.yaml
    /// 2. ~/.retrace/config.yaml
    pub fn default_locations() -> Vec<PathBuf> {
        // Current directory
        let mut locations = vec![PathBuf::from("./retrace.yaml")];

        // Home directory
        if let Some(home) = dirs::home_dir() {
            locations.push(home.join(".retrace").join("config.yaml"));
        }

        locations
    }

    /// Load the first existing default location, or the default configuration.
    pub async fn load_default() -> Result<RetraceConfig, ConfigError> {
        for path in Self::default_locations() {
            if path.exists() {
                debug!("Loading config from {}", path.display());
                return Self::load_from(&path).await;
            }
        }

        // Return default
        Ok(RetraceConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<RetraceConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: RetraceConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
