use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::FileStorageProvider;

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if let Some(stripped) = s.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if s == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

/// Configuration for where an organization's state document lives.
///
/// Resolution order: config file, then environment overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateStoreConfig {
    /// Path of the persisted state document
    pub state_file: PathBuf,
}

impl Default for StateStoreConfig {
    fn default() -> Self {
        StateStoreConfig {
            state_file: PathBuf::from("organization-state.json"),
        }
    }
}

impl StateStoreConfig {
    /// Load configuration from the default config file and environment
    /// variables. A missing config file yields the defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        tracing::debug!("loading orgstate config from {:?}", config_path);
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        if let Ok(path) = env::var("ORGSTATE_STATE_FILE") {
            config.state_file = expand_tilde(&PathBuf::from(path));
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: StateStoreConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.state_file = expand_tilde(&config.state_file);

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get default config file path
    pub fn config_file_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".config/orgstate/config.yaml"))
            .context("Could not determine home directory for config file")
    }

    /// Storage provider reading and writing the configured state file.
    pub fn provider(&self) -> FileStorageProvider {
        FileStorageProvider::new(&self.state_file)
    }
}
