use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use distributor::DatabaseConfig;
use distributor_registry::RegistryConfig;
use distributor_rpc::RpcConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The configuration file of the distributor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributorConfig {
    pub database: DatabaseConfig,
    pub rpc: RpcConfig,
    pub registry: RegistryConfig,
}

impl DistributorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))
    }

    /// Load the configuration file, writing the default configuration first if it doesn't exist.
    pub fn load_or_write_config(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "Configuration file not found, writing the default one to {}",
                path.display()
            );
            Self::default().write(path)?;
        }
        Self::load(path)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.serialize()?)
            .with_context(|| format!("Failed to write configuration file {}", path.display()))
    }

    pub fn serialize(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
