use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::config::DistributorConfig;

pub fn exec(config_path: PathBuf, force: bool) -> Result<()> {
    // Error if the configuration file already exists.
    if config_path.exists() && !force {
        return Err(anyhow!(
            "Configuration file already exists at {}",
            config_path.display()
        ));
    }

    DistributorConfig::default().write(&config_path)?;
    info!("Configuration file written to {}", config_path.display());
    Ok(())
}
