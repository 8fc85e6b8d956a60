use std::path::PathBuf;

use anyhow::Result;

use crate::config::DistributorConfig;

pub fn exec(default: bool, config_path: PathBuf) -> Result<()> {
    let config = match default {
        true => DistributorConfig::default(),
        false => DistributorConfig::load_or_write_config(&config_path)?,
    };
    println!("{}", config.serialize()?);
    Ok(())
}
