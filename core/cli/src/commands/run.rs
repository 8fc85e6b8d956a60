use std::fs::create_dir_all;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use distributor::Distributor;
use distributor_registry::Registry;
use distributor_rpc::spawn_rpc_server;
use tracing::{error, info};

use crate::config::DistributorConfig;

pub async fn exec(config_path: PathBuf, witness_keys: Vec<String>) -> Result<()> {
    let mut config = DistributorConfig::load_or_write_config(&config_path)?;
    if !witness_keys.is_empty() {
        config.registry.witnesses = witness_keys;
    }

    let registry =
        Registry::from_config(&config.registry).context("Invalid registry configuration")?;
    create_dir_all(&config.database.path).with_context(|| {
        format!(
            "Failed to create database directory {}",
            config.database.path.display()
        )
    })?;
    let distributor: Distributor = Distributor::init(config.database.clone(), Arc::new(registry))
        .context("Could not open the distributor database")?;

    spawn_rpc_server(config.rpc, distributor, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received ctrl-c, shutting down"),
        Err(e) => {
            error!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        },
    }
}
