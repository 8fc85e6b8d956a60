use std::path::PathBuf;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command};
use crate::commands::{client, init, print_config, run};
use crate::utils::fs::ensure_parent_exist;

pub struct Cli {
    args: Args,
}

impl Cli {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    pub async fn exec(self) -> Result<()> {
        self.setup();
        let config_path = self.resolve_config_path()?;
        match self.args.cmd {
            Command::Run { witness_keys } => run::exec(config_path, witness_keys).await,
            Command::Init { force } => init::exec(config_path, force),
            Command::PrintConfig { default } => print_config::exec(default, config_path),
            Command::Client(cmd) => client::exec(cmd).await,
        }
    }

    fn setup(&self) {
        // Build the filter from cli args, or environment variable
        let env_filter = EnvFilter::builder()
            .with_default_directive(
                match self.args.verbose {
                    0 => LevelFilter::INFO,
                    1 => LevelFilter::DEBUG,
                    _2_or_more => LevelFilter::TRACE,
                }
                .into(),
            )
            .from_env_lossy();

        // Logs go to stderr, stdout is reserved for command output
        let json = self.args.json_logs;
        tracing_subscriber::registry()
            .with(json.then(|| {
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
            }))
            .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
            .with(env_filter)
            .init();
    }

    fn resolve_config_path(&self) -> Result<PathBuf> {
        let config_path = PathBuf::from(&self.args.config);
        ensure_parent_exist(&config_path)?;
        Ok(config_path)
    }
}
