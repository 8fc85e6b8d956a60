use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use distributor::DISTRIBUTOR_HOME_DIR;

#[derive(Parser)]
#[command(about, name = "distributor", version)]
pub struct Args {
    /// Path to the toml configuration file
    #[arg(short, long, global = true, default_value_t = String::from(DISTRIBUTOR_HOME_DIR.join("config.toml").to_string_lossy().as_ref()) )]
    pub config: String,
    /// Print logs as json.
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,
    /// Increases the level of verbosity (the max level is -vv).
    #[arg(short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the distributor.
    Run {
        /// Verifier key of a witness. Replaces the witnesses of the configuration file when given
        /// at least once.
        #[arg(long = "witkey")]
        witness_keys: Vec<String>,
    },
    /// Write the default configuration file.
    Init {
        /// Whether to overwrite an existing configuration file.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the loaded configuration.
    PrintConfig {
        /// Print the default configuration instead of loading the current one.
        #[arg(short, long)]
        default: bool,
    },
    /// Query or feed a running distributor.
    #[command(subcommand)]
    Client(ClientSubCmd),
}

#[derive(Subcommand)]
pub enum ClientSubCmd {
    /// List the IDs of the known logs.
    Logs {
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,
    },
    /// List the IDs of the known witnesses.
    Witnesses {
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,
    },
    /// Print the freshest checkpoint of a log cosigned by N witnesses.
    Checkpoint {
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,
        /// The log ID.
        log: String,
        /// The number of witness cosignatures.
        n: u32,
    },
    /// Print the latest checkpoint of a log submitted by a witness.
    WitnessCheckpoint {
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,
        /// The log ID.
        log: String,
        /// The witness ID.
        witness: String,
    },
    /// Submit a witnessed checkpoint.
    Distribute {
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,
        /// The log ID.
        log: String,
        /// The witness ID.
        witness: String,
        /// File containing the checkpoint, `-` for stdin.
        input: PathBuf,
    },
}
