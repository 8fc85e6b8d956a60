use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use distributor_rpc::RestClient;

use crate::args::ClientSubCmd;

pub async fn exec(cmd: ClientSubCmd) -> Result<()> {
    match cmd {
        ClientSubCmd::Logs { url } => {
            for log in RestClient::new(&url)?.get_logs().await? {
                println!("{log}");
            }
        },
        ClientSubCmd::Witnesses { url } => {
            for witness in RestClient::new(&url)?.get_witnesses().await? {
                println!("{witness}");
            }
        },
        ClientSubCmd::Checkpoint { url, log, n } => {
            let note = RestClient::new(&url)?
                .get_checkpoint_n(&log.into(), n)
                .await?;
            io::stdout().write_all(&note)?;
        },
        ClientSubCmd::WitnessCheckpoint { url, log, witness } => {
            let note = RestClient::new(&url)?
                .get_checkpoint_witness(&log.into(), &witness.into())
                .await?;
            io::stdout().write_all(&note)?;
        },
        ClientSubCmd::Distribute {
            url,
            log,
            witness,
            input,
        } => {
            let checkpoint = if input.as_os_str() == "-" {
                let mut buf = Vec::new();
                io::stdin().read_to_end(&mut buf)?;
                buf
            } else {
                std::fs::read(&input)
                    .with_context(|| format!("Failed to read {}", input.display()))?
            };
            RestClient::new(&url)?
                .distribute(&log.into(), &witness.into(), checkpoint)
                .await?;
        },
    }
    Ok(())
}
