use std::collections::BTreeMap;

use distributor_types::{LogId, LogInfo, WitnessId, WitnessInfo};
use thiserror::Error;
use tlog_note::{KeyAlgorithm, NoteError, Verifier};
use tracing::info;

use crate::{LogConfig, RegistryConfig};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("invalid key for log {origin:?}: {source}")]
    InvalidLogKey { origin: String, source: NoteError },
    #[error("log {origin:?} must use an ed25519 key")]
    UnsupportedLogKey { origin: String },
    #[error("log origin must not be empty")]
    EmptyOrigin,
    #[error("duplicate log origin {0:?}")]
    DuplicateLog(String),
    #[error("invalid witness key {vkey:?}: {source}")]
    InvalidWitnessKey { vkey: String, source: NoteError },
    #[error("duplicate witness {0:?}")]
    DuplicateWitness(String),
}

/// Immutable lookup tables from log and witness identifiers to their verification keys.
#[derive(Debug, Default)]
pub struct Registry {
    logs: BTreeMap<LogId, LogInfo>,
    witnesses: BTreeMap<WitnessId, WitnessInfo>,
}

impl Registry {
    pub fn new(
        logs: impl IntoIterator<Item = LogInfo>,
        witnesses: impl IntoIterator<Item = WitnessInfo>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for log in logs {
            registry.add_log(log)?;
        }
        for witness in witnesses {
            registry.add_witness(witness)?;
        }
        Ok(registry)
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let logs = config
            .logs
            .iter()
            .map(log_info)
            .collect::<Result<Vec<_>, _>>()?;
        let witnesses = config
            .witnesses
            .iter()
            .map(|vkey| witness_info(vkey))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(logs, witnesses)
    }

    fn add_log(&mut self, log: LogInfo) -> Result<(), RegistryError> {
        if log.origin.is_empty() {
            return Err(RegistryError::EmptyOrigin);
        }
        if log.verifier.algorithm() != KeyAlgorithm::Ed25519 {
            return Err(RegistryError::UnsupportedLogKey { origin: log.origin });
        }
        let id = LogId::from_origin(&log.origin);
        if self.logs.contains_key(&id) {
            return Err(RegistryError::DuplicateLog(log.origin));
        }
        info!("Added log {:?} with ID {id}", log.origin);
        self.logs.insert(id, log);
        Ok(())
    }

    fn add_witness(&mut self, witness: WitnessInfo) -> Result<(), RegistryError> {
        let id = WitnessId::from_verifier(&witness.verifier);
        if self.witnesses.contains_key(&id) {
            return Err(RegistryError::DuplicateWitness(id.to_string()));
        }
        info!("Added witness {id}");
        self.witnesses.insert(id, witness);
        Ok(())
    }

    pub fn resolve_log(&self, id: &LogId) -> Option<&LogInfo> {
        self.logs.get(id)
    }

    pub fn resolve_witness(&self, id: &WitnessId) -> Option<&WitnessInfo> {
        self.witnesses.get(id)
    }

    /// All log IDs, in ascending order.
    pub fn log_ids(&self) -> Vec<LogId> {
        self.logs.keys().cloned().collect()
    }

    /// All witness IDs, in ascending order.
    pub fn witness_ids(&self) -> Vec<WitnessId> {
        self.witnesses.keys().cloned().collect()
    }
}

fn log_info(config: &LogConfig) -> Result<LogInfo, RegistryError> {
    let verifier =
        Verifier::from_vkey(&config.public_key).map_err(|source| RegistryError::InvalidLogKey {
            origin: config.origin.clone(),
            source,
        })?;
    Ok(LogInfo {
        origin: config.origin.clone(),
        verifier,
    })
}

fn witness_info(vkey: &str) -> Result<WitnessInfo, RegistryError> {
    let verifier =
        Verifier::cosignature_from_vkey(vkey).map_err(|source| RegistryError::InvalidWitnessKey {
            vkey: vkey.to_string(),
            source,
        })?;
    Ok(WitnessInfo {
        vkey: vkey.to_string(),
        verifier,
    })
}
