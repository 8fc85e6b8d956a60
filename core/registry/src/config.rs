use serde::{Deserialize, Serialize};

/// The logs and witnesses the distributor accepts checkpoints for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Verifier keys (`name+hash+key`) of the witnesses.
    pub witnesses: Vec<String>,
    pub logs: Vec<LogConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub origin: String,
    /// The log's Ed25519 verifier key (`name+hash+key`).
    pub public_key: String,
}
