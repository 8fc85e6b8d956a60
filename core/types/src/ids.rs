use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tlog_note::Verifier;

/// The globally unique identifier of a log, derived from its origin string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(String);

impl LogId {
    /// Derive the ID of the log with the given origin: the hex encoded SHA-256 of `"o:" + origin`.
    pub fn from_origin(origin: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"o:");
        hasher.update(origin.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for LogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identifier of a witness: the name its verifier key was published under.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WitnessId(String);

impl WitnessId {
    pub fn from_verifier(verifier: &Verifier) -> Self {
        Self(verifier.name().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WitnessId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for WitnessId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for WitnessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the distributor needs to know about a log, other than its ID.
#[derive(Clone, Debug)]
pub struct LogInfo {
    pub origin: String,
    pub verifier: Verifier,
}

/// What the distributor needs to know about a witness, other than its ID.
#[derive(Clone, Debug)]
pub struct WitnessInfo {
    /// The verifier key exactly as it was configured.
    pub vkey: String,
    /// Cosignature verifier for the witness.
    pub verifier: Verifier,
}
