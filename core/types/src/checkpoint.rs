use serde::{Deserialize, Serialize};

use crate::{LogId, WitnessId};

/// The latest checkpoint a witness submitted for a log, carrying exactly the log's signature and
/// the witness's cosignature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessCheckpoint {
    pub tree_size: u64,
    pub checkpoint: Vec<u8>,
}

/// The freshest checkpoint cosigned by a given number of witnesses ("checkpoint.N").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedCheckpoint {
    pub tree_size: u64,
    pub checkpoint: Vec<u8>,
}

/// Evidence of a witness submitting two different checkpoints for the same tree size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inconsistency {
    pub log_id: LogId,
    pub witness_id: WitnessId,
    pub tree_size: u64,
    /// The checkpoint the distributor had already accepted.
    pub stored: Vec<u8>,
    /// The rejected checkpoint.
    pub submitted: Vec<u8>,
}
