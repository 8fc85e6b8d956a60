use distributor_types::{LogId, WitnessId};
use rocksdb::{ColumnFamily, TransactionDB};

use crate::database::DatabaseError;

pub(crate) const CHECKPOINTS_BY_WITNESS: &str = "checkpoints_by_witness";
pub(crate) const MERGED_CHECKPOINTS: &str = "merged_checkpoints";
pub(crate) const INCONSISTENCIES: &str = "inconsistencies";
/// Rows of this column family are never written, their keys are only locked.
pub(crate) const LOG_LOCKS: &str = "log_locks";

pub(crate) const COLUMN_FAMILIES: [&str; 4] = [
    CHECKPOINTS_BY_WITNESS,
    MERGED_CHECKPOINTS,
    INCONSISTENCIES,
    LOG_LOCKS,
];

const SEPARATOR: u8 = 0;

pub(crate) fn column_family<'a>(
    db: &'a TransactionDB,
    name: &'static str,
) -> Result<&'a ColumnFamily, DatabaseError> {
    db.cf_handle(name)
        .ok_or(DatabaseError::MissingColumnFamily(name))
}

/// `log_id || 0x00`, the prefix of every per-log row.
pub(crate) fn log_prefix(log_id: &LogId) -> Vec<u8> {
    let mut key = Vec::with_capacity(log_id.as_str().len() + 1);
    key.extend_from_slice(log_id.as_str().as_bytes());
    key.push(SEPARATOR);
    key
}

pub(crate) fn log_lock_key(log_id: &LogId) -> Vec<u8> {
    log_id.as_str().as_bytes().to_vec()
}

pub(crate) fn witness_key(log_id: &LogId, witness_id: &WitnessId) -> Vec<u8> {
    let mut key = log_prefix(log_id);
    key.extend_from_slice(witness_id.as_str().as_bytes());
    key
}

pub(crate) fn merged_key(log_id: &LogId, sig_count: u32) -> Vec<u8> {
    let mut key = log_prefix(log_id);
    key.extend_from_slice(&sig_count.to_be_bytes());
    key
}

pub(crate) fn inconsistency_key(log_id: &LogId, witness_id: &WitnessId, tree_size: u64) -> Vec<u8> {
    let mut key = witness_key(log_id, witness_id);
    key.push(SEPARATOR);
    key.extend_from_slice(&tree_size.to_be_bytes());
    key
}

/// Recover the witness ID from a key of the `checkpoints_by_witness` column family.
pub(crate) fn witness_id_from_key(prefix: &[u8], key: &[u8]) -> Result<WitnessId, DatabaseError> {
    key.strip_prefix(prefix)
        .and_then(|id| std::str::from_utf8(id).ok())
        .map(WitnessId::from)
        .ok_or(DatabaseError::MalformedKey(CHECKPOINTS_BY_WITNESS))
}
