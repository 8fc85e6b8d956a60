use std::sync::Arc;

use distributor_types::{Inconsistency, LogId, MergedCheckpoint, WitnessCheckpoint, WitnessId};
use rocksdb::{Direction, IteratorMode, TransactionDB};

use super::keys::{
    column_family,
    log_prefix,
    merged_key,
    witness_key,
    CHECKPOINTS_BY_WITNESS,
    INCONSISTENCIES,
    MERGED_CHECKPOINTS,
};
use crate::database::{DatabaseError, DistributorDatabaseQuery};

/// A distributor database query type that reads the latest committed state of the RocksDB
/// datastore.
#[derive(Clone)]
pub struct RocksDistributorDatabaseQuery {
    db: Arc<TransactionDB>,
}

impl RocksDistributorDatabaseQuery {
    pub fn new(db: Arc<TransactionDB>) -> Self {
        Self { db }
    }
}

impl DistributorDatabaseQuery for RocksDistributorDatabaseQuery {
    fn get_witness_checkpoint(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
    ) -> Result<Option<WitnessCheckpoint>, DatabaseError> {
        let cf = column_family(&self.db, CHECKPOINTS_BY_WITNESS)?;
        self.db
            .get_cf(cf, witness_key(log_id, witness_id))?
            .map(|value| bincode::deserialize(&value))
            .transpose()
            .map_err(Into::into)
    }

    fn get_merged_checkpoint(
        &self,
        log_id: &LogId,
        sig_count: u32,
    ) -> Result<Option<MergedCheckpoint>, DatabaseError> {
        let cf = column_family(&self.db, MERGED_CHECKPOINTS)?;
        self.db
            .get_cf(cf, merged_key(log_id, sig_count))?
            .map(|value| bincode::deserialize(&value))
            .transpose()
            .map_err(Into::into)
    }

    fn get_inconsistencies(&self, log_id: &LogId) -> Result<Vec<Inconsistency>, DatabaseError> {
        let cf = column_family(&self.db, INCONSISTENCIES)?;
        let prefix = log_prefix(log_id);
        let mut inconsistencies = Vec::new();
        for item in self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward))
        {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            inconsistencies.push(bincode::deserialize(&value)?);
        }
        Ok(inconsistencies)
    }
}
