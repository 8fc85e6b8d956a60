use std::sync::Arc;

use distributor_types::{Inconsistency, LogId, MergedCheckpoint, WitnessCheckpoint, WitnessId};
use rocksdb::{
    Direction,
    IteratorMode,
    Options,
    Transaction,
    TransactionDB,
    TransactionDBOptions,
};
use tracing::debug;

use super::keys::{
    column_family,
    inconsistency_key,
    log_lock_key,
    log_prefix,
    merged_key,
    witness_id_from_key,
    witness_key,
    CHECKPOINTS_BY_WITNESS,
    COLUMN_FAMILIES,
    INCONSISTENCIES,
    LOG_LOCKS,
    MERGED_CHECKPOINTS,
};
use super::query::RocksDistributorDatabaseQuery;
use crate::config::DatabaseConfig;
use crate::database::{DatabaseError, DistributorDatabase, DistributorTransaction};

/// A distributor database that uses a RocksDB transaction database with pessimistic locking as
/// the underlying datastore.
#[derive(Clone)]
pub struct RocksDistributorDatabase {
    db: Arc<TransactionDB>,
}

impl DistributorDatabase for RocksDistributorDatabase {
    type Query = RocksDistributorDatabaseQuery;
    type Transaction<'a> = RocksDistributorTransaction<'a>;

    fn build(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        let mut options = Options::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);

        let mut txn_options = TransactionDBOptions::default();
        txn_options.set_txn_lock_timeout(config.lock_timeout_ms.try_into().unwrap_or(i64::MAX));

        debug!("Opening distributor database at {}", config.path.display());
        let db = TransactionDB::open_cf(&options, &txn_options, &config.path, COLUMN_FAMILIES)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn query(&self) -> Self::Query {
        RocksDistributorDatabaseQuery::new(self.db.clone())
    }

    fn transaction(&self) -> Self::Transaction<'_> {
        RocksDistributorTransaction {
            db: &self.db,
            txn: self.db.transaction(),
        }
    }
}

pub struct RocksDistributorTransaction<'a> {
    db: &'a TransactionDB,
    txn: Transaction<'a, TransactionDB>,
}

impl<'a> DistributorTransaction for RocksDistributorTransaction<'a> {
    fn lock_log(&self, log_id: &LogId) -> Result<(), DatabaseError> {
        let cf = column_family(self.db, LOG_LOCKS)?;
        self.txn.get_for_update_cf(cf, log_lock_key(log_id), true)?;
        Ok(())
    }

    fn get_witness_checkpoint_for_update(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
    ) -> Result<Option<WitnessCheckpoint>, DatabaseError> {
        let cf = column_family(self.db, CHECKPOINTS_BY_WITNESS)?;
        self.txn
            .get_for_update_cf(cf, witness_key(log_id, witness_id), true)?
            .map(|value| bincode::deserialize(&value))
            .transpose()
            .map_err(Into::into)
    }

    fn put_witness_checkpoint(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
        checkpoint: &WitnessCheckpoint,
    ) -> Result<(), DatabaseError> {
        let cf = column_family(self.db, CHECKPOINTS_BY_WITNESS)?;
        self.txn.put_cf(
            cf,
            witness_key(log_id, witness_id),
            bincode::serialize(checkpoint)?,
        )?;
        Ok(())
    }

    fn witness_checkpoints_by_size(
        &self,
        log_id: &LogId,
        tree_size: u64,
    ) -> Result<Vec<(WitnessId, Vec<u8>)>, DatabaseError> {
        let cf = column_family(self.db, CHECKPOINTS_BY_WITNESS)?;
        let prefix = log_prefix(log_id);
        let mut checkpoints = Vec::new();
        for item in self
            .txn
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward))
        {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            let record: WitnessCheckpoint = bincode::deserialize(&value)?;
            if record.tree_size == tree_size {
                checkpoints.push((witness_id_from_key(&prefix, &key)?, record.checkpoint));
            }
        }
        Ok(checkpoints)
    }

    fn get_merged_tree_size_for_update(
        &self,
        log_id: &LogId,
        sig_count: u32,
    ) -> Result<Option<u64>, DatabaseError> {
        let cf = column_family(self.db, MERGED_CHECKPOINTS)?;
        let record = self
            .txn
            .get_for_update_cf(cf, merged_key(log_id, sig_count), true)?
            .map(|value| bincode::deserialize::<MergedCheckpoint>(&value))
            .transpose()?;
        Ok(record.map(|r| r.tree_size))
    }

    fn put_merged_checkpoint(
        &self,
        log_id: &LogId,
        sig_count: u32,
        checkpoint: &MergedCheckpoint,
    ) -> Result<(), DatabaseError> {
        let cf = column_family(self.db, MERGED_CHECKPOINTS)?;
        self.txn.put_cf(
            cf,
            merged_key(log_id, sig_count),
            bincode::serialize(checkpoint)?,
        )?;
        Ok(())
    }

    fn put_inconsistency(&self, inconsistency: &Inconsistency) -> Result<(), DatabaseError> {
        let cf = column_family(self.db, INCONSISTENCIES)?;
        let key = inconsistency_key(
            &inconsistency.log_id,
            &inconsistency.witness_id,
            inconsistency.tree_size,
        );
        self.txn.put_cf(cf, key, bincode::serialize(inconsistency)?)?;
        Ok(())
    }

    fn commit(self) -> Result<(), DatabaseError> {
        self.txn.commit()?;
        Ok(())
    }

    fn rollback(&self) -> Result<(), DatabaseError> {
        self.txn.rollback()?;
        Ok(())
    }
}
