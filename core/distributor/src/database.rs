use distributor_types::{
    DistributorError,
    Inconsistency,
    LogId,
    MergedCheckpoint,
    WitnessCheckpoint,
    WitnessId,
};
use thiserror::Error;

use crate::config::DatabaseConfig;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("rocksdb: {0}")]
    Rocks(#[from] rocksdb::Error),
    #[error("failed to encode or decode record: {0}")]
    Encoding(#[from] bincode::Error),
    #[error("column family {0} is missing")]
    MissingColumnFamily(&'static str),
    #[error("malformed key in column family {0}")]
    MalformedKey(&'static str),
}

impl From<DatabaseError> for DistributorError {
    fn from(e: DatabaseError) -> Self {
        DistributorError::Internal(e.to_string())
    }
}

/// A trait for a distributor database, encapsulating the storage operations that the
/// distributor needs to perform.
///
/// Writes happen inside transactions that hold pessimistic locks on the rows they read for
/// update, until they are committed or rolled back. Implementations are expected to be
/// thread-safe and cheap to clone.
pub trait DistributorDatabase: Clone + Send + Sync + 'static {
    /// The database reader type.
    type Query: DistributorDatabaseQuery;

    /// The transaction type.
    type Transaction<'a>: DistributorTransaction
    where
        Self: 'a;

    /// Open the database using the given configuration.
    fn build(config: DatabaseConfig) -> Result<Self, DatabaseError>;

    /// Get the query instance for this database.
    fn query(&self) -> Self::Query;

    /// Start a new transaction.
    fn transaction(&self) -> Self::Transaction<'_>;
}

/// One atomic unit of reads and writes.
///
/// Dropping a transaction without committing it discards its writes.
pub trait DistributorTransaction {
    /// Take the write lock of the given log. All writers for a log are serialized by this lock,
    /// and it must be taken before any row lock.
    fn lock_log(&self, log_id: &LogId) -> Result<(), DatabaseError>;

    /// Get the latest checkpoint of a witness for a log, locking the row.
    fn get_witness_checkpoint_for_update(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
    ) -> Result<Option<WitnessCheckpoint>, DatabaseError>;

    /// Insert or replace the latest checkpoint of a witness for a log.
    fn put_witness_checkpoint(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
        checkpoint: &WitnessCheckpoint,
    ) -> Result<(), DatabaseError>;

    /// Get the checkpoints of every witness of the log whose latest checkpoint is at the given
    /// tree size, ordered by witness ID.
    fn witness_checkpoints_by_size(
        &self,
        log_id: &LogId,
        tree_size: u64,
    ) -> Result<Vec<(WitnessId, Vec<u8>)>, DatabaseError>;

    /// Get the tree size of the merged checkpoint with `sig_count` witness signatures, locking
    /// the row.
    fn get_merged_tree_size_for_update(
        &self,
        log_id: &LogId,
        sig_count: u32,
    ) -> Result<Option<u64>, DatabaseError>;

    /// Insert or replace the merged checkpoint with `sig_count` witness signatures.
    fn put_merged_checkpoint(
        &self,
        log_id: &LogId,
        sig_count: u32,
        checkpoint: &MergedCheckpoint,
    ) -> Result<(), DatabaseError>;

    /// Insert or replace the evidence of a witness contradicting itself.
    fn put_inconsistency(&self, inconsistency: &Inconsistency) -> Result<(), DatabaseError>;

    fn commit(self) -> Result<(), DatabaseError>;

    fn rollback(&self) -> Result<(), DatabaseError>;
}

/// A trait for a distributor database query, reading committed state without taking locks.
///
/// There can be many query instances for a given database, and they can be shared between
/// multiple threads.
pub trait DistributorDatabaseQuery: Clone + Send + Sync {
    /// Get the latest checkpoint of a witness for a log.
    fn get_witness_checkpoint(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
    ) -> Result<Option<WitnessCheckpoint>, DatabaseError>;

    /// Get the merged checkpoint with `sig_count` witness signatures.
    fn get_merged_checkpoint(
        &self,
        log_id: &LogId,
        sig_count: u32,
    ) -> Result<Option<MergedCheckpoint>, DatabaseError>;

    /// Get all recorded inconsistencies of a log, ordered by witness ID then tree size.
    fn get_inconsistencies(&self, log_id: &LogId) -> Result<Vec<Inconsistency>, DatabaseError>;
}
