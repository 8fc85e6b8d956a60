use std::sync::Arc;

use distributor_registry::Registry;
use distributor_types::{
    DistributorError,
    Inconsistency,
    LogId,
    LogInfo,
    MergedCheckpoint,
    Result,
    WitnessCheckpoint,
    WitnessId,
    WitnessInfo,
    MAX_SIGS,
};
use tlog_note::{parse_checkpoint, sign, Checkpoint, Note};
use tracing::{debug, error, warn};

use crate::aggregator::Quorum;
use crate::config::DatabaseConfig;
use crate::database::{
    DatabaseError,
    DistributorDatabase,
    DistributorDatabaseQuery,
    DistributorTransaction,
};
use crate::metrics;
use crate::rocks::RocksDistributorDatabase;

/// Collects witnessed checkpoints of logs and publishes them merged by the number of witnesses
/// that cosigned them.
///
/// All writes go through [`Distributor::distribute`], which validates a submission, stores it and
/// recomputes the merged checkpoint for the submission's tree size in one transaction.
#[derive(Clone)]
pub struct Distributor<D: DistributorDatabase = RocksDistributorDatabase> {
    db: D,
    registry: Arc<Registry>,
}

/// The outcome of applying a submission inside a transaction.
enum Update {
    /// The witness already had this checkpoint. Nothing was written.
    Unchanged,
    /// The checkpoint was stored.
    Stored { sig_count: u32 },
    /// The witness had already submitted a different checkpoint of the same size.
    Inconsistent { stored: Vec<u8> },
}

impl<D: DistributorDatabase> Distributor<D> {
    pub fn new(db: D, registry: Arc<Registry>) -> Self {
        Self { db, registry }
    }

    /// Open the database and build a distributor over it.
    pub fn init(
        config: DatabaseConfig,
        registry: Arc<Registry>,
    ) -> std::result::Result<Self, DatabaseError> {
        Ok(Self::new(D::build(config)?, registry))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The IDs of all known logs, sorted.
    pub fn get_logs(&self) -> Vec<LogId> {
        self.registry.log_ids()
    }

    /// The IDs of all known witnesses, sorted.
    pub fn get_witnesses(&self) -> Vec<WitnessId> {
        self.registry.witness_ids()
    }

    /// Get the freshest checkpoint of the log cosigned by exactly `n` witnesses.
    pub fn get_checkpoint_n(&self, log_id: &LogId, n: u32) -> Result<Vec<u8>> {
        metrics::GET_CHECKPOINT_N_REQUEST.inc();
        if n == 0 || n > MAX_SIGS {
            return Err(DistributorError::InvalidRequest(format!(
                "number of witnesses must be between 1 and {MAX_SIGS}, got {n}"
            )));
        }
        self.resolve_log(log_id)?;
        let checkpoint = self
            .db
            .query()
            .get_merged_checkpoint(log_id, n)?
            .ok_or_else(|| {
                DistributorError::NotFound(format!(
                    "no checkpoint with {n} witness signatures for log {log_id}"
                ))
            })?;
        metrics::GET_CHECKPOINT_N_SUCCESS.inc();
        Ok(checkpoint.checkpoint)
    }

    /// Get the latest checkpoint of the log submitted by the witness.
    pub fn get_checkpoint_witness(&self, log_id: &LogId, witness_id: &WitnessId) -> Result<Vec<u8>> {
        metrics::GET_CHECKPOINT_WITNESS_REQUEST.inc();
        let checkpoint = self
            .db
            .query()
            .get_witness_checkpoint(log_id, witness_id)?
            .ok_or_else(|| {
                DistributorError::NotFound(format!(
                    "no checkpoint from witness {witness_id} for log {log_id}"
                ))
            })?;
        metrics::GET_CHECKPOINT_WITNESS_SUCCESS.inc();
        Ok(checkpoint.checkpoint)
    }

    /// Evidence of witnesses contradicting themselves about the log.
    pub fn inconsistencies(&self, log_id: &LogId) -> Result<Vec<Inconsistency>> {
        self.resolve_log(log_id)?;
        Ok(self.db.query().get_inconsistencies(log_id)?)
    }

    /// Accept a checkpoint of a log cosigned by a witness.
    ///
    /// The checkpoint must carry valid signatures from the log and the witness. Other signatures
    /// are stripped before it is stored. Submitting the checkpoint the witness already has is a
    /// no-op, a smaller checkpoint is rejected, and a different checkpoint of the same size is a
    /// conflict that is recorded as evidence against the witness.
    pub fn distribute(&self, log_id: &LogId, witness_id: &WitnessId, raw: &[u8]) -> Result<()> {
        let log = self.resolve_log(log_id)?;
        let witness = self.resolve_witness(witness_id)?;
        // Only registered witnesses get a label series.
        metrics::UPDATE_CHECKPOINT_REQUEST
            .with_label_values(&[witness_id.as_str()])
            .inc();

        let (checkpoint, note) = validate(log, witness, raw)?;

        let txn = self.db.transaction();
        let update = self.update(&txn, log_id, witness_id, log, &checkpoint, note);
        match update {
            Ok(Update::Stored { sig_count }) => {
                txn.commit()?;
                debug!(
                    "Stored checkpoint of size {} for log {log_id} from witness {witness_id}, \
                     cosigned by {sig_count} witnesses",
                    checkpoint.size
                );
            },
            Ok(Update::Unchanged) => {
                if let Err(rollback) = txn.rollback() {
                    error!("Failed to roll back transaction: {rollback}");
                }
                debug!(
                    "Witness {witness_id} resubmitted checkpoint of size {} for log {log_id}",
                    checkpoint.size
                );
            },
            Ok(Update::Inconsistent { stored }) => {
                txn.rollback()?;
                self.report_inconsistency(log_id, witness_id, checkpoint.size, stored, raw);
                return Err(DistributorError::Conflict(format!(
                    "witness {witness_id} already submitted a different checkpoint of size {} \
                     for log {log_id}",
                    checkpoint.size
                )));
            },
            Err(e) => {
                if let Err(rollback) = txn.rollback() {
                    error!("Failed to roll back transaction: {rollback}");
                }
                return Err(e);
            },
        }

        metrics::UPDATE_CHECKPOINT_SUCCESS
            .with_label_values(&[witness_id.as_str()])
            .inc();
        Ok(())
    }

    fn update(
        &self,
        txn: &D::Transaction<'_>,
        log_id: &LogId,
        witness_id: &WitnessId,
        log: &LogInfo,
        checkpoint: &Checkpoint,
        note: Vec<u8>,
    ) -> Result<Update> {
        txn.lock_log(log_id)?;

        if let Some(existing) = txn.get_witness_checkpoint_for_update(log_id, witness_id)? {
            if checkpoint.size < existing.tree_size {
                return Err(DistributorError::InvalidRequest(format!(
                    "checkpoint of size {} is older than the stored checkpoint of size {}",
                    checkpoint.size, existing.tree_size
                )));
            }
            if checkpoint.size == existing.tree_size {
                let (stored, _) = parse_checkpoint(
                    &existing.checkpoint,
                    &log.origin,
                    &log.verifier,
                    Vec::new(),
                )
                .map_err(|e| {
                    DistributorError::Internal(format!("failed to open stored checkpoint: {e}"))
                })?;
                if stored.hash != checkpoint.hash {
                    return Ok(Update::Inconsistent {
                        stored: existing.checkpoint,
                    });
                }
                return Ok(Update::Unchanged);
            }
        }

        let tree_size = checkpoint.size;
        txn.put_witness_checkpoint(
            log_id,
            witness_id,
            &WitnessCheckpoint {
                tree_size,
                checkpoint: note,
            },
        )?;

        let quorum = Quorum::collect(
            &self.registry,
            txn.witness_checkpoints_by_size(log_id, tree_size)?,
        );
        let sig_count = quorum.sig_count();
        if sig_count == 0 || sig_count > MAX_SIGS {
            return Ok(Update::Stored { sig_count });
        }

        let current = txn.get_merged_tree_size_for_update(log_id, sig_count)?;
        if current.map_or(true, |size| tree_size > size) {
            match quorum.combine(&log.verifier) {
                Ok(merged) => txn.put_merged_checkpoint(
                    log_id,
                    sig_count,
                    &MergedCheckpoint {
                        tree_size,
                        checkpoint: merged,
                    },
                )?,
                Err(e) => warn!(
                    "Failed to merge {sig_count} checkpoints of size {tree_size} for log {log_id}: {e}"
                ),
            }
        }

        Ok(Update::Stored { sig_count })
    }

    fn report_inconsistency(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
        tree_size: u64,
        stored: Vec<u8>,
        submitted: &[u8],
    ) {
        error!(
            "Witness {witness_id} submitted inconsistent checkpoints of size {tree_size} for log \
             {log_id}:\n{}\n{}",
            String::from_utf8_lossy(&stored),
            String::from_utf8_lossy(submitted)
        );

        let inconsistency = Inconsistency {
            log_id: log_id.clone(),
            witness_id: witness_id.clone(),
            tree_size,
            stored,
            submitted: submitted.to_vec(),
        };
        let txn = self.db.transaction();
        let result = txn
            .put_inconsistency(&inconsistency)
            .and_then(|_| txn.commit());
        if let Err(e) = result {
            error!("Failed to record inconsistency of witness {witness_id} for log {log_id}: {e}");
        }
    }

    fn resolve_log(&self, log_id: &LogId) -> Result<&LogInfo> {
        self.registry
            .resolve_log(log_id)
            .ok_or_else(|| DistributorError::InvalidRequest(format!("unknown log {log_id}")))
    }

    fn resolve_witness(&self, witness_id: &WitnessId) -> Result<&WitnessInfo> {
        self.registry.resolve_witness(witness_id).ok_or_else(|| {
            DistributorError::InvalidRequest(format!("unknown witness {witness_id}"))
        })
    }
}

/// Check that `raw` is a checkpoint of the log signed by the log and the witness, and re-encode it
/// with only those two signatures.
fn validate(log: &LogInfo, witness: &WitnessInfo, raw: &[u8]) -> Result<(Checkpoint, Vec<u8>)> {
    let (checkpoint, note) = parse_checkpoint(raw, &log.origin, &log.verifier, [&witness.verifier])
        .map_err(|e| DistributorError::InvalidRequest(format!("invalid checkpoint: {e}")))?;

    let find = |name: &str, hash: u32| {
        note.sigs
            .iter()
            .find(|s| s.name == name && s.hash == hash)
            .cloned()
    };
    let log_sig = find(log.verifier.name(), log.verifier.key_hash());
    let witness_sig = find(witness.verifier.name(), witness.verifier.key_hash());
    let (Some(log_sig), Some(witness_sig)) = (log_sig, witness_sig) else {
        return Err(DistributorError::InvalidRequest(format!(
            "checkpoint is not signed by witness {}",
            witness.verifier.name()
        )));
    };

    let note = sign(
        &Note {
            text: note.text,
            sigs: vec![log_sig, witness_sig],
            unverified_sigs: Vec::new(),
        },
        &[],
    )
    .map_err(|e| DistributorError::Internal(format!("failed to encode checkpoint: {e}")))?;
    Ok((checkpoint, note))
}
