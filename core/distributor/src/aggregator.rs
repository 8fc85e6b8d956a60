use distributor_registry::Registry;
use distributor_types::WitnessId;
use tlog_note::{combine, NoteError, Verifier};

/// The witnesses whose latest checkpoint for a log is at one tree size, together with those
/// checkpoints.
#[derive(Debug)]
pub struct Quorum {
    checkpoints: Vec<Vec<u8>>,
    witnesses: Vec<Verifier>,
}

impl Quorum {
    /// Build a quorum from per-witness checkpoints at one tree size. Rows of witnesses that are no
    /// longer in the registry are skipped.
    pub fn collect(registry: &Registry, rows: Vec<(WitnessId, Vec<u8>)>) -> Self {
        let mut checkpoints = Vec::with_capacity(rows.len());
        let mut witnesses = Vec::with_capacity(rows.len());
        for (id, checkpoint) in rows {
            if let Some(witness) = registry.resolve_witness(&id) {
                checkpoints.push(checkpoint);
                witnesses.push(witness.verifier.clone());
            }
        }
        Self {
            checkpoints,
            witnesses,
        }
    }

    /// The number of distinct witnesses in the quorum.
    pub fn sig_count(&self) -> u32 {
        self.witnesses.len() as u32
    }

    /// Merge the checkpoints into one note signed by the log and cosigned by every witness of the
    /// quorum.
    pub fn combine(&self, log_verifier: &Verifier) -> Result<Vec<u8>, NoteError> {
        combine(&self.checkpoints, log_verifier, &self.witnesses)
    }
}
