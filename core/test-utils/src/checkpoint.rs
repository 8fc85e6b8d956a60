use rand::Rng;
use tlog_note::{sign, Checkpoint, Note, Signer};

use crate::keys::{TestLog, TestWitness};

pub fn random_hash() -> Vec<u8> {
    rand::thread_rng().gen::<[u8; 32]>().to_vec()
}

/// The note text of a checkpoint of the log.
pub fn checkpoint_text(log: &TestLog, size: u64, hash: &[u8], extension: &str) -> String {
    Checkpoint {
        origin: log.origin.clone(),
        size,
        hash: hash.to_vec(),
        extension: extension.to_string(),
    }
    .marshal()
}

/// Sign `text` by the log, then cosign it by each of the witnesses.
pub fn cosign(log: &TestLog, text: &str, witnesses: &[&TestWitness]) -> Vec<u8> {
    let signers: Vec<&Signer> = std::iter::once(&log.signer)
        .chain(witnesses.iter().map(|w| &w.signer))
        .collect();
    sign(
        &Note {
            text: text.to_string(),
            ..Default::default()
        },
        &signers,
    )
    .unwrap()
}

/// A checkpoint of the log at `size` cosigned by the witness.
pub fn witnessed_checkpoint(
    log: &TestLog,
    witness: &TestWitness,
    size: u64,
    hash: &[u8],
) -> Vec<u8> {
    cosign(log, &checkpoint_text(log, size, hash, ""), &[witness])
}

/// The names of the signers of a note, in order.
pub fn signer_names(raw: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(raw);
    let (_, sigs) = text.rsplit_once("\n\n").unwrap_or_default();
    sigs.lines()
        .filter_map(|line| line.strip_prefix("\u{2014} "))
        .filter_map(|line| line.split_once(' '))
        .map(|(name, _)| name.to_string())
        .collect()
}
