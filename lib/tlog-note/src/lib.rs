//! Signed notes as used by transparency logs and their witnesses.
//!
//! A note is UTF-8 text followed by a blank line and one or more signature lines. Logs sign the
//! text of a [`Checkpoint`] with a plain Ed25519 key; witnesses add timestamped
//! `cosignature/v1` signatures over the same text. [`combine`] merges several cosigned copies of
//! the same checkpoint into one note.

mod checkpoint;
mod combine;
mod errors;
mod keys;
mod note;

pub use checkpoint::{parse_checkpoint, Checkpoint};
pub use combine::combine;
pub use errors::NoteError;
pub use keys::{key_hash, KeyAlgorithm, Signer, Verifier};
pub use note::{open, sign, Note, Signature, MAX_NOTE_SIGNATURES};

#[cfg(test)]
mod tests;
