use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    #[error("malformed key: {0}")]
    MalformedKey(String),
    #[error("malformed note: {0}")]
    MalformedNote(String),
    #[error("invalid signature by {name}+{hash:08x}")]
    InvalidSignature { name: String, hash: u32 },
    #[error("note has no verifiable signatures")]
    UnverifiedNote,
    #[error("malformed checkpoint: {0}")]
    MalformedCheckpoint(String),
    #[error("checkpoint origin {found:?} does not match expected origin {expected:?}")]
    OriginMismatch { expected: String, found: String },
    #[error("missing signature by {0}")]
    MissingSignature(String),
    #[error("failed to combine checkpoints: {0}")]
    Combine(String),
}
