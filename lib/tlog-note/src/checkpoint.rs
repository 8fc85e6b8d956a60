use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::{open, Note, NoteError, Verifier};

/// The statement a log signs about its state: origin, tree size and root hash, optionally
/// followed by extension lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub origin: String,
    pub size: u64,
    pub hash: Vec<u8>,
    /// Any lines after the root hash, each terminated by a newline.
    pub extension: String,
}

impl Checkpoint {
    /// Parse a checkpoint from the text of a note.
    pub fn parse(text: &str) -> Result<Self, NoteError> {
        if !text.ends_with('\n') {
            return Err(NoteError::MalformedCheckpoint(
                "checkpoint must end in a newline".to_string(),
            ));
        }
        let mut lines = text.splitn(4, '\n');
        let (Some(origin), Some(size), Some(hash)) = (lines.next(), lines.next(), lines.next())
        else {
            return Err(NoteError::MalformedCheckpoint(
                "checkpoint needs origin, size and hash lines".to_string(),
            ));
        };
        let extension = lines.next().unwrap_or_default();
        if origin.is_empty() {
            return Err(NoteError::MalformedCheckpoint("empty origin".to_string()));
        }
        if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NoteError::MalformedCheckpoint(format!("bad size {size:?}")));
        }
        let size = size
            .parse::<u64>()
            .map_err(|e| NoteError::MalformedCheckpoint(format!("bad size: {e}")))?;
        let hash = STANDARD
            .decode(hash)
            .map_err(|e| NoteError::MalformedCheckpoint(format!("bad root hash: {e}")))?;
        if hash.is_empty() {
            return Err(NoteError::MalformedCheckpoint("empty root hash".to_string()));
        }
        Ok(Self {
            origin: origin.to_string(),
            size,
            hash,
            extension: extension.to_string(),
        })
    }

    /// Encode the checkpoint as note text.
    pub fn marshal(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            self.origin,
            self.size,
            STANDARD.encode(&self.hash),
            self.extension
        )
    }
}

/// Open a checkpoint note and check it was signed by the log.
///
/// `others` are additional keys (typically witnesses) whose signatures should be verified rather
/// than left unverified. The returned note lists every verified signature, the log's included.
pub fn parse_checkpoint<'a>(
    raw: &[u8],
    origin: &str,
    log_verifier: &'a Verifier,
    others: impl IntoIterator<Item = &'a Verifier>,
) -> Result<(Checkpoint, Note), NoteError> {
    let verifiers: Vec<&Verifier> = std::iter::once(log_verifier).chain(others).collect();
    let note = open(raw, verifiers)?;
    if !note
        .sigs
        .iter()
        .any(|s| s.name == log_verifier.name() && s.hash == log_verifier.key_hash())
    {
        return Err(NoteError::MissingSignature(log_verifier.name().to_string()));
    }
    let checkpoint = Checkpoint::parse(&note.text)?;
    if checkpoint.origin != origin {
        return Err(NoteError::OriginMismatch {
            expected: origin.to_string(),
            found: checkpoint.origin,
        });
    }
    Ok((checkpoint, note))
}
