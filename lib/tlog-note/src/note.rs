use std::collections::{HashMap, HashSet};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::keys::is_valid_name;
use crate::{NoteError, Signer, Verifier};

/// Every signature line starts with an em dash followed by a space.
const SIG_PREFIX: &str = "\u{2014} ";

/// Upper bound on the signature lines accepted on a single note.
pub const MAX_NOTE_SIGNATURES: usize = 100;

/// One signature line of a note.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Name of the key that produced the signature.
    pub name: String,
    /// Key hash of the key that produced the signature.
    pub hash: u32,
    /// Base64 encoding of the key hash followed by the signature bytes.
    pub base64: String,
}

impl Signature {
    fn line(&self) -> String {
        format!("{SIG_PREFIX}{} {}\n", self.name, self.base64)
    }
}

/// A signed note: text plus the signatures over it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Note {
    /// The signed text, always ending in a newline.
    pub text: String,
    /// Signatures that were verified by a known key.
    pub sigs: Vec<Signature>,
    /// Signatures by keys that were not known when the note was opened.
    pub unverified_sigs: Vec<Signature>,
}

fn check_text(text: &str) -> Result<(), NoteError> {
    if text.is_empty() || !text.ends_with('\n') {
        return Err(NoteError::MalformedNote(
            "text must be non-empty and end in a newline".to_string(),
        ));
    }
    if text.chars().any(|c| c < ' ' && c != '\n') {
        return Err(NoteError::MalformedNote(
            "text contains control characters".to_string(),
        ));
    }
    Ok(())
}

fn parse_signature_line(line: &str) -> Result<(Signature, Vec<u8>), NoteError> {
    let rest = line
        .strip_prefix(SIG_PREFIX)
        .ok_or_else(|| NoteError::MalformedNote(format!("bad signature line {line:?}")))?;
    let (name, encoded) = rest
        .split_once(' ')
        .ok_or_else(|| NoteError::MalformedNote(format!("bad signature line {line:?}")))?;
    if !is_valid_name(name) {
        return Err(NoteError::MalformedNote(format!("bad signer name {name:?}")));
    }
    let raw = STANDARD
        .decode(encoded)
        .map_err(|e| NoteError::MalformedNote(format!("bad signature encoding: {e}")))?;
    if raw.len() < 5 {
        return Err(NoteError::MalformedNote("signature too short".to_string()));
    }
    let hash = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
    let sig = Signature {
        name: name.to_string(),
        hash,
        base64: encoded.to_string(),
    };
    Ok((sig, raw[4..].to_vec()))
}

/// Open a signed note, verifying every signature made by one of `verifiers`.
///
/// Signatures by unknown keys are kept in [`Note::unverified_sigs`]. A signature by a known key
/// that fails to verify is an error, as is a note with no verified signature at all.
pub fn open<'a>(
    msg: &[u8],
    verifiers: impl IntoIterator<Item = &'a Verifier>,
) -> Result<Note, NoteError> {
    let msg = std::str::from_utf8(msg)
        .map_err(|_| NoteError::MalformedNote("note is not valid UTF-8".to_string()))?;
    let split = msg
        .rfind("\n\n")
        .ok_or_else(|| NoteError::MalformedNote("missing signature block".to_string()))?;
    let (text, sig_block) = (&msg[..split + 1], &msg[split + 2..]);
    check_text(text)?;
    if sig_block.is_empty() || !sig_block.ends_with('\n') {
        return Err(NoteError::MalformedNote(
            "signature block must end in a newline".to_string(),
        ));
    }

    let known: HashMap<(&str, u32), &Verifier> = verifiers
        .into_iter()
        .map(|v| ((v.name(), v.key_hash()), v))
        .collect();

    let mut note = Note {
        text: text.to_string(),
        ..Default::default()
    };
    let mut seen = HashSet::new();
    let mut seen_unverified = HashSet::new();
    for (i, line) in sig_block.lines().enumerate() {
        if i >= MAX_NOTE_SIGNATURES {
            return Err(NoteError::MalformedNote("too many signatures".to_string()));
        }
        let (sig, raw) = parse_signature_line(line)?;
        match known.get(&(sig.name.as_str(), sig.hash)) {
            Some(verifier) => {
                if !seen.insert((sig.name.clone(), sig.hash)) {
                    continue;
                }
                if !verifier.verify(text.as_bytes(), &raw) {
                    return Err(NoteError::InvalidSignature {
                        name: sig.name,
                        hash: sig.hash,
                    });
                }
                note.sigs.push(sig);
            },
            None => {
                if seen_unverified.insert(sig.clone()) {
                    note.unverified_sigs.push(sig);
                }
            },
        }
    }

    if note.sigs.is_empty() {
        return Err(NoteError::UnverifiedNote);
    }
    Ok(note)
}

/// Encode `note` with its verified signatures followed by fresh signatures from `signers`.
///
/// Unverified signatures are never written. An existing signature by the same key as one of
/// the signers is replaced by the new one.
pub fn sign(note: &Note, signers: &[&Signer]) -> Result<Vec<u8>, NoteError> {
    check_text(&note.text)?;

    let mut out = note.text.clone();
    out.push('\n');
    for sig in &note.sigs {
        let replaced = signers
            .iter()
            .any(|s| s.name() == sig.name && s.key_hash() == sig.hash);
        if !replaced {
            out.push_str(&sig.line());
        }
    }
    for signer in signers {
        let mut raw = signer.key_hash().to_be_bytes().to_vec();
        raw.extend(signer.sign(note.text.as_bytes()));
        let sig = Signature {
            name: signer.name().to_string(),
            hash: signer.key_hash(),
            base64: STANDARD.encode(raw),
        };
        out.push_str(&sig.line());
    }
    Ok(out.into_bytes())
}
