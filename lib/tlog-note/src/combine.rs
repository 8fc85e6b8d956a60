use crate::{open, sign, Note, NoteError, Signature, Verifier};

fn find_sig<'a>(sigs: &'a [Signature], verifier: &Verifier) -> Option<&'a Signature> {
    sigs.iter()
        .find(|s| s.name == verifier.name() && s.hash == verifier.key_hash())
}

/// Merge several cosigned copies of one checkpoint into a single note.
///
/// Every input must carry the log's signature over byte-identical text. The output lists the
/// log's signature first, then one signature per entry of `witnesses`, in the order given. Each
/// witness must have signed at least one of the inputs.
pub fn combine<B: AsRef<[u8]>>(
    checkpoints: &[B],
    log_verifier: &Verifier,
    witnesses: &[Verifier],
) -> Result<Vec<u8>, NoteError> {
    if checkpoints.is_empty() {
        return Err(NoteError::Combine("no checkpoints to combine".to_string()));
    }

    let verifiers: Vec<&Verifier> = std::iter::once(log_verifier).chain(witnesses).collect();
    let mut text: Option<String> = None;
    let mut log_sig: Option<Signature> = None;
    let mut all_sigs = Vec::new();
    for (i, raw) in checkpoints.iter().enumerate() {
        let note = open(raw.as_ref(), verifiers.iter().copied())?;
        match &text {
            None => text = Some(note.text.clone()),
            Some(text) if *text != note.text => {
                return Err(NoteError::Combine(format!(
                    "checkpoint {i} has different signed text to checkpoint 0"
                )));
            },
            Some(_) => {},
        }
        let sig = find_sig(&note.sigs, log_verifier)
            .ok_or_else(|| NoteError::MissingSignature(log_verifier.name().to_string()))?;
        if log_sig.is_none() {
            log_sig = Some(sig.clone());
        }
        all_sigs.extend(note.sigs);
    }

    let (Some(text), Some(log_sig)) = (text, log_sig) else {
        return Err(NoteError::Combine("no checkpoints to combine".to_string()));
    };
    let mut sigs = vec![log_sig];
    for witness in witnesses {
        let sig = find_sig(&all_sigs, witness)
            .ok_or_else(|| NoteError::MissingSignature(witness.name().to_string()))?;
        sigs.push(sig.clone());
    }

    sign(
        &Note {
            text,
            sigs,
            unverified_sigs: Vec::new(),
        },
        &[],
    )
}
