use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pretty_assertions::assert_eq;

use crate::{
    combine,
    key_hash,
    open,
    parse_checkpoint,
    sign,
    Checkpoint,
    KeyAlgorithm,
    Note,
    NoteError,
    Signer,
    Verifier,
};

const ORIGIN: &str = "example.com/log";

fn log_signer() -> Signer {
    Signer::generate("example.com/log", KeyAlgorithm::Ed25519).unwrap()
}

fn witness_signer(name: &str) -> Signer {
    Signer::generate(name, KeyAlgorithm::CosignatureV1).unwrap()
}

fn checkpoint_text(size: u64, hash: [u8; 32]) -> String {
    Checkpoint {
        origin: ORIGIN.to_string(),
        size,
        hash: hash.to_vec(),
        extension: String::new(),
    }
    .marshal()
}

fn signed(text: &str, signers: &[&Signer]) -> Vec<u8> {
    let note = Note {
        text: text.to_string(),
        ..Default::default()
    };
    sign(&note, signers).unwrap()
}

#[test]
fn test_vkey_round_trip() {
    let signer = log_signer();
    let vkey = signer.verifier().to_vkey();
    let verifier = Verifier::from_vkey(&vkey).unwrap();
    assert_eq!(verifier, signer.verifier());
    assert_eq!(verifier.name(), "example.com/log");
    assert_eq!(verifier.algorithm(), KeyAlgorithm::Ed25519);

    let restored = Signer::from_skey(&signer.to_skey()).unwrap();
    assert_eq!(restored.verifier(), signer.verifier());
}

#[test]
fn test_vkey_with_wrong_hash_is_rejected() {
    let vkey = log_signer().verifier().to_vkey();
    let mut parts: Vec<&str> = vkey.splitn(3, '+').collect();
    parts[1] = "00000000";
    let tampered = parts.join("+");
    assert!(matches!(
        Verifier::from_vkey(&tampered),
        Err(NoteError::MalformedKey(_))
    ));
    assert!(Verifier::from_vkey("no-plus-signs").is_err());
    assert!(Verifier::from_vkey("name+0000000g+AAAA").is_err());
}

#[test]
fn test_witness_ed25519_vkey_is_rehashed_as_cosignature() {
    let plain = Signer::generate("witness.example", KeyAlgorithm::Ed25519).unwrap();
    let vkey = plain.verifier().to_vkey();
    let material = STANDARD.decode(vkey.rsplit('+').next().unwrap()).unwrap();

    let verifier = Verifier::cosignature_from_vkey(&vkey).unwrap();
    assert_eq!(verifier.algorithm(), KeyAlgorithm::CosignatureV1);
    assert_eq!(
        verifier.key_hash(),
        key_hash("witness.example", KeyAlgorithm::CosignatureV1, &material[1..])
    );
    assert_ne!(verifier.key_hash(), plain.key_hash());

    // Keys already tagged as cosignature keys are taken as-is.
    let witness = witness_signer("witness.example");
    let verifier = Verifier::cosignature_from_vkey(&witness.verifier().to_vkey()).unwrap();
    assert_eq!(verifier, witness.verifier());
}

#[test]
fn test_sign_and_open() {
    let log = log_signer();
    let witness = witness_signer("witness.example");
    let text = checkpoint_text(10, [1; 32]);
    let raw = signed(&text, &[&log, &witness]);

    let note = open(&raw, [&log.verifier(), &witness.verifier()]).unwrap();
    assert_eq!(note.text, text);
    assert_eq!(note.sigs.len(), 2);
    assert_eq!(note.sigs[0].name, "example.com/log");
    assert_eq!(note.sigs[1].name, "witness.example");
    assert!(note.unverified_sigs.is_empty());
}

#[test]
fn test_open_keeps_unknown_signatures_unverified() {
    let log = log_signer();
    let witness = witness_signer("witness.example");
    let raw = signed(&checkpoint_text(10, [1; 32]), &[&log, &witness]);

    let note = open(&raw, [&log.verifier()]).unwrap();
    assert_eq!(note.sigs.len(), 1);
    assert_eq!(note.unverified_sigs.len(), 1);
    assert_eq!(note.unverified_sigs[0].name, "witness.example");

    // Re-signing with no new signers drops the unverified signature.
    let stripped = sign(&note, &[]).unwrap();
    let reopened = open(&stripped, [&log.verifier(), &witness.verifier()]).unwrap();
    assert_eq!(reopened.sigs.len(), 1);
    assert!(reopened.unverified_sigs.is_empty());
}

#[test]
fn test_open_rejects_tampered_text() {
    let log = log_signer();
    let raw = signed(&checkpoint_text(10, [1; 32]), &[&log]);
    let tampered = String::from_utf8(raw).unwrap().replacen("\n10\n", "\n11\n", 1);
    assert_eq!(
        open(tampered.as_bytes(), [&log.verifier()]),
        Err(NoteError::InvalidSignature {
            name: log.name().to_string(),
            hash: log.key_hash(),
        })
    );
}

#[test]
fn test_open_rejects_notes_without_known_signatures() {
    let log = log_signer();
    let other = log_signer();
    let raw = signed(&checkpoint_text(10, [1; 32]), &[&log]);
    assert_eq!(open(&raw, [&other.verifier()]), Err(NoteError::UnverifiedNote));
    assert!(matches!(
        open(b"no signature block\n", [&log.verifier()]),
        Err(NoteError::MalformedNote(_))
    ));
}

#[test]
fn test_cosignature_covers_timestamp() {
    let witness = witness_signer("witness.example");
    let sig = witness.sign_at(b"hello\n", 1_700_000_000);
    assert_eq!(sig.len(), 72);
    assert_eq!(u64::from_be_bytes(sig[..8].try_into().unwrap()), 1_700_000_000);
    assert!(witness.verifier().verify(b"hello\n", &sig));

    let mut wrong_time = sig.clone();
    wrong_time[7] ^= 1;
    assert!(!witness.verifier().verify(b"hello\n", &wrong_time));
}

#[test]
fn test_key_hash_depends_on_algorithm() {
    let key = [7u8; 32];
    assert_ne!(
        key_hash("name", KeyAlgorithm::Ed25519, &key),
        key_hash("name", KeyAlgorithm::CosignatureV1, &key)
    );
}

#[test]
fn test_checkpoint_parse() {
    let text = format!("{ORIGIN}\n42\nAQIDBA==\nextra line\n");
    let checkpoint = Checkpoint::parse(&text).unwrap();
    assert_eq!(checkpoint.origin, ORIGIN);
    assert_eq!(checkpoint.size, 42);
    assert_eq!(checkpoint.hash, vec![1, 2, 3, 4]);
    assert_eq!(checkpoint.extension, "extra line\n");
    assert_eq!(checkpoint.marshal(), text);

    for bad in [
        "origin\n42\n",
        "origin\n-1\nAQIDBA==\n",
        "origin\n+1\nAQIDBA==\n",
        "origin\n1\nnot base64!\n",
        "\n1\nAQIDBA==\n",
        "origin\n1\nAQIDBA==",
    ] {
        assert!(Checkpoint::parse(bad).is_err(), "{bad:?} should not parse");
    }
}

#[test]
fn test_parse_checkpoint_checks_origin_and_log_signature() {
    let log = log_signer();
    let witness = witness_signer("witness.example");
    let raw = signed(&checkpoint_text(5, [9; 32]), &[&log, &witness]);

    let (checkpoint, note) =
        parse_checkpoint(&raw, ORIGIN, &log.verifier(), [&witness.verifier()]).unwrap();
    assert_eq!(checkpoint.size, 5);
    assert_eq!(checkpoint.hash, vec![9; 32]);
    assert_eq!(note.sigs.len(), 2);

    assert!(matches!(
        parse_checkpoint(&raw, "other.origin", &log.verifier(), Vec::<&Verifier>::new()),
        Err(NoteError::OriginMismatch { .. })
    ));

    let witness_only = signed(&checkpoint_text(5, [9; 32]), &[&witness]);
    assert_eq!(
        parse_checkpoint(&witness_only, ORIGIN, &log.verifier(), [&witness.verifier()])
            .map(|_| ()),
        Err(NoteError::MissingSignature(log.name().to_string()))
    );
}

#[test]
fn test_combine_orders_signatures() {
    let log = log_signer();
    let a = witness_signer("a.witness");
    let b = witness_signer("b.witness");
    let text = checkpoint_text(8, [3; 32]);
    let from_a = signed(&text, &[&log, &a]);
    let from_b = signed(&text, &[&log, &b]);

    let merged = combine(&[from_b, from_a], &log.verifier(), &[a.verifier(), b.verifier()])
        .unwrap();
    let note = open(&merged, [&log.verifier(), &a.verifier(), &b.verifier()]).unwrap();
    assert_eq!(note.text, text);
    let names: Vec<_> = note.sigs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["example.com/log", "a.witness", "b.witness"]);
}

#[test]
fn test_combine_rejects_differing_text() {
    let log = log_signer();
    let a = witness_signer("a.witness");
    let b = witness_signer("b.witness");
    let from_a = signed(&format!("{}ts 1\n", checkpoint_text(8, [3; 32])), &[&log, &a]);
    let from_b = signed(&format!("{}ts 2\n", checkpoint_text(8, [3; 32])), &[&log, &b]);

    assert!(matches!(
        combine(&[from_a, from_b], &log.verifier(), &[a.verifier(), b.verifier()]),
        Err(NoteError::Combine(_))
    ));
}

#[test]
fn test_combine_requires_every_witness() {
    let log = log_signer();
    let a = witness_signer("a.witness");
    let b = witness_signer("b.witness");
    let from_a = signed(&checkpoint_text(8, [3; 32]), &[&log, &a]);

    assert_eq!(
        combine(&[from_a], &log.verifier(), &[a.verifier(), b.verifier()]),
        Err(NoteError::MissingSignature("b.witness".to_string()))
    );
    assert!(combine::<Vec<u8>>(&[], &log.verifier(), &[]).is_err());
}
