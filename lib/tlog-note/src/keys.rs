use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signature as Ed25519Signature, Signer as _, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::NoteError;

const PRIVATE_KEY_PREFIX: &str = "PRIVATE+KEY+";

/// The signature algorithms a note key can be declared with. The algorithm is the first byte of
/// the encoded key material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// Plain Ed25519 signature over the note text. Used by logs.
    Ed25519,
    /// Timestamped Ed25519 witness cosignature (`cosignature/v1`).
    CosignatureV1,
}

impl KeyAlgorithm {
    pub const fn id(self) -> u8 {
        match self {
            KeyAlgorithm::Ed25519 => 0x01,
            KeyAlgorithm::CosignatureV1 => 0x04,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x01 => Some(KeyAlgorithm::Ed25519),
            0x04 => Some(KeyAlgorithm::CosignatureV1),
            _ => None,
        }
    }

    /// Length of the signature bytes produced by this algorithm, excluding the key hash prefix.
    const fn signature_len(self) -> usize {
        match self {
            KeyAlgorithm::Ed25519 => 64,
            KeyAlgorithm::CosignatureV1 => 72,
        }
    }
}

/// Compute the 32-bit key hash identifying a key in note signature lines.
pub fn key_hash(name: &str, alg: KeyAlgorithm, key: &[u8]) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(b"\n");
    hasher.update([alg.id()]);
    hasher.update(key);
    let digest = hasher.finalize();
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Key names must be non-empty and contain neither whitespace nor `+`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c == '+')
}

/// The message a `cosignature/v1` signature covers.
fn cosignature_message(timestamp: u64, msg: &[u8]) -> Vec<u8> {
    let mut out = format!("cosignature/v1\ntime {timestamp}\n").into_bytes();
    out.extend_from_slice(msg);
    out
}

struct EncodedKey {
    name: String,
    hash: u32,
    alg: KeyAlgorithm,
    material: [u8; 32],
}

/// Parse `name+hash+base64(alg || material)`.
fn decode_key(encoded: &str) -> Result<EncodedKey, NoteError> {
    let mut parts = encoded.splitn(3, '+');
    let (Some(name), Some(hash), Some(data)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(NoteError::MalformedKey(format!("{encoded:?} is not name+hash+key")));
    };
    if !is_valid_name(name) {
        return Err(NoteError::MalformedKey(format!("invalid key name {name:?}")));
    }
    if hash.len() != 8 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(NoteError::MalformedKey(format!("invalid key hash {hash:?}")));
    }
    let hash = u32::from_str_radix(hash, 16)
        .map_err(|e| NoteError::MalformedKey(format!("invalid key hash: {e}")))?;
    let data = STANDARD
        .decode(data)
        .map_err(|e| NoteError::MalformedKey(format!("invalid key encoding: {e}")))?;
    let Some((&alg, material)) = data.split_first() else {
        return Err(NoteError::MalformedKey("empty key material".to_string()));
    };
    let alg = KeyAlgorithm::from_id(alg)
        .ok_or_else(|| NoteError::MalformedKey(format!("unknown key algorithm {alg:#04x}")))?;
    let material: [u8; 32] = material
        .try_into()
        .map_err(|_| NoteError::MalformedKey(format!("bad key length {}", material.len())))?;
    if key_hash(name, alg, &material) != hash {
        return Err(NoteError::MalformedKey(format!(
            "key hash {hash:08x} does not match key {name:?}"
        )));
    }
    Ok(EncodedKey {
        name: name.to_string(),
        hash,
        alg,
        material,
    })
}

fn encode_key(name: &str, hash: u32, alg: KeyAlgorithm, material: &[u8; 32]) -> String {
    let mut data = Vec::with_capacity(33);
    data.push(alg.id());
    data.extend_from_slice(material);
    format!("{name}+{hash:08x}+{}", STANDARD.encode(data))
}

/// A public key able to check one named signature on a note.
#[derive(Clone, PartialEq, Eq)]
pub struct Verifier {
    name: String,
    hash: u32,
    alg: KeyAlgorithm,
    key: VerifyingKey,
}

impl Verifier {
    /// Parse a verifier key of the form `name+hash+base64(alg || pubkey)`.
    pub fn from_vkey(vkey: &str) -> Result<Self, NoteError> {
        let EncodedKey {
            name,
            hash,
            alg,
            material,
        } = decode_key(vkey)?;
        let key = VerifyingKey::from_bytes(&material)
            .map_err(|e| NoteError::MalformedKey(format!("invalid ed25519 key: {e}")))?;
        Ok(Self {
            name,
            hash,
            alg,
            key,
        })
    }

    /// Parse a witness key and verify it as a `cosignature/v1` key.
    ///
    /// Witnesses commonly publish their key with the plain Ed25519 algorithm byte; such keys are
    /// rehashed as cosignature keys so that they match the key hash on the witness's signature
    /// lines.
    pub fn cosignature_from_vkey(vkey: &str) -> Result<Self, NoteError> {
        let mut verifier = Self::from_vkey(vkey)?;
        if verifier.alg != KeyAlgorithm::CosignatureV1 {
            verifier.alg = KeyAlgorithm::CosignatureV1;
            verifier.hash = key_hash(
                &verifier.name,
                KeyAlgorithm::CosignatureV1,
                verifier.key.as_bytes(),
            );
        }
        Ok(verifier)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_hash(&self) -> u32 {
        self.hash
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.alg
    }

    pub fn to_vkey(&self) -> String {
        encode_key(&self.name, self.hash, self.alg, self.key.as_bytes())
    }

    /// Check `sig` (without the key hash prefix) over `msg`.
    pub fn verify(&self, msg: &[u8], sig: &[u8]) -> bool {
        if sig.len() != self.alg.signature_len() {
            return false;
        }
        match self.alg {
            KeyAlgorithm::Ed25519 => {
                let Ok(sig) = Ed25519Signature::from_slice(sig) else {
                    return false;
                };
                self.key.verify_strict(msg, &sig).is_ok()
            },
            KeyAlgorithm::CosignatureV1 => {
                let (timestamp, sig) = sig.split_at(8);
                let timestamp = u64::from_be_bytes(timestamp.try_into().unwrap_or_default());
                let Ok(sig) = Ed25519Signature::from_slice(sig) else {
                    return false;
                };
                self.key
                    .verify_strict(&cosignature_message(timestamp, msg), &sig)
                    .is_ok()
            },
        }
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Verifier({:?})", self.to_vkey())
    }
}

/// A private key producing one named signature on a note.
#[derive(Clone)]
pub struct Signer {
    name: String,
    hash: u32,
    alg: KeyAlgorithm,
    key: SigningKey,
}

impl Signer {
    /// Generate a fresh key with the given name and algorithm.
    pub fn generate(name: &str, alg: KeyAlgorithm) -> Result<Self, NoteError> {
        if !is_valid_name(name) {
            return Err(NoteError::MalformedKey(format!("invalid key name {name:?}")));
        }
        let key = SigningKey::generate(&mut OsRng);
        Ok(Self {
            name: name.to_string(),
            hash: key_hash(name, alg, key.verifying_key().as_bytes()),
            alg,
            key,
        })
    }

    /// Parse a signer key of the form `PRIVATE+KEY+name+hash+base64(alg || seed)`.
    pub fn from_skey(skey: &str) -> Result<Self, NoteError> {
        let encoded = skey
            .strip_prefix(PRIVATE_KEY_PREFIX)
            .ok_or_else(|| NoteError::MalformedKey("missing PRIVATE+KEY prefix".to_string()))?;
        let mut parts = encoded.splitn(3, '+');
        let (Some(name), Some(hash), Some(data)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(NoteError::MalformedKey("signer key is not name+hash+key".to_string()));
        };
        let data = STANDARD
            .decode(data)
            .map_err(|e| NoteError::MalformedKey(format!("invalid key encoding: {e}")))?;
        let Some((&alg, seed)) = data.split_first() else {
            return Err(NoteError::MalformedKey("empty key material".to_string()));
        };
        let alg = KeyAlgorithm::from_id(alg)
            .ok_or_else(|| NoteError::MalformedKey(format!("unknown key algorithm {alg:#04x}")))?;
        let seed: [u8; 32] = seed
            .try_into()
            .map_err(|_| NoteError::MalformedKey(format!("bad key length {}", seed.len())))?;
        let key = SigningKey::from_bytes(&seed);
        let signer = Self {
            name: name.to_string(),
            hash: key_hash(name, alg, key.verifying_key().as_bytes()),
            alg,
            key,
        };
        if !is_valid_name(name) || format!("{:08x}", signer.hash) != hash {
            return Err(NoteError::MalformedKey(format!(
                "signer key hash {hash:?} does not match key {name:?}"
            )));
        }
        Ok(signer)
    }

    pub fn to_skey(&self) -> String {
        format!(
            "{PRIVATE_KEY_PREFIX}{}",
            encode_key(&self.name, self.hash, self.alg, self.key.as_bytes())
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_hash(&self) -> u32 {
        self.hash
    }

    pub fn verifier(&self) -> Verifier {
        Verifier {
            name: self.name.clone(),
            hash: self.hash,
            alg: self.alg,
            key: self.key.verifying_key(),
        }
    }

    /// Sign `msg`. Cosignatures are stamped with the current time.
    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.sign_at(msg, now)
    }

    /// Sign `msg`, stamping cosignatures with `timestamp` (seconds since the unix epoch). Plain
    /// Ed25519 signatures ignore the timestamp.
    pub fn sign_at(&self, msg: &[u8], timestamp: u64) -> Vec<u8> {
        match self.alg {
            KeyAlgorithm::Ed25519 => self.key.sign(msg).to_bytes().to_vec(),
            KeyAlgorithm::CosignatureV1 => {
                let sig = self.key.sign(&cosignature_message(timestamp, msg));
                let mut out = Vec::with_capacity(72);
                out.extend_from_slice(&timestamp.to_be_bytes());
                out.extend_from_slice(&sig.to_bytes());
                out
            },
        }
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signer").field(&self.verifier()).finish()
    }
}
