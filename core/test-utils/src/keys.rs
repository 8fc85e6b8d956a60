use distributor_registry::LogConfig;
use distributor_types::{LogId, LogInfo, WitnessId, WitnessInfo};
use tlog_note::{KeyAlgorithm, Signer};

/// A log with a freshly generated signing key.
#[derive(Debug, Clone)]
pub struct TestLog {
    pub origin: String,
    pub signer: Signer,
}

impl TestLog {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            signer: Signer::generate(origin, KeyAlgorithm::Ed25519).unwrap(),
        }
    }

    pub fn id(&self) -> LogId {
        LogId::from_origin(&self.origin)
    }

    pub fn info(&self) -> LogInfo {
        LogInfo {
            origin: self.origin.clone(),
            verifier: self.signer.verifier(),
        }
    }

    pub fn config(&self) -> LogConfig {
        LogConfig {
            origin: self.origin.clone(),
            public_key: self.signer.verifier().to_vkey(),
        }
    }
}

/// A witness with a freshly generated cosignature key.
#[derive(Debug, Clone)]
pub struct TestWitness {
    pub signer: Signer,
}

impl TestWitness {
    pub fn new(name: &str) -> Self {
        Self {
            signer: Signer::generate(name, KeyAlgorithm::CosignatureV1).unwrap(),
        }
    }

    /// Generate `n` witnesses named `witness-00`, `witness-01` and so on.
    pub fn many(n: usize) -> Vec<Self> {
        (0..n).map(|i| Self::new(&format!("witness-{i:02}"))).collect()
    }

    pub fn id(&self) -> WitnessId {
        WitnessId::from(self.signer.name())
    }

    pub fn vkey(&self) -> String {
        self.signer.verifier().to_vkey()
    }

    pub fn info(&self) -> WitnessInfo {
        WitnessInfo {
            vkey: self.vkey(),
            verifier: self.signer.verifier(),
        }
    }
}
