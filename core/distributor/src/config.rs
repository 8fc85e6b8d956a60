use std::env;
use std::path::PathBuf;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    pub static ref DISTRIBUTOR_HOME_DIR: PathBuf = env::var("DISTRIBUTOR_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_default()
                .join(".distributor")
        });
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory of the RocksDB database.
    pub path: PathBuf,
    /// How long a write waits on a lock held by a concurrent write before giving up.
    pub lock_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DISTRIBUTOR_HOME_DIR.join("data/distributor"),
            lock_timeout_ms: 1000,
        }
    }
}
