use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RpcConfig {
    /// Address to listen on
    pub listen: SocketAddr,
    /// Whether to serve prometheus metrics at `/metrics`
    pub export_metrics: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            export_metrics: true,
        }
    }
}
