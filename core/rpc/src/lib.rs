mod client;
mod config;
mod error;
mod server;

pub use client::{ClientError, RestClient};
pub use config::RpcConfig;
pub use error::RpcError;
pub use server::{router, serve, spawn_rpc_server};
