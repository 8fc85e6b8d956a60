mod config;
mod registry;

pub use config::{LogConfig, RegistryConfig};
pub use registry::{Registry, RegistryError};
