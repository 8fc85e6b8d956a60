//! Keys, signed checkpoints and registries for testing the distributor.

pub mod checkpoint;
pub mod keys;
pub mod logging;
pub mod registry;
