mod aggregator;
mod config;
mod database;
mod distributor;
mod metrics;
mod rocks;

pub use aggregator::Quorum;
pub use config::{DatabaseConfig, DISTRIBUTOR_HOME_DIR};
pub use database::{
    DatabaseError,
    DistributorDatabase,
    DistributorDatabaseQuery,
    DistributorTransaction,
};
pub use distributor::Distributor;
pub use rocks::{
    RocksDistributorDatabase,
    RocksDistributorDatabaseQuery,
    RocksDistributorTransaction,
};
