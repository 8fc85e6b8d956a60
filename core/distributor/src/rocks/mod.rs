mod database;
mod keys;
mod query;

#[cfg(test)]
mod tests;

pub use database::{RocksDistributorDatabase, RocksDistributorTransaction};
pub use query::RocksDistributorDatabaseQuery;
