//! Database module - MySQL implementations using SQLx

pub mod connection;
pub mod mysql;

pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlUserRepository;
