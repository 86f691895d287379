/// Database layer
///
/// Connection pool management and migration running.
///
/// # Modules
///
/// - [`pool`]: PostgreSQL connection pool with health check
/// - [`migrations`]: sqlx migration runner

pub mod migrations;
pub mod pool;

pub use pool::{create_pool, DatabaseConfig};
