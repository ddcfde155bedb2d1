pub use config::{DbConnectConfig, DbOptionsConfig, PostgresDbConfig};
pub use deadpool_postgres::{Object, Pool, PoolError};
pub use impl_get_connect::SqlConnect;
pub use migrator::{Migration, SqlMigrator};
pub use pool::connect_postgres_db;

pub mod config;
mod impl_get_connect;
mod migrator;
mod pool;
