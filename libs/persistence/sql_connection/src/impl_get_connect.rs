use deadpool_postgres::{Object, Pool, PoolError};

/// Cloneable handle every repository holds on to.
#[derive(Debug, Clone)]
pub struct SqlConnect {
    pool: Pool,
}

impl SqlConnect {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    pub async fn get_client(&self) -> Result<Object, PoolError> {
        self.pool.get().await
    }

    pub fn pool(&self) -> &Pool { &self.pool }

    /// Get pool statistics for monitoring: `(available, size)`
    pub fn get_pool_status(&self) -> (usize, usize) {
        let status = self.pool.status();
        (status.available, status.size)
    }
}
