use std::time::Duration;

use anyhow::{Context, Result};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use sql_connection::{Migration, SqlMigrator};
use testcontainers_modules::{
    postgres::Postgres,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};
use tokio::time::sleep;
use tokio_postgres::NoTls;

/// Throwaway PostgreSQL with the given migrations applied.
pub struct TestPostgresContainer {
    pub pool: Pool,
    pub connection_string: String,
    _container: ContainerAsync<Postgres>,
}

impl TestPostgresContainer {
    pub async fn new(migrations: &[Migration]) -> Result<Self> {
        let container = Postgres::default()
            .with_env_var("POSTGRES_DB", "testdb")
            .with_env_var("POSTGRES_USER", "testuser")
            .with_env_var("POSTGRES_PASSWORD", "testpass")
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let connection_string =
            format!("postgresql://testuser:testpass@{host}:{port}/testdb");

        let pool = Self::create_pool(&connection_string).await?;

        SqlMigrator::new(pool.clone())
            .run_all_migrations(migrations)
            .await
            .context("Failed to apply migrations")?;

        Ok(Self {
            pool,
            connection_string,
            _container: container,
        })
    }

    async fn create_pool(connection_string: &str) -> Result<Pool> {
        const MAX_ATTEMPTS: u32 = 20;

        let pg_config = connection_string.parse::<tokio_postgres::Config>()?;
        let mgr = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let pool = Pool::builder(mgr)
            .max_size(10)
            .build()
            .context("Failed to build PostgreSQL connection pool")?;

        for attempt in 1..=MAX_ATTEMPTS {
            let ready = match pool.get().await {
                Ok(client) => client.query_one("SELECT 1", &[]).await.is_ok(),
                Err(_) => false,
            };
            if ready {
                return Ok(pool);
            }
            if attempt < MAX_ATTEMPTS {
                sleep(Duration::from_millis(500)).await;
            }
        }

        anyhow::bail!("PostgreSQL not ready after {MAX_ATTEMPTS} attempts")
    }

    pub async fn execute_sql(&self, sql: &str) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .batch_execute(sql)
            .await
            .context("Failed to execute SQL")?;
        Ok(())
    }
}
