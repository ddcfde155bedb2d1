use anyhow::Context;
use deadpool_postgres::Pool;
use tracing::info;

/// A named, plain-SQL migration. Applied once, in list order.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub name: &'static str,
    pub sql: &'static str,
}

pub struct SqlMigrator {
    pool: Pool,
}

impl SqlMigrator {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    pub async fn run_all_migrations(
        &self, migrations: &[Migration],
    ) -> anyhow::Result<()> {
        let mut client = self.pool.get().await?;

        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS _migrations (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(255) NOT NULL UNIQUE,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )",
            )
            .await?;

        for migration in migrations {
            let applied: i64 = client
                .query_one(
                    "SELECT COUNT(*) FROM _migrations WHERE name = $1",
                    &[&migration.name],
                )
                .await?
                .get(0);

            if applied > 0 {
                info!("Migration {} already applied, skipping", migration.name);
                continue;
            }

            let tx = client.transaction().await?;
            tx.batch_execute(migration.sql)
                .await
                .with_context(|| format!("Failed to run migration {}", migration.name))?;
            tx.execute(
                "INSERT INTO _migrations (name, applied_at) VALUES ($1, NOW())",
                &[&migration.name],
            )
            .await?;
            tx.commit().await?;

            info!("Migration {} completed successfully", migration.name);
        }

        Ok(())
    }
}
