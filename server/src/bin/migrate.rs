use anyhow::Result;
use catalog_server::config::AppConfig;
use sql_connection::{SqlMigrator, connect_postgres_db};
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::from_env()?;

    info!("Applying catalog migrations");
    let pool = connect_postgres_db(&config.database).await?;
    SqlMigrator::new(pool)
        .run_all_migrations(catalog_dao::MIGRATIONS)
        .await?;
    info!("Catalog schema is up to date");

    Ok(())
}
