//! Migrate command - applies the PostgreSQL schema

use anyhow::{bail, Context};
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{
    connect_pool, run_storage_migrations, PostgresMigrator, StorageConfig,
};

/// Apply all pending migrations to the configured database
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    let StorageConfig::Postgres(pg_config) = config.storage.storage_config()? else {
        bail!("Migrations require storage.backend = \"postgres\"");
    };

    let pool = connect_pool(&pg_config).await?;
    let applied = run_storage_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool.clone()).current_version().await?;

    info!(
        applied,
        version = version.unwrap_or_default(),
        "Migrations complete"
    );

    pool.close().await;
    Ok(())
}
