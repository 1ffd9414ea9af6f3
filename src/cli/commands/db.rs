use anyhow::Context;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::PgStore;

/// Open a pool using the process configuration
pub async fn connect() -> anyhow::Result<PgStore> {
    PgStore::connect(&config().database)
        .await
        .context("failed to connect to database (check DATABASE_URL or PG* variables)")
}

pub async fn migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect().await?;
    store.migrate().await.context("failed to apply migrations")?;
    store.close().await;

    output_success(output_format, "Migrations applied", None)
}
