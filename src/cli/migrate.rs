use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub struct MigrationOpts {
    pub database_url: String,
}

/// Apply any pending migrations embedded from the `migrations` directory.
pub async fn run_migrations(opts: MigrationOpts) -> anyhow::Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&opts.database_url)
        .await?;

    info!("Running database migrations.");

    sqlx::migrate!("./migrations").run(&pool).await?;

    pool.close().await;

    Ok(())
}
