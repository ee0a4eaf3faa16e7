use std::{ops::Deref, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::debug;

/// A shared handle to the Postgres database storing categories.
#[derive(Clone)]
pub struct PostgresConnection(PgPool);

impl PostgresConnection {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    /// Open a connection pool to the database.
    ///
    /// # Arguments
    ///
    /// * `database_url` - Connection string for the database.
    /// * `pool_size` - Maximum number of connections kept in the pool.
    /// * `timeout_seconds` - How long to wait when acquiring a connection.
    pub async fn connect(
        database_url: &str,
        pool_size: u32,
        timeout_seconds: u8,
    ) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(timeout_seconds.into()))
            .connect(database_url)
            .await?;

        debug!(pool_size, "Connected to database.");

        Ok(Self::new(pool))
    }
}

impl Deref for PostgresConnection {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
