use std::time::Duration;
use sqlx::{Error as SqlxError, Pool, Postgres, postgres::PgPoolOptions};
use crate::config::Config;

#[derive(Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
    pub async fn connect(config: &Config, database_url: &str) -> Result<Self, SqlxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }
}
