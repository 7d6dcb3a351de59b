use crate::database_drivers::{utils, DatabaseDriver};
use anyhow::{bail, Result};
use async_trait::async_trait;
use log::debug;
use sqlx::Executor;
use sqlx::{Connection, PgConnection};

pub struct PostgresDriver {
    db: PgConnection,
}

impl PostgresDriver {
    pub async fn new(db_url: &str) -> Result<PostgresDriver> {
        let db_url = normalize_url(db_url)?;
        let client = PgConnection::connect(db_url.as_str()).await?;

        Ok(PostgresDriver { db: client })
    }
}

// sqlx only understands the postgres:// and postgresql:// schemes
pub fn normalize_url(db_url: &str) -> Result<String> {
    let mut parsed_db_url = url::Url::parse(db_url)?;

    if parsed_db_url.scheme() != "postgresql" && parsed_db_url.set_scheme("postgresql").is_err() {
        bail!("Couldn't use {} as a postgres url", parsed_db_url.scheme());
    }

    Ok(parsed_db_url.to_string())
}

#[async_trait]
impl DatabaseDriver for PostgresDriver {
    async fn execute(&mut self, query: &str) -> Result<()> {
        self.db.execute(query).await?;
        Ok(())
    }

    async fn create_database(&mut self, database_name: &str) -> Result<()> {
        let query = format!(
            "CREATE DATABASE {}",
            utils::escape_postgres_name(database_name)
        );
        debug!("Executing SQL : {}", query);

        sqlx::query(query.as_str()).execute(&mut self.db).await?;
        Ok(())
    }

    async fn create_database_if_not_exists(&mut self, database_name: &str) -> Result<()> {
        let query = "SELECT 1 FROM pg_database WHERE datname = $1";
        debug!("Executing SQL : {}", query);

        let existing: Option<i32> = sqlx::query_scalar(query)
            .bind(database_name)
            .fetch_optional(&mut self.db)
            .await?;

        if existing.is_none() {
            self.create_database(database_name).await?;
        }

        Ok(())
    }

    // WITH (FORCE) terminates other sessions, needs PostgreSQL 13 or newer
    async fn drop_database(&mut self, database_name: &str) -> Result<()> {
        let query = format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            utils::escape_postgres_name(database_name)
        );
        debug!("Executing SQL : {}", query);

        sqlx::query(query.as_str()).execute(&mut self.db).await?;
        Ok(())
    }
}
