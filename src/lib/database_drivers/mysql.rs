use crate::database_drivers::{utils, DatabaseDriver};
use anyhow::{bail, Result};
use async_trait::async_trait;
use log::debug;
use sqlx::Executor;
use sqlx::{Connection, MySqlConnection};

// Serves both mysql:// and mariadb:// connection strings
pub struct MySQLDriver {
    db: MySqlConnection,
}

impl MySQLDriver {
    pub async fn new(db_url: &str) -> Result<MySQLDriver> {
        let db_url = normalize_url(db_url)?;
        let client = MySqlConnection::connect(db_url.as_str()).await?;

        Ok(MySQLDriver { db: client })
    }
}

pub fn normalize_url(db_url: &str) -> Result<String> {
    let mut parsed_db_url = url::Url::parse(db_url)?;

    if parsed_db_url.scheme() != "mysql" && parsed_db_url.set_scheme("mysql").is_err() {
        bail!("Couldn't use {} as a mysql url", parsed_db_url.scheme());
    }

    Ok(parsed_db_url.to_string())
}

#[async_trait]
impl DatabaseDriver for MySQLDriver {
    async fn execute(&mut self, query: &str) -> Result<()> {
        self.db.execute(query).await?;
        Ok(())
    }

    async fn create_database(&mut self, database_name: &str) -> Result<()> {
        let query = format!("CREATE DATABASE {}", utils::escape_mysql_name(database_name));
        debug!("Executing SQL : {}", query);

        sqlx::query(query.as_str()).execute(&mut self.db).await?;
        Ok(())
    }

    async fn create_database_if_not_exists(&mut self, database_name: &str) -> Result<()> {
        let query = format!(
            "CREATE DATABASE IF NOT EXISTS {}",
            utils::escape_mysql_name(database_name)
        );
        debug!("Executing SQL : {}", query);

        sqlx::query(query.as_str()).execute(&mut self.db).await?;
        Ok(())
    }

    async fn drop_database(&mut self, database_name: &str) -> Result<()> {
        let query = format!(
            "DROP DATABASE IF EXISTS {}",
            utils::escape_mysql_name(database_name)
        );
        debug!("Executing SQL : {}", query);

        sqlx::query(query.as_str()).execute(&mut self.db).await?;
        Ok(())
    }
}
