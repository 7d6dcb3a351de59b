use crate::config;
use anyhow::Result;
use async_trait::async_trait;
use log::debug;

#[cfg(test)]
use mockall::automock;

pub mod mysql;
pub mod postgres;
pub mod sqlserver;
mod utils;

// DatabaseDriver is a trait that all database drivers must implement.
// A driver owns exactly one open connection which is closed when it's dropped.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseDriver: Send {
    // execute one batch of raw sql and drain every result it produces
    async fn execute(&mut self, query: &str) -> Result<()>;

    // create database with the specific driver
    async fn create_database(&mut self, database_name: &str) -> Result<()>;

    // create database unless a database with that name already exists
    async fn create_database_if_not_exists(&mut self, database_name: &str) -> Result<()>;

    // drop database, doing nothing when it isn't there
    async fn drop_database(&mut self, database_name: &str) -> Result<()>;
}

// Opens a connection and picks the database driver based on the connection string
pub async fn new(connection_string: &str) -> Result<Box<dyn DatabaseDriver>> {
    let driver = config::Database::from_connection_string(connection_string)?;

    debug!(
        "About to open connection with this connection string: {}",
        connection_string
    );
    debug!("Using the {} driver", driver.as_str());

    match driver {
        config::Database::SqlServer => {
            let driver = sqlserver::SqlServerDriver::new(connection_string).await?;
            Ok(Box::new(driver))
        }
        config::Database::Postgres => {
            let driver = postgres::PostgresDriver::new(connection_string).await?;
            Ok(Box::new(driver))
        }
        config::Database::MySQL | config::Database::MariaDB => {
            let driver = mysql::MySQLDriver::new(connection_string).await?;
            Ok(Box::new(driver))
        }
    }
}
