mod config;
mod database_drivers;
mod execute;
mod management;
mod utils;

use std::path::PathBuf;

pub use utils::split_batches;

pub async fn create_database(connection_string: String, database_name: String) -> anyhow::Result<()> {
    management::create(connection_string, database_name).await
}

pub async fn create_database_if_not_exists(
    connection_string: String,
    database_name: String,
) -> anyhow::Result<()> {
    management::create_if_not_exists(connection_string, database_name).await
}

/// Drops the database, kicking other sessions first. A database that does
/// not exist is logged and treated as success.
pub async fn drop_database(connection_string: String, database_name: String) -> anyhow::Result<()> {
    management::drop(connection_string, database_name).await
}

pub async fn drop_and_create_database(
    connection_string: String,
    database_name: String,
) -> anyhow::Result<()> {
    management::drop_and_create(connection_string, database_name).await
}

/// Runs `sql_commands` batch by batch over a single connection, splitting on
/// lines that only contain `GO`.
pub async fn execute_sql_command(
    connection_string: String,
    sql_commands: String,
) -> anyhow::Result<()> {
    execute::sql_command(connection_string, sql_commands).await
}

pub async fn execute_sql_file(connection_string: String, sql_file: PathBuf) -> anyhow::Result<()> {
    execute::sql_file(connection_string, sql_file).await
}
