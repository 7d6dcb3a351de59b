use crate::database_drivers::{self, DatabaseDriver};
use crate::utils::{read_file_content, split_batches};
use anyhow::Result;
use log::{debug, info, warn};
use std::path::PathBuf;

pub async fn sql_command(connection_string: String, sql_commands: String) -> Result<()> {
    let mut database = database_drivers::new(&connection_string).await?;

    run_batches(database.as_mut(), &sql_commands).await
}

pub async fn sql_file(connection_string: String, sql_file: PathBuf) -> Result<()> {
    info!("Executing sql file {}", sql_file.display());

    let sql_commands = read_file_content(&sql_file)?;
    sql_command(connection_string, sql_commands).await?;

    info!("Finished executing SQL from {}", sql_file.display());

    Ok(())
}

// Batches run one after another on the same connection, the first failing
// batch stops the run.
pub(crate) async fn run_batches(database: &mut dyn DatabaseDriver, sql_commands: &str) -> Result<()> {
    for batch in split_batches(sql_commands) {
        debug!("Executing SQL : {}", batch);

        if let Err(err) = database.execute(batch).await {
            warn!("Exception happened while executing this command: {}", batch);
            return Err(err);
        }
    }

    Ok(())
}
