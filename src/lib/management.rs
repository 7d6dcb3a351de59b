use crate::config::Database;
use crate::database_drivers::{self, DatabaseDriver};
use anyhow::Result;
use log::{error, info};

pub async fn create(connection_string: String, database_name: String) -> Result<()> {
    let mut database = database_drivers::new(&connection_string).await?;

    create_with(database.as_mut(), &database_name).await
}

pub async fn create_if_not_exists(connection_string: String, database_name: String) -> Result<()> {
    let mut database = database_drivers::new(&connection_string).await?;

    create_if_not_exists_with(database.as_mut(), &database_name).await
}

pub async fn drop(connection_string: String, database_name: String) -> Result<()> {
    let driver = Database::from_connection_string(&connection_string)?;

    let result: Result<()> = async {
        let mut database = database_drivers::new(&connection_string).await?;
        drop_with(database.as_mut(), &database_name).await
    }
    .await;

    tolerate_missing_database(driver, &database_name, result)
}

pub async fn drop_and_create(connection_string: String, database_name: String) -> Result<()> {
    drop(connection_string.clone(), database_name.clone()).await?;
    create(connection_string, database_name).await
}

pub(crate) async fn create_with(database: &mut dyn DatabaseDriver, database_name: &str) -> Result<()> {
    database.create_database(database_name).await?;
    info!("Database {} is created", database_name);

    Ok(())
}

pub(crate) async fn create_if_not_exists_with(
    database: &mut dyn DatabaseDriver,
    database_name: &str,
) -> Result<()> {
    database.create_database_if_not_exists(database_name).await?;
    info!("Database {} is created if it was not there", database_name);

    Ok(())
}

// Only announced once a connection is open
pub(crate) async fn drop_with(database: &mut dyn DatabaseDriver, database_name: &str) -> Result<()> {
    info!("About to drop database {}", database_name);
    database.drop_database(database_name).await?;
    info!("Database {} is dropped", database_name);

    Ok(())
}

// A database that can't be opened is as good as dropped
fn tolerate_missing_database(driver: Database, database_name: &str, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if driver.is_missing_database(&err) => {
            error!("Database {} does not exist", database_name);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database_drivers::MockDatabaseDriver;
    use anyhow::anyhow;

    #[tokio::test]
    async fn test_create_with_passes_name() {
        let mut mock = MockDatabaseDriver::new();
        mock.expect_create_database()
            .withf(|name| name == "app")
            .times(1)
            .returning(|_| Ok(()));

        create_with(&mut mock, "app").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_with_propagates_errors() {
        let mut mock = MockDatabaseDriver::new();
        mock.expect_create_database()
            .times(1)
            .returning(|_| Err(anyhow!("Database 'app' already exists.")));

        let result = create_with(&mut mock, "app").await;
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_create_if_not_exists_with_uses_guarded_create() {
        let mut mock = MockDatabaseDriver::new();
        mock.expect_create_database_if_not_exists()
            .withf(|name| name == "app")
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_create_database().times(0);

        create_if_not_exists_with(&mut mock, "app").await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_with_passes_name() {
        let mut mock = MockDatabaseDriver::new();
        mock.expect_drop_database()
            .withf(|name| name == "app")
            .times(1)
            .returning(|_| Ok(()));

        drop_with(&mut mock, "app").await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_with_propagates_errors() {
        let mut mock = MockDatabaseDriver::new();
        mock.expect_drop_database()
            .times(1)
            .returning(|_| Err(anyhow!("Cannot drop database \"app\" because it is currently in use.")));

        let result = drop_with(&mut mock, "app").await;
        assert!(result.err().unwrap().to_string().contains("currently in use"));
    }

    #[tokio::test]
    async fn test_drop_fails_before_announcing_when_server_unreachable() {
        let result = drop(
            "Server=nonexistent.invalid;User Id=sa;Password=pw".to_string(),
            "app".to_string(),
        )
        .await;

        let err = result.err().unwrap();
        assert!(err.is::<std::io::Error>());
    }

    #[test]
    fn test_missing_database_on_drop_is_not_an_error() {
        let result = Err(anyhow!(
            "Cannot open database \"app\" requested by the login. The login failed."
        ));

        assert!(tolerate_missing_database(Database::SqlServer, "app", result).is_ok());
    }

    #[test]
    fn test_other_drop_errors_propagate() {
        let result = Err(anyhow!("Login failed for user 'sa'."));
        let result = tolerate_missing_database(Database::SqlServer, "app", result);

        assert!(result.is_err());
        assert_eq!(result.err().unwrap().to_string(), "Login failed for user 'sa'.");
    }

    #[test]
    fn test_missing_database_on_drop_postgres() {
        let result = Err(anyhow!("database \"app\" does not exist"));
        assert!(tolerate_missing_database(Database::Postgres, "app", result).is_ok());
    }

    #[test]
    fn test_successful_drop_passes_through() {
        assert!(tolerate_missing_database(Database::MySQL, "app", Ok(())).is_ok());
    }

    #[tokio::test]
    async fn test_drop_rejects_unknown_driver_before_connecting() {
        let result = drop("redis://localhost".to_string(), "app".to_string()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_drop_and_create_stops_when_drop_fails() {
        let result = drop_and_create("redis://localhost".to_string(), "app".to_string()).await;

        assert!(result.is_err());
        assert!(result
            .err()
            .unwrap()
            .to_string()
            .contains("Unknown database driver"));
    }
}
