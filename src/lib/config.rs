use anyhow::{bail, Result};
use regex::Regex;
use sqlx::mysql::MySqlDatabaseError;
use std::sync::OnceLock;

static URL_SCHEME: OnceLock<Regex> = OnceLock::new();

/// The scheme of a `scheme://...` connection string. Only a leading RFC 3986
/// scheme counts, so a `://` inside an ADO.NET value is not mistaken for one.
pub fn url_scheme(connection_string: &str) -> Option<&str> {
    let scheme = URL_SCHEME.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://").expect("url scheme regex is valid")
    });

    scheme
        .captures(connection_string)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Database {
    SqlServer,
    Postgres,
    MariaDB,
    MySQL,
}

impl Database {
    pub fn new(s: &str) -> Result<Database> {
        match s {
            "sqlserver" | "mssql" => Ok(Database::SqlServer),
            "psql" | "postgres" | "postgresql" => Ok(Database::Postgres),
            "mariadb" => Ok(Database::MariaDB),
            "mysql" => Ok(Database::MySQL),
            _ => bail!("Unknown database driver"),
        }
    }

    /// Works out which server a connection string talks to. Anything that is
    /// not a `scheme://` url is treated as an ADO.NET style SQL Server string.
    pub fn from_connection_string(connection_string: &str) -> Result<Database> {
        let trimmed = connection_string.trim();

        if trimmed.is_empty() {
            bail!("Connection string is empty");
        }

        if trimmed.starts_with("jdbc:sqlserver://") {
            return Ok(Database::SqlServer);
        }

        match url_scheme(trimmed) {
            Some(scheme) => Database::new(scheme),
            None => Ok(Database::SqlServer),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Database::SqlServer => "sqlserver",
            Database::Postgres => "postgres",
            Database::MariaDB => "mariadb",
            Database::MySQL => "mysql",
        }
    }

    /// True when `err` says the database named in the connection does not exist
    /// or can't be opened. Walks the whole error chain.
    pub fn is_missing_database(&self, err: &anyhow::Error) -> bool {
        err.chain().any(|cause| {
            let message = cause.to_string();

            match self {
                Database::SqlServer => {
                    if let Some(tiberius::error::Error::Server(token)) =
                        cause.downcast_ref::<tiberius::error::Error>()
                    {
                        return token.code() == 4060
                            || token.message().starts_with("Cannot open database");
                    }

                    message.starts_with("Cannot open database")
                }
                Database::Postgres => {
                    if let Some(sqlx::Error::Database(db_err)) = cause.downcast_ref::<sqlx::Error>()
                    {
                        if db_err.code().as_deref() == Some("3D000") {
                            return true;
                        }
                    }

                    message.contains("database \"") && message.ends_with("does not exist")
                }
                Database::MariaDB | Database::MySQL => {
                    if let Some(sqlx::Error::Database(db_err)) = cause.downcast_ref::<sqlx::Error>()
                    {
                        if let Some(mysql_err) = db_err.try_downcast_ref::<MySqlDatabaseError>() {
                            return mysql_err.number() == 1049;
                        }
                    }

                    message.contains("Unknown database")
                }
            }
        })
    }
}
