use anyhow::{bail, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::{env, fs, path::Path};

pub const CONFIG_FILE: &str = "./dbprov.toml";

pub fn database_url() -> Result<String> {
    if let Ok(v) = env::var("DATABASE_URL") {
        if !v.is_empty() {
            return Ok(v);
        }
    }

    bail!("missing DATABASE_URL env variable")
}

pub fn database_name() -> Option<String> {
    if let Ok(v) = env::var("DATABASE_NAME") {
        if !v.is_empty() {
            return Some(v);
        }
    }

    None
}

pub fn debug_logging() -> bool {
    if let Ok(v) = env::var("DATABASE_LOG_LEVEL") {
        return v.eq_ignore_ascii_case("debug");
    }

    false
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ProjectConfig {
    pub database_url: String,
    pub database_name: Option<String>,
}

pub fn load_config_file(project_name: &str) -> Result<ProjectConfig> {
    load_project(Path::new(CONFIG_FILE), project_name)
}

pub fn load_project(file_path: &Path, project_name: &str) -> Result<ProjectConfig> {
    if !file_path.exists() {
        bail!("{} don't exist", file_path.display());
    }

    let contents = fs::read_to_string(file_path)?;
    let mut projects: HashMap<String, ProjectConfig> = toml::from_str(contents.as_str())?;

    match projects.remove(project_name) {
        Some(project) => Ok(project),
        None => bail!("didn't find config for {}", project_name),
    }
}

// --name wins over the project file, which wins over DATABASE_NAME
pub fn resolve_database_name(
    from_args: Option<String>,
    from_project: Option<String>,
    from_env: Option<String>,
) -> Result<String> {
    match from_args.or(from_project).or(from_env) {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => bail!("No database name found, pass --name or set the DATABASE_NAME environment variable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn test_database_url_from_env() {
        env::set_var("DATABASE_URL", "Server=localhost;User Id=sa;Password=pw");
        assert_eq!(
            database_url().unwrap(),
            "Server=localhost;User Id=sa;Password=pw"
        );

        env::set_var("DATABASE_URL", "");
        assert!(database_url().is_err());

        env::remove_var("DATABASE_URL");
        assert!(database_url().is_err());
    }

    #[test]
    #[serial]
    fn test_database_name_from_env() {
        env::set_var("DATABASE_NAME", "app");
        assert_eq!(database_name(), Some("app".to_string()));

        env::set_var("DATABASE_NAME", "");
        assert_eq!(database_name(), None);

        env::remove_var("DATABASE_NAME");
        assert_eq!(database_name(), None);
    }

    #[test]
    #[serial]
    fn test_debug_logging_from_env() {
        env::set_var("DATABASE_LOG_LEVEL", "DEBUG");
        assert!(debug_logging());

        env::set_var("DATABASE_LOG_LEVEL", "info");
        assert!(!debug_logging());

        env::remove_var("DATABASE_LOG_LEVEL");
        assert!(!debug_logging());
    }

    #[test]
    fn test_load_project() {
        let tmp_dir = tempdir().unwrap();
        let file_path = tmp_dir.path().join("dbprov.toml");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(
            br#"
[staging]
database_url = "Server=db,1433;User Id=sa;Password=pw"
database_name = "app_staging"

[local]
database_url = "postgres://postgres@localhost/postgres"
"#,
        )
        .unwrap();

        let staging = load_project(&file_path, "staging").unwrap();
        assert_eq!(
            staging,
            ProjectConfig {
                database_url: "Server=db,1433;User Id=sa;Password=pw".to_string(),
                database_name: Some("app_staging".to_string()),
            }
        );

        let local = load_project(&file_path, "local").unwrap();
        assert_eq!(local.database_url, "postgres://postgres@localhost/postgres");
        assert_eq!(local.database_name, None);
    }

    #[test]
    fn test_load_project_unknown_project() {
        let tmp_dir = tempdir().unwrap();
        let file_path = tmp_dir.path().join("dbprov.toml");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"[staging]\ndatabase_url = \"Server=db\"\n")
            .unwrap();

        let result = load_project(&file_path, "production");
        assert!(result.is_err());
        assert!(result
            .err()
            .unwrap()
            .to_string()
            .contains("didn't find config for production"));
    }

    #[test]
    fn test_load_project_missing_url() {
        let tmp_dir = tempdir().unwrap();
        let file_path = tmp_dir.path().join("dbprov.toml");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"[staging]\ndatabase_name = \"app\"\n").unwrap();

        assert!(load_project(&file_path, "staging").is_err());
    }

    #[test]
    fn test_load_project_missing_file() {
        let tmp_dir = tempdir().unwrap();
        let result = load_project(&tmp_dir.path().join("dbprov.toml"), "staging");
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_database_name_precedence() {
        let name = resolve_database_name(
            Some("from_args".to_string()),
            Some("from_project".to_string()),
            Some("from_env".to_string()),
        )
        .unwrap();
        assert_eq!(name, "from_args");

        let name = resolve_database_name(
            None,
            Some("from_project".to_string()),
            Some("from_env".to_string()),
        )
        .unwrap();
        assert_eq!(name, "from_project");

        let name = resolve_database_name(None, None, Some("from_env".to_string())).unwrap();
        assert_eq!(name, "from_env");
    }

    #[test]
    fn test_resolve_database_name_missing() {
        assert!(resolve_database_name(None, None, None).is_err());
        assert!(resolve_database_name(Some("  ".to_string()), None, None).is_err());
    }
}
