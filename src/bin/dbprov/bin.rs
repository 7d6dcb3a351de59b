use clap::{crate_description, crate_version, Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

mod config;

fn cli() -> Command {
    let name_arg = Arg::new("name")
        .short('n')
        .long("name")
        .help("Name of the database, defaults to DATABASE_NAME")
        .action(ArgAction::Set);

    Command::new("dbprov")
        .about(crate_description!())
        .version(format!("v{}", crate_version!()))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .help("The project in dbprov.toml to use")
                .action(ArgAction::Set)
                .num_args(0..=1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log every statement sent to the server")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommands([
            Command::new("create")
                .about("Create database")
                .arg(name_arg.clone())
                .arg(
                    Arg::new("if-not-exists")
                        .long("if-not-exists")
                        .help("Do nothing when the database already exists")
                        .action(ArgAction::SetTrue),
                ),
            Command::new("drop")
                .about("Drop database, kicking other sessions off first")
                .arg(name_arg.clone()),
            Command::new("recreate")
                .about("Drop and create database")
                .arg(name_arg),
            Command::new("exec")
                .about("Execute SQL, batches are separated by GO lines")
                .arg(Arg::new("sql").required(true).index(1)),
            Command::new("exec-file")
                .about("Execute a SQL script file, batches are separated by GO lines")
                .arg(Arg::new("path").required(true).index(1)),
        ])
}

fn database_name(query_matches: &ArgMatches, from_project: Option<String>) -> anyhow::Result<String> {
    config::resolve_database_name(
        query_matches.get_one::<String>("name").cloned(),
        from_project,
        config::database_name(),
    )
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let verbose = matches.get_flag("verbose")
        || matches
            .subcommand()
            .is_some_and(|(_, query_matches)| query_matches.get_flag("verbose"));

    let level = if verbose || config::debug_logging() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
        .expect("Failed to initialize logger");

    let (database_url, project_database_name) = match matches.get_one::<String>("project") {
        Some(project) => match config::load_config_file(project) {
            Ok(p) => (p.database_url, p.database_name),
            Err(e) => {
                error!("Failed to load config file: {}", e);
                std::process::exit(1);
            }
        },
        None => match config::database_url() {
            Ok(url) => (url, None),
            Err(..) => {
                error!("No database url found, please set the DATABASE_URL environment variable");
                std::process::exit(1);
            }
        },
    };

    let result = match matches.subcommand() {
        Some(("create", query_matches)) => {
            match database_name(query_matches, project_database_name) {
                Ok(name) if query_matches.get_flag("if-not-exists") => {
                    dbprov::create_database_if_not_exists(database_url, name).await
                }
                Ok(name) => dbprov::create_database(database_url, name).await,
                Err(err) => Err(err),
            }
        }
        Some(("drop", query_matches)) => match database_name(query_matches, project_database_name) {
            Ok(name) => dbprov::drop_database(database_url, name).await,
            Err(err) => Err(err),
        },
        Some(("recreate", query_matches)) => {
            match database_name(query_matches, project_database_name) {
                Ok(name) => dbprov::drop_and_create_database(database_url, name).await,
                Err(err) => Err(err),
            }
        }
        Some(("exec", query_matches)) => {
            let sql = query_matches
                .get_one::<String>("sql")
                .cloned()
                .unwrap_or_default();
            dbprov::execute_sql_command(database_url, sql).await
        }
        Some(("exec-file", query_matches)) => {
            let path = query_matches
                .get_one::<String>("path")
                .map(PathBuf::from)
                .unwrap_or_default();
            dbprov::execute_sql_file(database_url, path).await
        }
        _ => unreachable!(), // If all subcommands are defined above, anything else is unreachable
    };

    match result {
        Err(err) => {
            error!("{:?}", err);
            std::process::exit(1);
        }
        Ok(_) => info!("Success"),
    }
}
