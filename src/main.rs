// ABOUTME: Entry point for the automation-kit command line
// ABOUTME: Parses arguments, runs one helper command and prints its JSON envelope

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use automation_kit::commands;
use automation_kit::config::{AppConfig, ConnectionProfile};
use automation_kit::ApiResponse;

#[derive(Parser, Debug)]
#[command(name = "automation-kit", version, about = "Helpers for test automation scripts")]
struct Cli {
    /// Config file (defaults to the per-user config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a duration such as 2d5h10m30s into milliseconds
    Duration { value: String },
    /// Sleep for a duration such as 1m30s
    Wait { value: String },
    /// Today's date
    Today {
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Current timestamp
    Timestamp {
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Random alphanumeric string
    RandomString {
        #[arg(short, long)]
        length: Option<usize>,
    },
    /// Random string of digits
    RandomInteger {
        #[arg(short, long)]
        length: Option<usize>,
    },
    /// Random v4 UUID
    Uuid,
    /// Database helpers against a configured profile
    Db {
        /// Profile key (defaults to the active profile)
        #[arg(short, long, global = true)]
        profile: Option<String>,
        #[command(subcommand)]
        action: DbAction,
    },
    /// File helpers
    File {
        #[command(subcommand)]
        action: FileAction,
    },
    /// Directory helpers
    Dir {
        #[command(subcommand)]
        action: DirAction,
    },
    /// Show the loaded configuration
    Config,
}

#[derive(Subcommand, Debug)]
enum DbAction {
    /// Run a query and print its rows
    Query { sql: String },
    /// Execute a statement and print the affected row count
    Exec {
        sql: String,
        /// Bound parameters, JSON literals or plain text
        params: Vec<String>,
    },
    /// First column of the first row
    Scalar { sql: String, params: Vec<String> },
    /// List tables
    Tables,
    /// Check whether a table exists
    Exists { table: String },
    /// Count rows of a table or SELECT query
    Count { table_or_query: String },
}

#[derive(Subcommand, Debug)]
enum FileAction {
    Read { path: PathBuf },
    Lines { path: PathBuf },
    Write {
        path: PathBuf,
        content: String,
        #[arg(short, long)]
        append: bool,
    },
    Exists { path: PathBuf },
    Size { path: PathBuf },
    Delete { path: PathBuf },
    Csv {
        path: PathBuf,
        /// The first row is data; columns are named Column0, Column1, ...
        #[arg(long)]
        no_headers: bool,
    },
}

#[derive(Subcommand, Debug)]
enum DirAction {
    /// Files matching a glob pattern
    List {
        path: PathBuf,
        #[arg(default_value = "*")]
        pattern: String,
    },
    Exists { path: PathBuf },
    Create { path: PathBuf },
    /// Working directory name and path
    Root,
    Absolute { path: PathBuf },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(p) => AppConfig::load_from(p),
        None => AppConfig::load(),
    };
    config.context("Failed to load config")
}

fn select_profile(config: &AppConfig, key: Option<&str>) -> anyhow::Result<ConnectionProfile> {
    let profile = match key {
        Some(k) => config.profile(k)?,
        None => config.active_profile()?,
    };
    Ok(profile.clone())
}

/// Print the envelope; returns whether the command succeeded
fn emit<T: Serialize>(response: ApiResponse<T>) -> anyhow::Result<bool> {
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response.success)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ok = match cli.command {
        Command::Duration { value } => emit(commands::parse_duration(&value))?,
        Command::Wait { value } => emit(commands::wait(&value).await)?,
        Command::Today { format } => {
            let config = load_config(cli.config.as_ref())?;
            let format = format.unwrap_or(config.preferences.date_format);
            emit(commands::today(&format))?
        }
        Command::Timestamp { format } => {
            let config = load_config(cli.config.as_ref())?;
            let format = format.unwrap_or(config.preferences.timestamp_format);
            emit(commands::timestamp(&format))?
        }
        Command::RandomString { length } => {
            let config = load_config(cli.config.as_ref())?;
            emit(commands::random_string(
                length.unwrap_or(config.preferences.random_length),
            ))?
        }
        Command::RandomInteger { length } => {
            let config = load_config(cli.config.as_ref())?;
            emit(commands::random_integer(
                length.unwrap_or(config.preferences.random_length),
            ))?
        }
        Command::Uuid => emit(commands::uuid())?,
        Command::Db { profile, action } => {
            let config = load_config(cli.config.as_ref())?;
            let profile = select_profile(&config, profile.as_deref())?;
            run_db(&profile, action).await?
        }
        Command::File { action } => run_file(action)?,
        Command::Dir { action } => run_dir(action)?,
        Command::Config => {
            let config = load_config(cli.config.as_ref())?;
            emit(ApiResponse::success(config.redacted()))?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_db(profile: &ConnectionProfile, action: DbAction) -> anyhow::Result<bool> {
    let bind = |params: &[String]| -> Vec<_> {
        params.iter().map(|p| commands::parse_param(p)).collect()
    };

    match action {
        DbAction::Query { sql } => emit(commands::query(profile, &sql).await),
        DbAction::Exec { sql, params } => {
            emit(commands::execute(profile, &sql, &bind(&params)).await)
        }
        DbAction::Scalar { sql, params } => {
            emit(commands::scalar(profile, &sql, &bind(&params)).await)
        }
        DbAction::Tables => emit(commands::tables(profile).await),
        DbAction::Exists { table } => emit(commands::table_exists(profile, &table).await),
        DbAction::Count { table_or_query } => {
            emit(commands::row_count(profile, &table_or_query).await)
        }
    }
}

fn run_file(action: FileAction) -> anyhow::Result<bool> {
    match action {
        FileAction::Read { path } => emit(commands::read_file(&path)),
        FileAction::Lines { path } => emit(commands::read_lines(&path)),
        FileAction::Write {
            path,
            content,
            append,
        } => emit(commands::write_file(&path, &content, append)),
        FileAction::Exists { path } => emit(commands::file_exists(&path)),
        FileAction::Size { path } => emit(commands::file_size(&path)),
        FileAction::Delete { path } => emit(commands::delete_file(&path)),
        FileAction::Csv { path, no_headers } => {
            emit(commands::load_csv(&path, !no_headers))
        }
    }
}

fn run_dir(action: DirAction) -> anyhow::Result<bool> {
    match action {
        DirAction::List { path, pattern } => emit(commands::list_files(&path, &pattern)),
        DirAction::Exists { path } => emit(commands::directory_exists(&path)),
        DirAction::Create { path } => emit(commands::create_directory(&path)),
        DirAction::Root => emit(commands::root_folder()),
        DirAction::Absolute { path } => emit(commands::absolute_path(&path)),
    }
}
