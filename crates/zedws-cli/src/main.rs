//! zedws CLI
//!
//! Host-facing entry point for launcher integrations. Every invocation is one
//! request: run a query, list workspaces, or act on a payload a previous query
//! produced. stdout carries results only; logs go to stderr and optionally to
//! a file.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use zedws_core::WorkspaceSearch;
use zedws_core::config::{Config, Directories};
use zedws_types::{LaunchTarget, QueryResponse};

const LOG_ENV: &str = "ZEDWS_LOG";
const LOG_FILE_NAME: &str = "zedws.log";

/// Search and reopen Zed workspaces
#[derive(Parser)]
#[command(name = "zedws")]
#[command(version, about)]
#[command(after_help = "\
Examples:
  zedws query proj              Rank workspaces against \"proj\"
  zedws query --json proj       Same, as JSON for a launcher host
  zedws list                    All workspaces, most recent first
  zedws open '{\"kind\":\"wsl\",\"distro\":\"Ubuntu\",\"path\":\"/home/u/app\"}'
  zedws store-path              Show which db.sqlite would be read

Logging: set ZEDWS_LOG (or RUST_LOG), e.g. ZEDWS_LOG=zedws_core=debug
")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Zed database to read, overriding discovery and config
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Also log to a file (defaults to the platform log dir when no path is given)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank workspaces against a query
    Query {
        /// Print the full response as JSON
        #[arg(long)]
        json: bool,

        /// Query words, joined with single spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// List every workspace, most recently used first
    List {
        #[arg(long)]
        json: bool,
    },

    /// Print the command a launch payload resolves to
    Command {
        /// `action` payload from a result item, as JSON
        payload: String,
    },

    /// Reopen the workspace a launch payload points at
    Open {
        /// `action` payload from a result item, as JSON
        payload: String,
    },

    /// Print the resolved path of Zed's database
    #[command(name = "store-path")]
    StorePath,

    /// Write a config file with every default filled in
    #[command(name = "init-config")]
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Generic over the subscriber so it can sit atop either registry stack below.
fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer().with_writer(std::io::stderr).with_target(true)
}

/// Logs go to stderr, plus a file when requested. The returned guard must live
/// until exit so buffered file output is flushed.
fn setup_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if log_file.is_some() { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(stderr_layer())
            .with(filter)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer())
        .with(filter)
        .init();

    Ok(Some(guard))
}

fn config_path(cli: &Cli, dirs: Option<&Directories>) -> Option<PathBuf> {
    cli.config
        .clone()
        .or_else(|| dirs.map(|d| d.config_file.clone()))
}

/// Load config, apply `--db`. A missing config file means defaults.
fn load_config(cli: &Cli, dirs: Option<&Directories>) -> Result<Config> {
    let mut config = match config_path(cli, dirs) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            warn!("No config directory available, using defaults");
            Config::default()
        }
    };

    if let Some(db) = &cli.db {
        config.store.db_path = Some(db.clone());
    }
    Ok(config)
}

fn parse_payload(payload: &str) -> Result<LaunchTarget> {
    serde_json::from_str(payload).with_context(|| format!("Invalid launch payload: {payload}"))
}

fn print_response(response: &QueryResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(response)?);
        return Ok(());
    }

    if let Some(diagnostic) = &response.diagnostic {
        eprintln!("{diagnostic}");
    }
    for item in &response.items {
        println!("{}\t{}", item.title, item.subtitle);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dirs = Directories::new().ok();
    let log_file = match &cli.log_file {
        Some(Some(path)) => Some(path.clone()),
        Some(None) => Some(
            dirs.as_ref()
                .map(|d| d.logs.join(LOG_FILE_NAME))
                .context("No log directory available; pass --log-file <PATH>")?,
        ),
        None => None,
    };
    let _log_guard = setup_logging(log_file.as_deref())?;

    let config = load_config(&cli, dirs.as_ref())?;
    debug!("Loaded config: {config:?}");

    match &cli.command {
        Commands::Query { json, query } => {
            let query = query.join(" ");
            let response = WorkspaceSearch::new(config).query(&query);
            print_response(&response, *json)?;
        }

        Commands::List { json } => {
            let mut config = config;
            config.search.max_results = 0;
            let response = WorkspaceSearch::new(config).query("");
            print_response(&response, *json)?;
        }

        Commands::Command { payload } => {
            let target = parse_payload(payload)?;
            println!("{}", config.launch.command_for(&target));
        }

        Commands::Open { payload } => {
            let target = parse_payload(payload)?;
            let command = config.launch.command_for(&target);
            info!("Opening {}: {command}", target.path());

            Command::new(&command.program)
                .args(&command.args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .with_context(|| {
                    format!("Failed to start {}. Is it installed?", command.program)
                })?;
        }

        Commands::StorePath => {
            let search = WorkspaceSearch::new(config);
            let Some(path) = search.store_path() else {
                bail!("Could not determine Zed's data directory");
            };
            println!("{}", path.display());
            if !path.is_file() {
                eprintln!("(file does not exist)");
            }
        }

        Commands::InitConfig { force } => {
            let Some(path) = config_path(&cli, dirs.as_ref()) else {
                bail!("No config directory available; pass --config <PATH>");
            };
            if path.exists() && !*force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            config.save(&path)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
