mod action;

use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::info;
use serde_json::Value;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use tablestate_lib::location::LocationPort;
use tablestate_lib::location::MemoryLocation;
use tablestate_lib::model::ColumnConfig;
use tablestate_lib::model::Direction;
use tablestate_lib::source::ArrayProvider;
use tablestate_lib::source::match_and_sort;
use tablestate_lib::{ControllerConfig, TableController};

use crate::action::Action;

type RowProvider = ArrayProvider<Value, fn(&[Value], &Value) -> Vec<Value>>;

/// Replays table interactions against a JSON row file and prints the
/// resulting query variables, address and page after each step.
#[derive(Debug, Parser)]
#[command(name = "tablestate", version)]
struct Args {
    /// JSON array of row objects
    #[arg(long, value_name = "PATH")]
    rows: PathBuf,

    /// JSON array of column configurations
    #[arg(long, value_name = "PATH")]
    columns: PathBuf,

    /// Address to restore filters and sort from
    #[arg(long, default_value = "https://localhost/table")]
    url: String,

    /// Initial rows per page
    #[arg(long = "rows-per-page", default_value_t = 10)]
    rows_per_page: usize,

    /// Sort key used when the address has none
    #[arg(long = "sort", value_name = "KEY")]
    sort: Option<String>,

    /// Direction used when the address has none (ASC or DESC)
    #[arg(long = "direction", default_value = "DESC")]
    direction: Direction,

    /// Hide pagination when fewer rows than this match
    #[arg(long = "disable-pagination-under", default_value_t = 0, value_name = "N")]
    disable_pagination_under: usize,

    /// Poll interval reported to the scheduler, in seconds
    #[arg(long = "poll-secs", default_value_t = 0)]
    poll_secs: u64,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,

    /// Actions to replay, e.g. `filter:Team=red`, `sort:name`, `next`
    #[arg(value_name = "ACTION")]
    actions: Vec<Action>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to create log file: {0}")]
    LogFile(std::io::Error),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Table(#[from] tablestate_lib::error::Error),
}

fn init_logger(args: &Args) -> Result<(), CliError> {
    match &args.log_file {
        Some(path) => {
            let file = File::create(path).map_err(CliError::LogFile)?;
            WriteLogger::init(args.log_level, Config::default(), file)?;
        }
        None => TermLogger::init(
            args.log_level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?,
    }
    Ok(())
}

async fn load<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

async fn print_page(
    table: &mut TableController,
    provider: &RowProvider,
    location: &MemoryLocation,
) -> Result<(), CliError> {
    let variables = table.current_variables();
    let connection = table.fetch(provider).await?;
    let view = table.pagination();

    println!("  variables: {}", variables);
    println!("  url:       {}", location.current());
    if !table.filters().is_empty() {
        let pills: Vec<String> = table
            .filters()
            .pills()
            .map(|p| format!("[{}: {}]", p.pill_label, p.pill_value))
            .collect();
        println!("  filters:   {}", pills.join(" "));
    }
    if let Some(label) = table.selection().label() {
        println!("  selected:  {} {:?}", label, table.selection().ids());
    }
    if view.visible {
        println!(
            "  page:      {}{}",
            view.label(),
            if view.can_go_next { " (more)" } else { "" }
        );
    }
    if connection.is_empty() {
        println!("  {}", table.empty_message());
    }
    for row in &connection.rows {
        println!("    {}", row);
    }
    Ok(())
}

async fn run(args: Args) -> Result<(), CliError> {
    let rows: Vec<Value> = load(&args.rows).await?;
    let columns: Vec<ColumnConfig> = load(&args.columns).await?;
    info!("loaded {} rows and {} columns", rows.len(), columns.len());

    let mut config = ControllerConfig::new()
        .with_rows_per_page(args.rows_per_page)
        .with_disable_pagination_under(args.disable_pagination_under)
        .with_poll_interval(Duration::from_secs(args.poll_secs))
        .with_no_data_text("No rows.");
    match &args.sort {
        Some(sort) => config = config.with_default_sort(sort.clone(), args.direction),
        None => config.default_sort_direction = args.direction,
    }

    let location = MemoryLocation::new(args.url.clone());
    let mut table = TableController::new(config, columns, location.clone())?;
    let provider: RowProvider = ArrayProvider::new(rows, match_and_sort);
    info!("poll interval: {:?}", table.poll_interval());

    println!("> initial");
    print_page(&mut table, &provider, &location).await?;

    for action in &args.actions {
        println!("> {}", action);
        if let Err(e) = action.apply(&mut table) {
            println!("  rejected: {}", e);
        }
        print_page(&mut table, &provider, &location).await?;
    }

    Ok(())
}

/// Prints a fatal error and returns the process exit status for it.
fn exit_status(e: &CliError) -> i32 {
    eprintln!("Error: {}", e);
    1
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = init_logger(&args) {
        std::process::exit(exit_status(&e));
    }

    if let Err(e) = run(args).await {
        log::error!("{}", e);
        std::process::exit(exit_status(&e));
    }
}
