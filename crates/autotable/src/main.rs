//! autotable CLI - import JSON into SQL tables without declaring a schema
//!
//! Usage:
//!   autotable import -t <table> [--data key:value ...] [-f data.json]
//!   autotable query [-q <sql> | -f query.sql]
//!   autotable tables
//!   autotable columns -t <table>
//!   autotable info
//!
//! Examples:
//!   cat users.jsonl | autotable import -t users
//!   autotable import -p warehouse -t users --data name:Alice age:30
//!   autotable query -q "SELECT * FROM users" -P

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use autotable_core::{DEFAULT_PROFILE, default_config_path, load_profile};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::catalog::{ColumnsArgs, handle_columns, handle_tables};
use commands::import::{ImportArgs, handle_import};
use commands::info::handle_info;
use commands::query::{QueryArgs, handle_query};
use error::CliError;

#[derive(Parser)]
#[command(name = "autotable")]
#[command(about = "Import JSON and JSONL into SQL tables, creating and extending the schema as needed")]
#[command(version)]
struct Cli {
    /// Profiles file (default: ./.autotable.yml, then ~/.autotable.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Connection profile name
    #[arg(short = 'p', long, global = true, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Pretty-print JSON output
    #[arg(short = 'P', long, global = true)]
    pretty: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run SQL and print the rows as JSON
    Query {
        /// SQL to run
        #[arg(short, long, conflicts_with = "file")]
        query: Option<String>,

        /// File containing the SQL
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List tables
    Tables,

    /// Show the columns of a table
    Columns {
        /// Table to inspect
        #[arg(short, long)]
        table: String,
    },

    /// Import records, creating the table and missing columns
    Import {
        /// Target table
        #[arg(short, long)]
        table: String,

        /// One record as key:value pairs
        #[arg(long, num_args = 1.., value_name = "KEY:VALUE")]
        data: Vec<String>,

        /// JSON or JSONL file (reads stdin when omitted)
        #[arg(short, long, conflicts_with = "data")]
        file: Option<PathBuf>,

        /// Rows per bulk insert
        #[arg(long)]
        batch_size: Option<usize>,

        /// Infer a new table from every record instead of the first
        #[arg(long)]
        infer_all: bool,

        /// VARCHAR length for new string columns
        #[arg(long)]
        string_limit: Option<u32>,
    },

    /// Show the active configuration
    Info,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config.unwrap_or_else(default_config_path);
    let profile = load_profile(&config, &cli.profile)?;
    debug!(
        config = %config.display(),
        profile = %cli.profile,
        adapter = profile.adapter_name(),
        "Resolved connection profile"
    );

    match cli.command {
        Commands::Query { query, file } => {
            handle_query(&profile, &QueryArgs { query, file }, cli.pretty)
        }
        Commands::Tables => handle_tables(&profile, cli.pretty),
        Commands::Columns { table } => handle_columns(&profile, &ColumnsArgs { table }, cli.pretty),
        Commands::Import {
            table,
            data,
            file,
            batch_size,
            infer_all,
            string_limit,
        } => handle_import(
            &profile,
            &ImportArgs {
                table,
                data,
                file,
                batch_size,
                infer_all,
                string_limit,
            },
            cli.pretty,
        ),
        Commands::Info => handle_info(&config, &cli.profile, &profile, cli.pretty),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
