//! `venue-admin` command line tool
//!
//! Exports tables to spreadsheets, provisions corporate employees from a
//! spreadsheet and prints dashboard numbers.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};
use venue_cli::{
    CliError, ImportOutcome, Result, config_problems, config_toml, export_table, fetch_kpis,
    import_employees, parse_table, render_import, render_kpis, resolve_format,
};
use venue_core::Config;
use venue_core::config::LoggingConfig;

/// Command line interface for the venue admin console
#[derive(Parser)]
#[command(
    name = "venue-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Command line tools for the venue admin console",
    long_about = "Exports admin tables to xlsx or csv, provisions corporate employees from a spreadsheet and prints dashboard numbers."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Export a table to a spreadsheet
    Export {
        /// Table or admin page name, e.g. `restaurants` or `promo-codes`
        #[arg(value_name = "TABLE")]
        table: String,

        /// Output format (xlsx, csv); defaults to `export.format`
        #[arg(short, long)]
        format: Option<String>,

        /// Only rows matching this search term
        #[arg(short, long)]
        search: Option<String>,

        /// Output file; defaults to a timestamped name in the working directory
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Provision corporate employees from a spreadsheet
    ImportEmployees {
        /// Corporate id
        #[arg(long, value_name = "ID")]
        corporate: String,

        /// Spreadsheet (xlsx, xls or csv)
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        /// Plan for rows that name none
        #[arg(long)]
        plan: Option<String>,

        /// Report what would happen without creating anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print dashboard numbers
    Kpis {
        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Validate or show configuration
    Config {
        /// Show resolved configuration with keys masked
        #[arg(short, long)]
        show: bool,

        /// Report configuration problems
        #[arg(short, long)]
        validate: bool,
    },
}

/// Main entry point for the command line tool
///
/// # Errors
///
/// Returns error if configuration cannot be loaded or the command fails
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let config = Config::load_from(cli.config.as_deref())
        .map_err(|e| CliError::configuration(e.to_string()))?;
    init_logging(&cli, &config.logging)?;

    let result = run(cli.command, &config).await;
    if let Err(e) = &result {
        error!("{e}");
    }
    result
}

fn init_logging(cli: &Cli, logging: &LoggingConfig) -> Result<()> {
    let mut logging = logging.clone();
    if let Some(level) = &cli.log_level {
        logging.level.clone_from(level);
    }
    if cli.json {
        logging.format = "json".to_string();
    }
    venue_core::init_logging(&logging).map_err(|e| CliError::configuration(e.to_string()))
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Export {
            table,
            format,
            search,
            out,
        } => {
            let table = parse_table(&table)?;
            let format = resolve_format(config, format.as_deref())?;
            let summary = export_table(config, table, format, search.as_deref(), out.as_deref()).await?;
            println!("Wrote {} row(s) to {}", summary.rows, summary.path.display());
            Ok(())
        }
        Commands::ImportEmployees {
            corporate,
            file,
            plan,
            dry_run,
        } => {
            let outcome = import_employees(config, &corporate, &file, plan.as_deref(), dry_run).await?;
            print!("{}", render_import(&outcome));
            if matches!(outcome, ImportOutcome::DryRun(_)) {
                println!("\nTo create these accounts, run again without --dry-run");
            }
            Ok(())
        }
        Commands::Kpis { format } => {
            let kpis = fetch_kpis(config).await?;
            if format == "json" {
                let json = serde_json::to_string_pretty(&kpis)
                    .map_err(|e| CliError::configuration(format!("Failed to serialize numbers: {e}")))?;
                println!("{json}");
            } else {
                print!("{}", render_kpis(&kpis));
            }
            Ok(())
        }
        Commands::Config { show, validate } => handle_config_command(config, show, validate),
    }
}

/// Handle configuration commands
///
/// # Errors
///
/// Returns error if configuration cannot be serialized or fails validation
fn handle_config_command(config: &Config, show: bool, validate: bool) -> Result<()> {
    if validate {
        info!("Validating configuration...");
        let problems = config_problems(config);
        for problem in &problems {
            warn!("{problem}");
        }
        if !problems.is_empty() {
            return Err(CliError::configuration(problems.join("; ")));
        }
        info!("Configuration validation completed");
    }

    if show || !validate {
        println!("{}", config_toml(config)?);
    }

    Ok(())
}
