//! dns-migrator
//!
//! Moves a tinydns `data` file to other DNS back ends:
//! - `bind`: render BIND zone files for the configured zones
//! - `sync`: UPSERT every record into the cloud provider's hosted zones
//! - `show`: list hosted zones and their current record sets
//!
//! Exit status is non-zero only for configuration errors, an unreadable data
//! file, or a failed zone listing. Individual rejected upserts are reported
//! but do not fail the run.

mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::bind::BindArgs;
use commands::sync::SyncArgs;
use config::{CliOverrides, Config};

#[derive(Parser)]
#[command(name = "dns-migrator")]
#[command(version)]
#[command(about = "Migrate a tinydns data file to BIND zone files or a cloud DNS provider")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// tinydns data file
    #[arg(short = 'd', long, value_name = "FILE", global = true)]
    data: Option<PathBuf>,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Shorthand for --log-level debug
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render BIND zone files
    Bind(BindArgs),
    /// Upsert records into the provider's hosted zones
    Sync(SyncArgs),
    /// List hosted zones and their existing record sets
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        data_path: cli.data.clone(),
        log_level: if cli.verbose {
            Some("debug".to_string())
        } else {
            cli.log_level.clone()
        },
    };
    let config = match Config::load(cli.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.logging.level) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Command::Bind(args) => commands::bind::run(config, args),
        Command::Sync(args) => commands::sync::run(config, args).await,
        Command::Show => commands::show::run(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
