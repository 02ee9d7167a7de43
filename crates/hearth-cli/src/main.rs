//! hearth CLI
//!
//! The command-line interface for keeping directories in sync across devices.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::sync::SyncArgs;
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.central).await,
        None => {
            println!("{} directory sync", "hearth".green().bold());
            println!();
            println!("Run {} for available commands.", "hearth --help".cyan());
            Ok(())
        }
    }
}

/// `RUST_LOG` when set, `warn` otherwise; `--verbose` forces `debug`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("Verbose mode enabled");
}

/// A token cancelled on the first Ctrl-C.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling scans");
            on_signal.cancel();
        }
    });
    token
}

async fn execute_command(cmd: Commands, central: Option<std::path::PathBuf>) -> Result<()> {
    match cmd {
        Commands::Init => commands::run_init(&commands::central_path(central)?),
        Commands::List { devices } => {
            commands::run_list(&commands::central_path(central)?, devices)
        }
        Commands::Track {
            name,
            primary,
            sources,
            description,
        } => commands::run_track(
            &commands::central_path(central)?,
            &name,
            primary,
            sources,
            &description,
        ),
        Commands::Compare {
            first,
            second,
            name,
            json,
        } => commands::run_compare(first, second, name, json, &interrupt_token()).await,
        Commands::Sync {
            locations,
            hearth,
            strategy,
            no_commit,
            json,
            name,
        } => {
            let args = SyncArgs {
                locations,
                hearth,
                strategy,
                no_commit,
                json,
                name,
            };
            commands::run_sync(central, args, &interrupt_token()).await
        }
    }
}
