use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{init_logging, load_config, LogLevel};
use core_types::{Parcel, ParcelStatus};
use database::{connect, ParcelStore};

use crate::error::AppError;
use crate::service::{Outcome, ParcelService};

mod error;
mod service;

/// The main entry point for the parcel tracker.
#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let not_found = e
                .downcast_ref::<AppError>()
                .is_some_and(AppError::is_not_found);
            if not_found {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Track parcels from registration to delivery.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./tracker.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log level.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new parcel for a client.
    Register {
        #[arg(long)]
        client: i64,
        #[arg(long)]
        address: String,
    },
    /// Show a single parcel.
    Show {
        number: i64,
        /// Print the parcel as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List all parcels of a client.
    List {
        #[arg(long)]
        client: i64,
        /// Print the parcels as a JSON array.
        #[arg(long)]
        json: bool,
    },
    /// Move a parcel to the next delivery status (registered -> sent -> delivered).
    Advance { number: i64 },
    /// Overwrite the status of a parcel with any value.
    SetStatus { number: i64, status: String },
    /// Change the address of a parcel that is still registered.
    SetAddress { number: i64, address: String },
    /// Delete a parcel that is still registered.
    Delete { number: i64 },
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    // Keeps the file writer flushing until the process exits.
    let _log_guard = init_logging(&config.logging)?;

    let pool = connect(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;
    let service = ParcelService::new(ParcelStore::new(pool));

    match cli.command {
        Commands::Register { client, address } => {
            let parcel = service.register(client, &address).await?;
            println!("Registered parcel {}", parcel.number);
        }
        Commands::Show { number, json } => {
            let parcel = service.show(number).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parcel)?);
            } else {
                println!("{}", parcel_table(std::slice::from_ref(&parcel)));
            }
        }
        Commands::List { client, json } => {
            let parcels = service.client_parcels(client).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parcels)?);
            } else if parcels.is_empty() {
                println!("Client {client} has no parcels.");
            } else {
                println!("{}", parcel_table(&parcels));
            }
        }
        Commands::Advance { number } => {
            let parcel = service.advance(number).await?;
            println!("Parcel {} is now {}", parcel.number, parcel.status);
        }
        Commands::SetStatus { number, status } => {
            let parcel = service.set_status(number, ParcelStatus::from(status)).await?;
            println!("Parcel {} is now {}", parcel.number, parcel.status);
        }
        Commands::SetAddress { number, address } => {
            match service.change_address(number, &address).await? {
                Outcome::Applied => println!("Parcel {number} will be delivered to {address}"),
                Outcome::Blocked(status) => {
                    println!("Parcel {number} is {status}; its address can no longer change.")
                }
            }
        }
        Commands::Delete { number } => match service.delete(number).await? {
            Outcome::Applied => println!("Parcel {number} deleted"),
            Outcome::Blocked(status) => {
                println!("Parcel {number} is {status}; only registered parcels can be deleted.")
            }
        },
    }

    Ok(())
}

fn parcel_table(parcels: &[Parcel]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Number", "Client", "Status", "Address", "Created at"]);
    for parcel in parcels {
        table.add_row(vec![
            parcel.number.to_string(),
            parcel.client.to_string(),
            parcel.status.to_string(),
            parcel.address.clone(),
            parcel.created_at.clone(),
        ]);
    }
    table
}
