//! bakery CLI - run and administer the Bakery Orders API
//!
//! - `serve` starts the HTTP server (MySQL or in-memory store)
//! - `init-db` creates the `orders` table and seed rows
//! - `check-db` runs the connection diagnostics

use anyhow::Result;
use bakery_server::Environment;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "bakery",
    author,
    version,
    about = "REST API for bakery orders backed by MySQL"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),

    /// Create the orders table and insert the demo orders
    InitDb,

    /// Check database connectivity and print the connection details
    CheckDb(commands::db::CheckDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        environment: Environment::from_env(),
    })
    .ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitDb => commands::run_init_db().await?,
        Commands::CheckDb(args) => commands::run_check_db(args).await?,
    }

    Ok(())
}
