//! HTTP server command
//!
//! Loads configuration from the environment, checks the database, and runs
//! the API until Ctrl+C or SIGTERM. In production the database check runs
//! in the background so the listener comes up at once.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use bakery_server::db::{open_store, MemoryOrderStore, MySqlOrderStore, OrderStore, StartupPolicy};
use bakery_server::http::{run_server, ServerConfig};
use bakery_server::DatabaseConfig;

use super::CONNECTION_HINTS;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT")]
    pub port: Option<u16>,

    /// Create the orders table and seed rows before serving
    #[arg(long)]
    pub init_db: bool,

    /// Serve from an in-memory store with the demo orders (no MySQL)
    #[arg(long, conflicts_with = "init_db")]
    pub in_memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::from_env().context("Invalid server configuration")?;
    let port = args.port.unwrap_or(config.bind_addr.port());
    config.bind_addr = SocketAddr::new(args.host, port);

    let store: Arc<dyn OrderStore> = if args.in_memory {
        tracing::warn!("Using in-memory order store, data is lost on exit");
        Arc::new(MemoryOrderStore::with_seed_data())
    } else {
        Arc::new(open_mysql_store(&config, args.init_db).await?)
    };

    run_server(store, config).await.context("Server error")?;

    Ok(())
}

async fn open_mysql_store(config: &ServerConfig, init_db: bool) -> Result<MySqlOrderStore> {
    let db_config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    let policy = StartupPolicy::for_environment(config.environment);

    match open_store(&db_config, policy, init_db).await {
        Ok(store) => Ok(store),
        Err(err) => {
            eprintln!("{}", CONNECTION_HINTS);
            Err(err).context("Database connection failed")
        }
    }
}
