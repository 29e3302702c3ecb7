//! Database maintenance commands

use anyhow::{Context, Result};
use clap::Parser;

use bakery_server::db::{connect, schema, startup_check};
use bakery_server::DatabaseConfig;

use super::CONNECTION_HINTS;

/// Arguments for the check-db command
#[derive(Parser, Debug)]
pub struct CheckDbArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create the `orders` table and insert any missing seed rows.
pub async fn run_init_db() -> Result<()> {
    let config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    let pool = connect(&config);

    if let Err(err) = startup_check(&pool, &config).await {
        eprintln!("{}", CONNECTION_HINTS);
        return Err(err).context("Database connection failed");
    }

    let inserted = schema::initialize(&pool)
        .await
        .context("Failed to initialize database")?;
    println!("orders table ready ({} seed rows inserted)", inserted);

    pool.close().await;
    Ok(())
}

/// Run the connection diagnostics and report what the server would see.
pub async fn run_check_db(args: CheckDbArgs) -> Result<()> {
    let config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    let pool = connect(&config);

    let info = match startup_check(&pool, &config).await {
        Ok(info) => info,
        Err(err) => {
            eprintln!("{}", CONNECTION_HINTS);
            return Err(err).context("Database connection failed");
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("host:     {}:{}", config.host, config.port);
        println!("database: {}", info.database.as_deref().unwrap_or("<none>"));
        println!("user:     {}", info.user);
        println!("probe:    SELECT 1 + 1 = {}", info.probe);
    }

    pool.close().await;
    Ok(())
}
