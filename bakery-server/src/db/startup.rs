//! Startup database check
//!
//! Production keeps serving `/` and `/api/health` while the database is
//! down, so its check runs in the background after the listener is up.
//! Elsewhere a failed check stops startup.

use sqlx::MySqlPool;

use super::pool::{connect, wait_for_database, ConnectionInfo};
use super::repos::MySqlOrderStore;
use super::schema;
use crate::config::{DatabaseConfig, Environment};

/// What to do when the startup check cannot reach the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPolicy {
    /// Check before serving; failure is returned to the caller
    Require,
    /// Check in a background task; failure is logged
    Tolerate,
}

impl StartupPolicy {
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            Self::Tolerate
        } else {
            Self::Require
        }
    }
}

/// Retry the connection check, giving up after `connect_timeout` overall.
pub async fn startup_check(
    pool: &MySqlPool,
    config: &DatabaseConfig,
) -> Result<ConnectionInfo, sqlx::Error> {
    let retries = wait_for_database(pool, config.connect_retries, config.retry_delay);
    match tokio::time::timeout(config.connect_timeout, retries).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(timeout = ?config.connect_timeout, "Database startup check timed out");
            Err(sqlx::Error::PoolTimedOut)
        }
    }
}

async fn prepare(pool: &MySqlPool, config: &DatabaseConfig, init_db: bool) -> Result<(), sqlx::Error> {
    startup_check(pool, config).await?;
    if init_db {
        let inserted = schema::initialize(pool).await?;
        tracing::info!(inserted, "Database initialized");
    }
    Ok(())
}

/// Build the MySQL store, checking (and optionally initializing) the database.
///
/// Under `Tolerate` this returns immediately; the pool reconnects on demand
/// once the database comes up.
pub async fn open_store(
    config: &DatabaseConfig,
    policy: StartupPolicy,
    init_db: bool,
) -> Result<MySqlOrderStore, sqlx::Error> {
    let pool = connect(config);

    match policy {
        StartupPolicy::Require => prepare(&pool, config, init_db).await?,
        StartupPolicy::Tolerate => {
            let pool = pool.clone();
            let config = config.clone();
            tokio::spawn(async move {
                if let Err(err) = prepare(&pool, &config, init_db).await {
                    tracing::warn!(
                        error = %err,
                        "Serving without a database connection; requests will reconnect on demand"
                    );
                }
            });
        }
    }

    Ok(MySqlOrderStore::new(pool))
}
