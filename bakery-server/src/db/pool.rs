//! Database connection pool management
//!
//! The pool connects lazily so the HTTP server can start while the database
//! is still coming up; `wait_for_database` is the startup health check.
//!
//! A query waits at most `acquire_timeout` for a connection. sqlx keeps
//! retrying a refused connect until then and reports `PoolTimedOut`, so this
//! must stay below the HTTP request timeout for callers to see a 503.

use std::time::Duration;

use serde::Serialize;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};

use crate::config::{ConnectionMode, DatabaseConfig};

/// Facts reported by a successful connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    /// Result of `SELECT 1 + 1`
    pub probe: i64,
    /// Current schema, if one is selected
    pub database: Option<String>,
    /// Account name without the host part
    pub user: String,
}

/// Create a MySQL pool from configuration.
///
/// Single-connection mode is a pool capped at one connection that is
/// opened eagerly by the first check and kept alive.
pub fn connect(config: &DatabaseConfig) -> MySqlPool {
    let options = MySqlPoolOptions::new()
        .max_connections(config.mode.max_connections())
        .acquire_timeout(config.acquire_timeout);

    let options = match config.mode {
        ConnectionMode::Single => options
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>),
        ConnectionMode::Pooled { .. } => options,
    };

    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        user = %config.masked_user(),
        ssl_mode = ?config.ssl_mode,
        max_connections = config.mode.max_connections(),
        acquire_timeout = ?config.acquire_timeout,
        source = ?config.source,
        "Database pool configured"
    );

    options.connect_lazy_with(config.connect_options())
}

/// Acquire one connection and run the diagnostic queries.
pub async fn check_connection(pool: &MySqlPool) -> Result<ConnectionInfo, sqlx::Error> {
    let mut conn = pool.acquire().await?;

    let probe: i64 = sqlx::query("SELECT 1 + 1 AS result")
        .fetch_one(&mut *conn)
        .await?
        .try_get("result")?;

    let row = sqlx::query("SELECT DATABASE() AS db, USER() AS user")
        .fetch_one(&mut *conn)
        .await?;
    let database: Option<String> = row.try_get("db")?;
    let user: String = row.try_get("user")?;

    Ok(ConnectionInfo {
        probe,
        database,
        user: strip_host(&user).to_owned(),
    })
}

/// Retry `check_connection` up to `attempts` times.
pub async fn wait_for_database(
    pool: &MySqlPool,
    attempts: u32,
    delay: Duration,
) -> Result<ConnectionInfo, sqlx::Error> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match check_connection(pool).await {
            Ok(info) => {
                tracing::info!(
                    probe = info.probe,
                    database = info.database.as_deref().unwrap_or("<none>"),
                    user = %info.user,
                    "Database connected"
                );
                return Ok(info);
            }
            Err(err) if attempt < attempts => {
                tracing::warn!(attempt, attempts, error = %err, "Database check failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::error!(attempts, error = %err, "Database connection failed");
                return Err(err);
            }
        }
    }
}

fn strip_host(account: &str) -> &str {
    account.split('@').next().unwrap_or(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_host_from_account() {
        assert_eq!(strip_host("railway@10.0.0.4"), "railway");
        assert_eq!(strip_host("root"), "root");
    }

    #[tokio::test]
    async fn lazy_pool_does_not_connect() {
        let config = DatabaseConfig {
            port: 1,
            acquire_timeout: Duration::from_millis(200),
            ..DatabaseConfig::default()
        };
        let pool = connect(&config);
        assert_eq!(pool.size(), 0);
    }

    #[tokio::test]
    async fn wait_gives_up_after_attempts() {
        let config = DatabaseConfig {
            host: "127.0.0.1".into(),
            port: 1,
            acquire_timeout: Duration::from_millis(200),
            ..DatabaseConfig::default()
        };
        let pool = connect(&config);
        let result = wait_for_database(&pool, 2, Duration::from_millis(10)).await;
        assert!(result.is_err());
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=mysql://... cargo test -p bakery-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn check_reports_probe_and_user() {
        let config = DatabaseConfig::from_env().expect("config");
        let pool = connect(&config);
        let info = check_connection(&pool).await.expect("check failed");
        assert_eq!(info.probe, 2);
        assert!(!info.user.contains('@'));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_pool_access() {
        let config = DatabaseConfig::from_env().expect("config");
        let pool = connect(&config);

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let row = sqlx::query("SELECT ? AS n")
                        .bind(i as i64)
                        .fetch_one(&pool)
                        .await
                        .expect("concurrent query failed");
                    row.get::<i64, _>("n")
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.expect("task panicked"), i as i64);
        }
    }
}
