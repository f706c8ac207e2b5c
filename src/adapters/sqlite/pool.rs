use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Embedded migrations from `./migrations`
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors raised while opening the SQLite database
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Invalid database url: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    #[error("Failed to create database directory")]
    CreateDirectory(#[source] std::io::Error),

    #[error("Connection failed")]
    ConnectionFailed(#[source] sqlx::Error),

    #[error("Migration failed")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),
}

/// SQLite connection settings
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// e.g. `sqlite://db/library.db` or `sqlite::memory:`
    pub database_url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 5,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Isolated in-memory database for tests
    ///
    /// Each connection to `:memory:` opens a separate database, so the pool is
    /// limited to a single connection.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

/// Open the pool and apply pending migrations
///
/// The database file (and its parent directory) is created if missing.
pub async fn connect(config: &DbConfig) -> Result<SqlitePool, DbError> {
    info!(url = %config.database_url, "Opening SQLite database");

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(DbError::InvalidUrl)?
        .create_if_missing(true);

    if !config.is_in_memory() {
        if let Some(dir) = options.get_filename().parent() {
            std::fs::create_dir_all(dir).map_err(DbError::CreateDirectory)?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect_with(options)
        .await
        .map_err(DbError::ConnectionFailed)?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Apply all pending migrations (idempotent)
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    MIGRATOR.run(pool).await.map_err(DbError::MigrationFailed)?;
    info!("Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_config_uses_single_connection() {
        let config = DbConfig::in_memory();
        assert_eq!(config.max_connections, 1);
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_file_config_is_not_in_memory() {
        let config = DbConfig::new("sqlite://db/library.db").max_connections(2);
        assert_eq!(config.max_connections, 2);
        assert!(!config.is_in_memory());
    }

    #[tokio::test]
    async fn test_connect_in_memory_runs_migrations() {
        let pool = connect(&DbConfig::in_memory()).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('books', 'members', 'loans') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec!["books", "loans", "members"]);
    }
}
