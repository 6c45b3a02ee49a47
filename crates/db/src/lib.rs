use std::{str::FromStr, time::Duration};

use sqlx::{
    Error, Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use utils::assets::db_path;

pub mod models;

/// Process-wide connection provider. The pool lazily establishes
/// connections, health-checks them on reuse, and replaces ones the
/// database has dropped.
#[derive(Clone)]
pub struct DBService {
    pub pool: Pool<Sqlite>,
}

impl DBService {
    fn pool_options() -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(20)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(300))
            .acquire_timeout(Duration::from_secs(30))
    }

    fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, Error> {
        Ok(SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30))
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true))
    }

    /// Connects using `DATABASE_URL`, falling back to a SQLite file in the
    /// platform data directory.
    pub async fn new() -> Result<DBService, Error> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| format!("sqlite://{}", db_path().to_string_lossy()));
        Self::new_with_url(&database_url).await
    }

    pub async fn new_with_url(database_url: &str) -> Result<DBService, Error> {
        let pool = Self::pool_options()
            .connect_with(Self::connect_options(database_url)?)
            .await?;
        Self::bootstrap_schema(&pool).await?;
        Ok(DBService { pool })
    }

    /// In-memory database for tests. Capped to a single connection because
    /// every `:memory:` connection is its own database.
    pub async fn new_in_memory() -> Result<DBService, Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;
        Self::bootstrap_schema(&pool).await?;
        Ok(DBService { pool })
    }

    async fn bootstrap_schema(pool: &Pool<Sqlite>) -> Result<(), Error> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS projects (
                 id   INTEGER PRIMARY KEY AUTOINCREMENT,
                 name TEXT UNIQUE NOT NULL
               )"#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS tasks (
                 id         INTEGER PRIMARY KEY AUTOINCREMENT,
                 project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                 sno        INTEGER NOT NULL,
                 task       TEXT NOT NULL DEFAULT '',
                 comments   TEXT NOT NULL DEFAULT '',
                 status     TEXT NOT NULL DEFAULT 'Pending'
               )"#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Liveness probe: `SELECT 1` through the pool. A connection the
    /// database has dropped is discarded and re-established on acquire.
    pub async fn ensure_live(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
