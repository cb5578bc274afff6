//! Database access layer for footprint-server
//!
//! SQLite stands in for the hosted relational store: two tables, `couples`
//! and `restaurants`, both keyed by couple code.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use footprint_common::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

pub mod couples;
pub mod locations;
pub mod store;

pub use store::{RecordStore, SqliteStore};

/// Open (creating if needed) the database file and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema
///
/// Every pooled connection to `sqlite::memory:` is a separate database, so the
/// pool is pinned to one connection that never expires.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_couples_table(pool).await?;
    create_restaurants_table(pool).await?;
    Ok(())
}

async fn create_couples_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS couples (
            couple_code TEXT PRIMARY KEY,
            anniversary_date TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_restaurants_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS restaurants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            couple_code TEXT NOT NULL REFERENCES couples(couple_code),
            name TEXT NOT NULL,
            address TEXT NOT NULL DEFAULT '',
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            type TEXT NOT NULL DEFAULT 'etc',
            rating INTEGER NOT NULL DEFAULT 0 CHECK (rating BETWEEN 0 AND 5),
            visit_date TEXT,
            visit_time TEXT,
            memo TEXT,
            photos TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_restaurants_couple_created \
         ON restaurants (couple_code, created_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
