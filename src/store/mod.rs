//! Relational store for bakeries and their baked goods.
//!
//! The store is a `SQLite` database accessed through `sqlx`. Repository
//! functions live in [`bakeries`] and [`baked_goods`]; every function takes a
//! `&mut SqliteConnection` so callers decide whether it runs on a pooled
//! connection or inside a transaction they own (commit/rollback stays with the
//! handler). Relationships are never loaded implicitly: callers ask for
//! [`models::BakeryWithGoods`] or [`models::BakedGoodWithBakery`] explicitly.
//!
//! Schema changes are applied from the embedded `migrations/` directory on
//! startup; constraint names follow [`naming`].

pub mod baked_goods;
pub mod bakeries;
pub mod models;
pub mod naming;

use anyhow::{Context, Result};
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};
use std::{str::FromStr, time::Duration};
use tracing::{info, instrument};

pub use models::{BakedGood, BakedGoodWithBakery, Bakery, BakeryWithGoods};

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connect to the database at `dsn` and bring the schema up to date.
///
/// The database file is created when missing and foreign key enforcement is
/// switched on for every connection, which is what makes the cascade from
/// `bakeries` to `baked_goods` effective.
///
/// # Errors
/// Returns an error if the DSN is invalid, the database can't be opened or a
/// migration fails.
#[instrument(skip(dsn))]
pub async fn connect(dsn: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(dsn)
        .context("Invalid database connection string")?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(max_connections.max(1))
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    migrate(&pool).await?;

    Ok(pool)
}

/// Apply any pending migrations.
///
/// # Errors
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to apply database migrations")?;

    info!("Database schema is up to date");

    Ok(())
}

/// Single-connection in-memory database with the schema applied.
///
/// An in-memory `SQLite` database lives and dies with its connection, so the
/// pool is pinned to exactly one connection that never expires.
#[cfg(test)]
pub(crate) async fn memory_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open in-memory database")?;
    migrate(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn migrations_create_both_tables() -> Result<()> {
        let pool = memory_pool().await?;
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await?;
        let names: Vec<String> = rows.iter().map(|row| row.get("name")).collect();
        assert_eq!(names, vec!["baked_goods", "bakeries"]);
        Ok(())
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() -> Result<()> {
        let pool = memory_pool().await?;
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await?;
        assert_eq!(enabled, 1);
        Ok(())
    }
}
