use crate::store::{self, baked_goods, bakeries};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub dsn: SecretString,
}

/// Print the tables in the database and how many rows each entity table holds.
/// # Errors
/// Returns an error if the database can't be opened or queried.
pub async fn execute(args: Args) -> Result<()> {
    let pool = store::connect(args.dsn.expose_secret(), 1).await?;
    let mut conn = pool.acquire().await?;

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list tables")?;

    let bakery_count = bakeries::count(&mut conn)
        .await
        .context("Failed to count bakeries")?;
    let baked_good_count = baked_goods::count(&mut conn)
        .await
        .context("Failed to count baked goods")?;

    info!(bakery_count, baked_good_count, "database checked");

    println!("Tables in database:");
    for table in &tables {
        println!("  {table}");
    }
    println!("Number of bakeries: {bakery_count}");
    println!("Number of baked goods: {baked_good_count}");

    drop(conn);
    pool.close().await;

    Ok(())
}
