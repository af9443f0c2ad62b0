//! Repository functions for the `baked_goods` table.
//!
//! Reads that need the owning bakery use an explicit `LEFT JOIN`, so a baked
//! good without a bakery still comes back (with `bakery: None`).

use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use super::models::{BakedGood, BakedGoodWithBakery, Bakery};

const SELECT_WITH_BAKERY: &str = r"
    SELECT g.id, g.name, g.price, g.created_at, g.updated_at, g.bakery_id,
           b.id AS bakery_ref_id,
           b.name AS bakery_name,
           b.created_at AS bakery_created_at,
           b.updated_at AS bakery_updated_at
    FROM baked_goods g
    LEFT JOIN bakeries b ON b.id = g.bakery_id
";

/// Highest price first; equal prices keep insertion (id) order.
const ORDER_BY_PRICE_DESC: &str = "ORDER BY g.price DESC, g.id ASC";

fn with_bakery_from_row(row: &SqliteRow) -> sqlx::Result<BakedGoodWithBakery> {
    let baked_good = BakedGood {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        bakery_id: row.try_get("bakery_id")?,
    };

    let bakery = match row.try_get::<Option<i64>, _>("bakery_ref_id")? {
        Some(id) => Some(Bakery {
            id,
            name: row.try_get("bakery_name")?,
            created_at: row.try_get("bakery_created_at")?,
            updated_at: row.try_get("bakery_updated_at")?,
        }),
        None => None,
    };

    Ok(BakedGoodWithBakery { baked_good, bakery })
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<Option<BakedGood>> {
    sqlx::query_as::<_, BakedGood>(
        "SELECT id, name, price, created_at, updated_at, bakery_id FROM baked_goods WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn find_with_bakery(
    conn: &mut SqliteConnection,
    id: i64,
) -> sqlx::Result<Option<BakedGoodWithBakery>> {
    let row = sqlx::query(&format!("{SELECT_WITH_BAKERY} WHERE g.id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(with_bakery_from_row).transpose()
}

pub async fn list_by_price_desc(
    conn: &mut SqliteConnection,
) -> sqlx::Result<Vec<BakedGoodWithBakery>> {
    let rows = sqlx::query(&format!("{SELECT_WITH_BAKERY} {ORDER_BY_PRICE_DESC}"))
        .fetch_all(&mut *conn)
        .await?;

    rows.iter().map(with_bakery_from_row).collect()
}

/// The baked good with the highest price, or `None` when the table is empty.
pub async fn most_expensive(
    conn: &mut SqliteConnection,
) -> sqlx::Result<Option<BakedGoodWithBakery>> {
    let row = sqlx::query(&format!("{SELECT_WITH_BAKERY} {ORDER_BY_PRICE_DESC} LIMIT 1"))
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(with_bakery_from_row).transpose()
}

/// Insert a baked good and return its generated id.
///
/// A `bakery_id` that doesn't reference an existing bakery fails with the
/// store's foreign key error.
pub async fn insert(
    conn: &mut SqliteConnection,
    name: &str,
    price: i64,
    bakery_id: i64,
) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO baked_goods (name, price, bakery_id) VALUES (?, ?, ?)")
        .bind(name)
        .bind(price)
        .bind(bakery_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM baked_goods WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM baked_goods")
        .fetch_one(&mut *conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{bakeries, memory_pool};
    use anyhow::{Context, Result};

    #[tokio::test]
    async fn insert_rejects_unknown_bakery() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        let result = insert(&mut conn, "Ghost loaf", 4, 999).await;
        let err = result.err().context("insert should fail")?;
        assert!(err.to_string().contains("FOREIGN KEY constraint failed"));
        assert_eq!(count(&mut conn).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn find_with_bakery_joins_owner() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        let bakery_id = bakeries::insert(&mut conn, "Corner bakery").await?;
        let id = insert(&mut conn, "Croissant", 3, bakery_id).await?;

        let found = find_with_bakery(&mut conn, id)
            .await?
            .context("baked good missing")?;
        assert_eq!(found.baked_good.price, Some(3));
        let bakery = found.bakery.context("bakery missing")?;
        assert_eq!(bakery.id, bakery_id);
        assert_eq!(bakery.name.as_deref(), Some("Corner bakery"));
        Ok(())
    }

    #[tokio::test]
    async fn unowned_baked_good_has_no_bakery() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        sqlx::query("INSERT INTO baked_goods (name, price) VALUES ('Stray', 1)")
            .execute(&mut *conn)
            .await?;
        let listed = list_by_price_desc(&mut conn).await?;
        assert_eq!(listed.len(), 1);
        assert!(listed[0].bakery.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn price_ordering_is_descending_with_stable_ties() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        let bakery_id = bakeries::insert(&mut conn, "Ordered").await?;
        let cheap = insert(&mut conn, "Roll", 1, bakery_id).await?;
        let tie_first = insert(&mut conn, "Cake", 9, bakery_id).await?;
        let tie_second = insert(&mut conn, "Torte", 9, bakery_id).await?;
        let middle = insert(&mut conn, "Pie", 5, bakery_id).await?;

        let ids: Vec<i64> = list_by_price_desc(&mut conn)
            .await?
            .iter()
            .map(|item| item.baked_good.id)
            .collect();
        assert_eq!(ids, vec![tie_first, tie_second, middle, cheap]);

        let top = most_expensive(&mut conn)
            .await?
            .context("expected a baked good")?;
        assert_eq!(top.baked_good.id, tie_first);
        Ok(())
    }

    #[tokio::test]
    async fn most_expensive_on_empty_table_is_none() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;
        assert!(most_expensive(&mut conn).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_reports_missing_row() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        let bakery_id = bakeries::insert(&mut conn, "Temporary").await?;
        let id = insert(&mut conn, "Eclair", 4, bakery_id).await?;
        assert!(delete(&mut conn, id).await?);
        assert!(!delete(&mut conn, id).await?);
        assert!(find_by_id(&mut conn, id).await?.is_none());
        Ok(())
    }
}
