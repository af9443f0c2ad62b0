//! Repository functions for the `bakeries` table.

use sqlx::SqliteConnection;
use std::collections::HashMap;

use super::models::{BakedGood, Bakery, BakeryWithGoods};

const SELECT_BAKERY: &str = "SELECT id, name, created_at, updated_at FROM bakeries";

const SELECT_BAKED_GOOD: &str =
    "SELECT id, name, price, created_at, updated_at, bakery_id FROM baked_goods";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<Option<Bakery>> {
    sqlx::query_as::<_, Bakery>(&format!("{SELECT_BAKERY} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Load a bakery and its baked goods (ordered by id) with two explicit queries.
pub async fn find_with_goods(
    conn: &mut SqliteConnection,
    id: i64,
) -> sqlx::Result<Option<BakeryWithGoods>> {
    let Some(bakery) = find_by_id(conn, id).await? else {
        return Ok(None);
    };

    let baked_goods =
        sqlx::query_as::<_, BakedGood>(&format!("{SELECT_BAKED_GOOD} WHERE bakery_id = ? ORDER BY id"))
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;

    Ok(Some(BakeryWithGoods {
        bakery,
        baked_goods,
    }))
}

/// Every bakery ordered by id, each with its baked goods.
pub async fn list_with_goods(conn: &mut SqliteConnection) -> sqlx::Result<Vec<BakeryWithGoods>> {
    let bakeries = sqlx::query_as::<_, Bakery>(&format!("{SELECT_BAKERY} ORDER BY id"))
        .fetch_all(&mut *conn)
        .await?;

    let goods = sqlx::query_as::<_, BakedGood>(&format!(
        "{SELECT_BAKED_GOOD} WHERE bakery_id IS NOT NULL ORDER BY id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    let mut by_bakery: HashMap<i64, Vec<BakedGood>> = HashMap::new();
    for good in goods {
        if let Some(bakery_id) = good.bakery_id {
            by_bakery.entry(bakery_id).or_default().push(good);
        }
    }

    Ok(bakeries
        .into_iter()
        .map(|bakery| BakeryWithGoods {
            baked_goods: by_bakery.remove(&bakery.id).unwrap_or_default(),
            bakery,
        })
        .collect())
}

/// Insert a bakery and return its generated id.
pub async fn insert(conn: &mut SqliteConnection, name: &str) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO bakeries (name) VALUES (?)")
        .bind(name)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Rename a bakery. Returns `false` when no row has `id`.
pub async fn update_name(conn: &mut SqliteConnection, id: i64, name: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE bakeries SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a bakery; its baked goods go with it through `ON DELETE CASCADE`.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM bakeries WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM bakeries")
        .fetch_one(&mut *conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{baked_goods, memory_pool};
    use anyhow::{Context, Result};

    #[tokio::test]
    async fn insert_sets_created_at_and_leaves_updated_at_unset() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        let id = insert(&mut conn, "Delightful donuts").await?;
        let bakery = find_by_id(&mut conn, id).await?.context("bakery missing")?;

        assert_eq!(bakery.name.as_deref(), Some("Delightful donuts"));
        assert!(bakery.created_at.is_some());
        assert!(bakery.updated_at.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_only() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        let id = insert(&mut conn, "Incredible crullers").await?;
        let before = find_by_id(&mut conn, id).await?.context("bakery missing")?;

        assert!(update_name(&mut conn, id, "Incredible Crullers & Co").await?);
        let after = find_by_id(&mut conn, id).await?.context("bakery missing")?;

        assert_eq!(after.name.as_deref(), Some("Incredible Crullers & Co"));
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn created_at_cannot_be_rewritten() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        let id = insert(&mut conn, "Stale").await?;
        let result = sqlx::query("UPDATE bakeries SET created_at = '2000-01-01 00:00:00' WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await;

        let err = result.err().context("update should have been rejected")?;
        assert!(err.to_string().contains("created_at is immutable"));
        Ok(())
    }

    #[tokio::test]
    async fn update_name_reports_missing_row() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;
        assert!(!update_name(&mut conn, 42, "Nobody").await?);
        Ok(())
    }

    #[tokio::test]
    async fn list_groups_goods_under_their_bakery() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        let first = insert(&mut conn, "First").await?;
        let second = insert(&mut conn, "Second").await?;
        baked_goods::insert(&mut conn, "Bagel", 3, first).await?;
        baked_goods::insert(&mut conn, "Baguette", 4, second).await?;
        baked_goods::insert(&mut conn, "Brioche", 6, first).await?;

        let listed = list_with_goods(&mut conn).await?;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].bakery.id, first);
        let first_names: Vec<_> = listed[0]
            .baked_goods
            .iter()
            .filter_map(|good| good.name.as_deref())
            .collect();
        assert_eq!(first_names, vec!["Bagel", "Brioche"]);
        assert_eq!(listed[1].baked_goods.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_to_baked_goods() -> Result<()> {
        let pool = memory_pool().await?;
        let mut conn = pool.acquire().await?;

        let doomed = insert(&mut conn, "Closing down").await?;
        let kept = insert(&mut conn, "Still open").await?;
        baked_goods::insert(&mut conn, "Scone", 2, doomed).await?;
        baked_goods::insert(&mut conn, "Muffin", 3, doomed).await?;
        baked_goods::insert(&mut conn, "Pretzel", 4, kept).await?;

        assert!(delete(&mut conn, doomed).await?);

        assert_eq!(count(&mut conn).await?, 1);
        assert_eq!(baked_goods::count(&mut conn).await?, 1);
        let orphans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM baked_goods g LEFT JOIN bakeries b ON b.id = g.bakery_id WHERE g.bakery_id IS NOT NULL AND b.id IS NULL",
        )
        .fetch_one(&mut *conn)
        .await?;
        assert_eq!(orphans, 0);
        Ok(())
    }
}
