//! Baked good endpoints: price-ordered listing, most expensive, create, delete.

use axum::{
    Form, Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, instrument};

use super::{
    BAKED_GOOD_NOT_FOUND, NO_BAKED_GOODS, parse_bakery_id, parse_id, parse_price, required,
    rollback, types::CreateBakedGoodForm,
};
use crate::{
    api::error::ApiError,
    store::{BakedGoodWithBakery, baked_goods, models::BakedGoodResponse},
};

const MISSING_FIELDS: &str = "Missing required fields: name, price, bakery_id";

#[utoipa::path(
    get,
    path = "/baked_goods/by_price",
    responses(
        (status = 200, description = "Baked goods, most expensive first.", body = [BakedGoodResponse]),
    ),
    tag = "baked_goods"
)]
/// Lists every baked good ordered by price descending; equal prices keep id order.
#[instrument(skip(pool))]
pub async fn baked_goods_by_price(pool: Extension<SqlitePool>) -> Result<Response, ApiError> {
    let mut conn = pool.acquire().await.map_err(ApiError::Internal)?;
    let rows = baked_goods::list_by_price_desc(&mut conn)
        .await
        .map_err(ApiError::Internal)?;

    let body: Vec<BakedGoodResponse> =
        rows.iter().map(BakedGoodWithBakery::to_response).collect();
    Ok((StatusCode::OK, Json(body)).into_response())
}

#[utoipa::path(
    get,
    path = "/baked_goods/most_expensive",
    responses(
        (status = 200, description = "The highest priced baked good.", body = BakedGoodResponse),
        (status = 404, description = "No baked goods found."),
    ),
    tag = "baked_goods"
)]
#[instrument(skip(pool))]
pub async fn most_expensive_baked_good(
    pool: Extension<SqlitePool>,
) -> Result<Response, ApiError> {
    let mut conn = pool.acquire().await.map_err(ApiError::Internal)?;
    let top = baked_goods::most_expensive(&mut conn)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::NotFound(NO_BAKED_GOODS))?;

    Ok((StatusCode::OK, Json(top.to_response())).into_response())
}

#[utoipa::path(
    post,
    path = "/baked_goods",
    request_body(content = CreateBakedGoodForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Baked good created.", body = BakedGoodResponse),
        (status = 400, description = "Missing or malformed fields, or the insert failed and was rolled back."),
    ),
    tag = "baked_goods"
)]
/// Creates a baked good from form fields `name`, `price` and `bakery_id`.
/// All three are required; `price` must be a whole number and `bakery_id` an
/// existing bakery. The response embeds the owning bakery.
#[instrument(skip(pool, form))]
pub async fn create_baked_good(
    pool: Extension<SqlitePool>,
    form: Option<Form<CreateBakedGoodForm>>,
) -> Result<Response, ApiError> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    debug!(?form, "create baked good");

    let (Some(name), Some(price), Some(bakery_id)) = (
        required(form.name),
        required(form.price),
        required(form.bakery_id),
    ) else {
        return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
    };

    let price = parse_price(&price).map_err(ApiError::Validation)?;
    let bakery_id = parse_bakery_id(&bakery_id).map_err(ApiError::Validation)?;

    let mut tx = pool.begin().await.map_err(ApiError::Internal)?;
    let created = match insert(&mut tx, &name, price, bakery_id).await {
        Ok(created) => created,
        Err(err) => return Err(rollback(tx, ApiError::Store(err)).await),
    };
    tx.commit().await.map_err(ApiError::Store)?;

    info!(baked_good_id = created.baked_good.id, bakery_id, "baked good created");

    Ok((StatusCode::CREATED, Json(created.to_response())).into_response())
}

#[utoipa::path(
    delete,
    path = "/baked_goods/{id}",
    params(("id" = i64, Path, description = "Baked good id")),
    responses(
        (status = 200, description = "Baked good deleted."),
        (status = 400, description = "The delete failed and was rolled back."),
        (status = 404, description = "Baked good not found."),
    ),
    tag = "baked_goods"
)]
#[instrument(skip(pool))]
pub async fn delete_baked_good(
    Path(id): Path<String>,
    pool: Extension<SqlitePool>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(BAKED_GOOD_NOT_FOUND))?;

    let mut tx = pool.begin().await.map_err(ApiError::Internal)?;
    if let Err(err) = remove(&mut tx, id).await {
        return Err(rollback(tx, err).await);
    }
    tx.commit().await.map_err(ApiError::Store)?;

    info!(baked_good_id = id, "baked good deleted");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Baked good successfully deleted" })),
    )
        .into_response())
}

async fn insert(
    conn: &mut SqliteConnection,
    name: &str,
    price: i64,
    bakery_id: i64,
) -> sqlx::Result<BakedGoodWithBakery> {
    let id = baked_goods::insert(conn, name, price, bakery_id).await?;
    baked_goods::find_with_bakery(conn, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Locate then delete; runs inside the caller's transaction.
async fn remove(conn: &mut SqliteConnection, id: i64) -> Result<(), ApiError> {
    let exists = baked_goods::find_by_id(conn, id)
        .await
        .map_err(ApiError::Internal)?
        .is_some();
    if !exists {
        return Err(ApiError::NotFound(BAKED_GOOD_NOT_FOUND));
    }

    baked_goods::delete(conn, id).await.map_err(ApiError::Store)?;
    Ok(())
}
