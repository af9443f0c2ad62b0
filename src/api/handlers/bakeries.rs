//! Bakery endpoints: list, detail and rename.
//!
//! Bakeries are created and deleted at the store level only; the HTTP surface
//! never exposes those operations.

use axum::{
    Form, Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, instrument};

use super::{BAKERY_NOT_FOUND, parse_id, required, rollback, types::UpdateBakeryForm};
use crate::{
    api::error::ApiError,
    store::{BakeryWithGoods, bakeries, models::BakeryResponse},
};

#[utoipa::path(
    get,
    path = "/bakeries",
    responses(
        (status = 200, description = "All bakeries with their baked goods.", body = [BakeryResponse]),
    ),
    tag = "bakeries"
)]
/// Lists every bakery ordered by id, each with its full list of baked goods.
#[instrument(skip(pool))]
pub async fn list_bakeries(pool: Extension<SqlitePool>) -> Result<Response, ApiError> {
    let mut conn = pool.acquire().await.map_err(ApiError::Internal)?;
    let rows = bakeries::list_with_goods(&mut conn)
        .await
        .map_err(ApiError::Internal)?;

    let body: Vec<BakeryResponse> = rows.iter().map(BakeryWithGoods::to_response).collect();
    Ok((StatusCode::OK, Json(body)).into_response())
}

#[utoipa::path(
    get,
    path = "/bakeries/{id}",
    params(("id" = i64, Path, description = "Bakery id")),
    responses(
        (status = 200, description = "Bakery detail.", body = BakeryResponse),
        (status = 404, description = "Bakery not found."),
    ),
    tag = "bakeries"
)]
/// Fetches one bakery with its baked goods.
#[instrument(skip(pool))]
pub async fn get_bakery(
    Path(id): Path<String>,
    pool: Extension<SqlitePool>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(BAKERY_NOT_FOUND))?;

    let mut conn = pool.acquire().await.map_err(ApiError::Internal)?;
    let bakery = bakeries::find_with_goods(&mut conn, id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::NotFound(BAKERY_NOT_FOUND))?;

    Ok((StatusCode::OK, Json(bakery.to_response())).into_response())
}

#[utoipa::path(
    patch,
    path = "/bakeries/{id}",
    params(("id" = i64, Path, description = "Bakery id")),
    request_body(content = UpdateBakeryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Bakery renamed.", body = BakeryResponse),
        (status = 400, description = "No name provided, or the update failed and was rolled back."),
        (status = 404, description = "Bakery not found."),
    ),
    tag = "bakeries"
)]
/// Renames a bakery and returns it with its baked goods.
/// The lookup, the update and the re-read share one transaction; `updated_at`
/// is refreshed by the store.
#[instrument(skip(pool, form))]
pub async fn patch_bakery(
    Path(id): Path<String>,
    pool: Extension<SqlitePool>,
    form: Option<Form<UpdateBakeryForm>>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id).ok_or(ApiError::NotFound(BAKERY_NOT_FOUND))?;

    let name = form.and_then(|Form(form)| form.name);

    let mut tx = pool.begin().await.map_err(ApiError::Internal)?;
    let updated = match rename(&mut tx, id, name).await {
        Ok(updated) => updated,
        Err(err) => return Err(rollback(tx, err).await),
    };
    tx.commit().await.map_err(ApiError::Store)?;

    info!(bakery_id = id, "bakery renamed");

    Ok((StatusCode::OK, Json(updated.to_response())).into_response())
}

/// Locate, validate, apply; runs inside the caller's transaction.
async fn rename(
    conn: &mut SqliteConnection,
    id: i64,
    name: Option<String>,
) -> Result<BakeryWithGoods, ApiError> {
    let exists = bakeries::find_by_id(conn, id)
        .await
        .map_err(ApiError::Internal)?
        .is_some();
    if !exists {
        return Err(ApiError::NotFound(BAKERY_NOT_FOUND));
    }

    let Some(name) = required(name) else {
        return Err(ApiError::Validation("No name provided".to_string()));
    };
    debug!(name = %name, "renaming bakery");

    bakeries::update_name(conn, id, &name)
        .await
        .map_err(ApiError::Store)?;
    bakeries::find_with_goods(conn, id)
        .await
        .map_err(ApiError::Store)?
        .ok_or(ApiError::NotFound(BAKERY_NOT_FOUND))
}
