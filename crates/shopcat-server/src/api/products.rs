//! Product handlers: create, read, update, delete and stock/price updates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use shopcat_core::{
    LightPersistableProduct, PersistableProduct, ProductPriceEntity, ReadableProduct,
};

use crate::middleware::RequestId;

use super::{map_facade_error, scope, ApiError, ApiResponse, AppState, LangQuery};

#[derive(Debug, Serialize)]
pub(super) struct CreatedProduct {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct SkuExists {
    pub sku: String,
    pub exists: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExistsQuery {
    pub sku: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct QuantityRequest {
    pub quantity: i32,
}

/// POST /api/v1/stores/{store}/products
pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(store): Path<String>,
    Query(query): Query<LangQuery>,
    Json(body): Json<PersistableProduct>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedProduct>>), ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    let id = state
        .facade
        .save_product(&store, &body, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    let status = if body.existing_id().is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, ApiResponse::new(CreatedProduct { id }, &req_id)))
}

/// GET /api/v1/stores/{store}/products/{id}
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id)): Path<(String, i64)>,
    Query(query): Query<LangQuery>,
) -> Result<Json<ApiResponse<ReadableProduct>>, ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    let product = state
        .facade
        .get_product(&store, id, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(ApiResponse::new(product, &req_id))
}

/// GET /api/v1/stores/{store}/products/sku/{sku}
pub(super) async fn get_product_by_sku(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, sku)): Path<(String, String)>,
    Query(query): Query<LangQuery>,
) -> Result<Json<ApiResponse<ReadableProduct>>, ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    let product = state
        .facade
        .get_product_by_code(&store, &sku, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(ApiResponse::new(product, &req_id))
}

/// GET /api/v1/stores/{store}/products/exists?sku=
pub(super) async fn product_exists(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(store): Path<String>,
    Query(query): Query<ExistsQuery>,
) -> Result<Json<ApiResponse<SkuExists>>, ApiError> {
    let (store, _) = scope(&state, &req_id, &store, None).await?;
    let exists = state
        .facade
        .exists(&query.sku, &store)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(ApiResponse::new(
        SkuExists {
            sku: query.sku,
            exists,
        },
        &req_id,
    ))
}

/// PUT /api/v1/stores/{store}/products/{id}: full update; the path id wins
/// over any id in the body.
pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id)): Path<(String, i64)>,
    Query(query): Query<LangQuery>,
    Json(mut body): Json<PersistableProduct>,
) -> Result<Json<ApiResponse<ReadableProduct>>, ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    body.id = Some(id);
    state
        .facade
        .update_product(&store, &body, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    let product = state
        .facade
        .get_product(&store, id, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(ApiResponse::new(product, &req_id))
}

/// PATCH /api/v1/stores/{store}/products/{id}
pub(super) async fn light_update(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id)): Path<(String, i64)>,
    Query(query): Query<LangQuery>,
    Json(body): Json<LightPersistableProduct>,
) -> Result<StatusCode, ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    state
        .facade
        .update(id, &body, &store, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/stores/{store}/products/sku/{sku}
pub(super) async fn light_update_by_sku(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, sku)): Path<(String, String)>,
    Query(query): Query<LangQuery>,
    Json(body): Json<LightPersistableProduct>,
) -> Result<StatusCode, ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    state
        .facade
        .update_by_sku(&sku, &body, &store, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/stores/{store}/products/{id}/price
pub(super) async fn update_price(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id)): Path<(String, i64)>,
    Query(query): Query<LangQuery>,
    Json(price): Json<ProductPriceEntity>,
) -> Result<Json<ApiResponse<ReadableProduct>>, ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    let product = state
        .facade
        .update_product_price(&store, id, &price, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(ApiResponse::new(product, &req_id))
}

/// PUT /api/v1/stores/{store}/products/{id}/quantity
pub(super) async fn update_quantity(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id)): Path<(String, i64)>,
    Query(query): Query<LangQuery>,
    Json(body): Json<QuantityRequest>,
) -> Result<Json<ApiResponse<ReadableProduct>>, ApiError> {
    if body.quantity < 0 {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "quantity must not be negative",
        ));
    }
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    let product = state
        .facade
        .update_product_quantity(&store, id, body.quantity, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(ApiResponse::new(product, &req_id))
}

/// DELETE /api/v1/stores/{store}/products/{id}
pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError> {
    let (store, _) = scope(&state, &req_id, &store, None).await?;
    state
        .facade
        .delete_product_by_id(id, &store)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}
