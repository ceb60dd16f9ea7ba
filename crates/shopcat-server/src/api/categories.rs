use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use shopcat_core::ReadableProduct;

use crate::middleware::RequestId;

use super::{map_facade_error, scope, ApiError, ApiResponse, AppState, LangQuery};

/// POST /api/v1/stores/{store}/products/{id}/categories/{category_id}
pub(super) async fn attach(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id, category_id)): Path<(String, i64, i64)>,
    Query(query): Query<LangQuery>,
) -> Result<Json<ApiResponse<ReadableProduct>>, ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    let product = state
        .facade
        .add_product_to_category(&store, category_id, id, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(ApiResponse::new(product, &req_id))
}

/// DELETE /api/v1/stores/{store}/products/{id}/categories/{category_id}
pub(super) async fn detach(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id, category_id)): Path<(String, i64, i64)>,
    Query(query): Query<LangQuery>,
) -> Result<Json<ApiResponse<ReadableProduct>>, ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    let product = state
        .facade
        .remove_product_from_category(&store, category_id, id, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(ApiResponse::new(product, &req_id))
}
