//! Review handlers. The product id always comes from the path.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use shopcat_core::{PersistableProductReview, ReadableProductReview};

use crate::middleware::RequestId;

use super::{map_facade_error, scope, ApiError, ApiResponse, AppState, LangQuery};

#[derive(Debug, Serialize)]
pub(super) struct SavedReview {
    pub id: i64,
    pub product_id: i64,
}

/// GET /api/v1/stores/{store}/products/{id}/reviews
pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id)): Path<(String, i64)>,
    Query(query): Query<LangQuery>,
) -> Result<Json<ApiResponse<Vec<ReadableProductReview>>>, ApiError> {
    let (store, language) = scope(&state, &req_id, &store, query.lang.as_deref()).await?;
    let reviews = state
        .facade
        .get_product_reviews(&store, id, &language)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(ApiResponse::new(reviews, &req_id))
}

/// POST /api/v1/stores/{store}/products/{id}/reviews
pub(super) async fn create_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id)): Path<(String, i64)>,
    Query(query): Query<LangQuery>,
    Json(mut body): Json<PersistableProductReview>,
) -> Result<(StatusCode, Json<ApiResponse<SavedReview>>), ApiError> {
    body.id = None;
    body.product_id = id;
    let saved = save(&state, &req_id, &store, query.lang.as_deref(), body).await?;
    Ok((StatusCode::CREATED, ApiResponse::new(saved, &req_id)))
}

/// PUT /api/v1/stores/{store}/products/{id}/reviews/{review_id}
pub(super) async fn update_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, id, review_id)): Path<(String, i64, i64)>,
    Query(query): Query<LangQuery>,
    Json(mut body): Json<PersistableProductReview>,
) -> Result<Json<ApiResponse<SavedReview>>, ApiError> {
    body.id = Some(review_id);
    body.product_id = id;
    let saved = save(&state, &req_id, &store, query.lang.as_deref(), body).await?;
    Ok(ApiResponse::new(saved, &req_id))
}

/// DELETE /api/v1/stores/{store}/reviews/{review_id}
pub(super) async fn delete_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, review_id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError> {
    let (store, _) = scope(&state, &req_id, &store, None).await?;
    state
        .facade
        .delete_review(&store, review_id)
        .await
        .map_err(|e| map_facade_error(&req_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn save(
    state: &AppState,
    req_id: &RequestId,
    store: &str,
    lang: Option<&str>,
    mut review: PersistableProductReview,
) -> Result<SavedReview, ApiError> {
    let (store, language) = scope(state, req_id, store, lang).await?;
    let id = state
        .facade
        .save_or_update_review(&mut review, &store, &language)
        .await
        .map_err(|e| map_facade_error(req_id, e))?;
    Ok(SavedReview {
        id,
        product_id: review.product_id,
    })
}
