mod categories;
mod products;
mod reviews;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopcat_core::{Language, MerchantStore};
use shopcat_facade::{FacadeError, ProductCommonFacade};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, require_bearer_auth, AuthState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub facade: ProductCommonFacade,
    /// Absent when the catalog lives in memory.
    pub pool: Option<PgPool>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    storage: &'static str,
}

/// `?lang=` on every catalog route.
#[derive(Debug, Default, Deserialize)]
pub(super) struct LangQuery {
    pub lang: Option<String>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: &RequestId) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id.0.clone()),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_facade_error(request_id: &RequestId, error: FacadeError) -> ApiError {
    let rid = request_id.0.clone();
    match error {
        FacadeError::NotFound(what) => ApiError::new(rid, "not_found", format!("{what} not found")),
        FacadeError::OperationNotAllowed(message) => ApiError::new(rid, "conflict", message),
        FacadeError::Validation(message) => ApiError::new(rid, "validation_error", message),
        FacadeError::Conversion { ref context, .. } | FacadeError::Service { ref context, .. } => {
            tracing::error!(error = %error, request_id = %rid, "catalog operation failed");
            ApiError::new(rid, "internal_error", context.clone())
        }
    }
}

/// Resolves the `{store}` path segment and the `?lang=` query.
pub(super) async fn scope(
    state: &AppState,
    req_id: &RequestId,
    store: &str,
    lang: Option<&str>,
) -> Result<(MerchantStore, Language), ApiError> {
    let store = state
        .facade
        .resolve_store(store)
        .await
        .map_err(|e| map_facade_error(req_id, e))?;
    let language = state
        .facade
        .resolve_language(lang, &store)
        .await
        .map_err(|e| map_facade_error(req_id, e))?;
    Ok((store, language))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/stores/{store}/products",
            post(products::create_product),
        )
        .route(
            "/api/v1/stores/{store}/products/exists",
            get(products::product_exists),
        )
        .route(
            "/api/v1/stores/{store}/products/sku/{sku}",
            get(products::get_product_by_sku).patch(products::light_update_by_sku),
        )
        .route(
            "/api/v1/stores/{store}/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .patch(products::light_update)
                .delete(products::delete_product),
        )
        .route(
            "/api/v1/stores/{store}/products/{id}/price",
            put(products::update_price),
        )
        .route(
            "/api/v1/stores/{store}/products/{id}/quantity",
            put(products::update_quantity),
        )
        .route(
            "/api/v1/stores/{store}/products/{id}/categories/{category_id}",
            post(categories::attach).delete(categories::detach),
        )
        .route(
            "/api/v1/stores/{store}/products/{id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/api/v1/stores/{store}/products/{id}/reviews/{review_id}",
            put(reviews::update_review),
        )
        .route(
            "/api/v1/stores/{store}/reviews/{review_id}",
            delete(reviews::delete_review),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_bearer_auth,
        ))
}

pub fn build_app(state: AppState, auth: AuthState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    let Some(pool) = &state.pool else {
        return (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    storage: "memory",
                },
                meta,
            }),
        );
    };

    match shopcat_db::health_check(pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    storage: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        storage: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
